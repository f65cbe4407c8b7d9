/* wattway
 * Copyright (C) 2024 Frederic Henrichs <frederic@tinkerforge.com>
 *
 * This library is free software; you can redistribute it and/or
 * modify it under the terms of the GNU Lesser General Public
 * License as published by the Free Software Foundation; either
 * version 2 of the License, or (at your option) any later version.
 *
 * This library is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * Lesser General Public License for more details.
 *
 * You should have received a copy of the GNU Lesser General Public
 * License along with this library; if not, write to the
 * Free Software Foundation, Inc., 59 Temple Place - Suite 330,
 * Boston, MA 02111-1307, USA.
 */

use actix_web::{get, web, HttpResponse, Responder};
use db_connector::models::{chargers::Charger, connectors::Connector};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

use super::with_connectors;
use crate::{
    error::Error,
    geo::{sort_by_distance, Point},
    models::charger::ChargerSchema,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "validate_query"))]
pub struct ChargerQuery {
    #[serde(rename = "northEast_latitude")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub north_east_latitude: Option<f64>,
    #[serde(rename = "northEast_longitude")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub north_east_longitude: Option<f64>,
    #[serde(rename = "southWest_latitude")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub south_west_latitude: Option<f64>,
    #[serde(rename = "southWest_longitude")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub south_west_longitude: Option<f64>,
    /// Minimal rated power of a connector in kW.
    #[validate(range(min = 0.0))]
    pub min_power: Option<f64>,
    /// Maximal rated power of a connector in kW.
    #[validate(range(min = 0.0))]
    pub max_power: Option<f64>,
    /// Connector type codes. The parameter may repeat and each value may be a comma separated list.
    #[serde(default)]
    pub connector_types: Vec<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub user_latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub user_longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

fn validate_query(query: &ChargerQuery) -> Result<(), ValidationError> {
    let corners = [
        query.north_east_latitude,
        query.north_east_longitude,
        query.south_west_latitude,
        query.south_west_longitude,
    ];
    let given = corners.iter().filter(|c| c.is_some()).count();
    if given != 0 && given != corners.len() {
        return Err(ValidationError::new("partial_bounding_box"));
    }

    if query.user_latitude.is_some() != query.user_longitude.is_some() {
        return Err(ValidationError::new("partial_user_position"));
    }

    if let (Some(min), Some(max)) = (query.min_power, query.max_power) {
        if min > max {
            return Err(ValidationError::new("min_power_above_max_power"));
        }
    }

    Ok(())
}

impl ChargerQuery {
    /// Build the query from raw query string pairs.
    ///
    /// Numeric parameters given twice keep the last value, unknown parameters are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, Error> {
        let mut query = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "northEast_latitude" => &mut query.north_east_latitude,
                "northEast_longitude" => &mut query.north_east_longitude,
                "southWest_latitude" => &mut query.south_west_latitude,
                "southWest_longitude" => &mut query.south_west_longitude,
                "min_power" => &mut query.min_power,
                "max_power" => &mut query.max_power,
                "user_latitude" => &mut query.user_latitude,
                "user_longitude" => &mut query.user_longitude,
                "connector_types" => {
                    query.connector_types.push(value);
                    continue;
                }
                _ => continue,
            };

            match value.trim().parse::<f64>() {
                Ok(number) if number.is_finite() => *slot = Some(number),
                _ => return Err(Error::BadRequest(format!("{key} must be a number"))),
            }
        }

        Ok(query)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox {
            north: self.north_east_latitude?,
            east: self.north_east_longitude?,
            south: self.south_west_latitude?,
            west: self.south_west_longitude?,
        })
    }

    pub fn user_position(&self) -> Option<Point> {
        Some(Point::new(self.user_latitude?, self.user_longitude?))
    }

    /// Requested connector types, ignoring blanks. `None` when no type filter applies.
    pub fn connector_type_list(&self) -> Option<Vec<String>> {
        let types: Vec<String> = self
            .connector_types
            .iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        if types.is_empty() {
            None
        } else {
            Some(types)
        }
    }

    fn has_connector_filter(&self) -> bool {
        self.min_power.is_some() || self.max_power.is_some() || self.connector_type_list().is_some()
    }
}

fn find_chargers(
    conn: &mut PgConnection,
    query: &ChargerQuery,
) -> QueryResult<Vec<(Charger, Vec<Connector>)>> {
    use db_connector::schema::{chargers, connectors};

    let mut charger_query = chargers::table.select(Charger::as_select()).into_boxed();

    if let Some(bbox) = query.bounding_box() {
        charger_query = charger_query
            .filter(chargers::latitude.le(bbox.north))
            .filter(chargers::latitude.ge(bbox.south))
            .filter(chargers::longitude.le(bbox.east))
            .filter(chargers::longitude.ge(bbox.west));
    }

    // A charger matches when one of its connectors passes every connector filter.
    if query.has_connector_filter() {
        let mut connector_query = connectors::table
            .select(connectors::charger_id)
            .distinct()
            .into_boxed();
        if let Some(min) = query.min_power {
            connector_query = connector_query.filter(connectors::rated_power_kw.ge(min));
        }
        if let Some(max) = query.max_power {
            connector_query = connector_query.filter(connectors::rated_power_kw.le(max));
        }
        if let Some(types) = query.connector_type_list() {
            connector_query = connector_query.filter(connectors::connector_type.eq_any(types));
        }

        let ids: Vec<uuid::Uuid> = connector_query.load(conn)?;
        charger_query = charger_query.filter(chargers::id.eq_any(ids));
    }

    let found: Vec<Charger> = charger_query.load(conn)?;
    with_connectors(conn, found)
}

/// Turn query rows into the response, sorted by distance when a position is given.
pub fn build_response(
    rows: Vec<(Charger, Vec<Connector>)>,
    origin: Option<Point>,
) -> Result<Vec<ChargerSchema>, Error> {
    if rows.is_empty() {
        return Err(Error::NoChargersFound);
    }

    let response = match origin {
        Some(origin) => sort_by_distance(rows, origin, |(c, _)| Point::new(c.latitude, c.longitude))
            .into_iter()
            .map(|((charger, connectors), distance)| {
                let mut schema = ChargerSchema::new(charger, connectors);
                schema.distance_km = Some(distance);
                schema
            })
            .collect(),
        None => rows
            .into_iter()
            .map(|(charger, connectors)| ChargerSchema::new(charger, connectors))
            .collect(),
    };

    Ok(response)
}

/// Find chargers by area and connector properties.
#[utoipa::path(
    params(ChargerQuery),
    responses(
        (status = 200, description = "Matching chargers", body = Vec<ChargerSchema>),
        (status = 400, description = "Invalid or incomplete filter"),
        (status = 404, description = "No chargers found with the specified filters.")
    )
)]
#[get("/chargers/")]
pub async fn get_chargers(
    state: web::Data<AppState>,
    pairs: web::Query<Vec<(String, String)>>,
) -> actix_web::Result<impl Responder> {
    let query = ChargerQuery::from_pairs(pairs.into_inner())?;
    if let Err(err) = query.validate() {
        return Err(Error::BadRequest(err.to_string()).into());
    }
    let origin = query.user_position();

    let mut conn = get_connection(&state)?;
    let rows = web_block_unpacked(move || match find_chargers(&mut conn, &query) {
        Ok(rows) => Ok(rows),
        Err(err) => {
            log::error!("Failed to query chargers: {err}");
            Err(Error::InternalError)
        }
    })
    .await?;

    Ok(HttpResponse::Ok().json(build_response(rows, origin)?))
}
