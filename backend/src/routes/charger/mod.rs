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

use actix_web::web;
use db_connector::models::{chargers::Charger, connectors::Connector};
use diesel::{prelude::*, result::Error::NotFound};

use crate::{
    error::Error,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

pub mod charging_status;
pub mod get_charger;
pub mod get_chargers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_chargers::get_chargers)
        .service(get_charger::get_charger)
        .service(charging_status::charging_status);
}

/// Load chargers together with their connectors, keeping the order of `found`.
pub fn with_connectors(
    conn: &mut PgConnection,
    found: Vec<Charger>,
) -> QueryResult<Vec<(Charger, Vec<Connector>)>> {
    let connectors: Vec<Connector> = Connector::belonging_to(&found)
        .select(Connector::as_select())
        .load(conn)?;
    let grouped = connectors.grouped_by(&found);

    Ok(found.into_iter().zip(grouped).collect())
}

pub async fn load_charger(
    state: &web::Data<AppState>,
    charger_id: uuid::Uuid,
) -> actix_web::Result<(Charger, Vec<Connector>)> {
    let mut conn = get_connection(state)?;
    web_block_unpacked(move || {
        use db_connector::schema::chargers::dsl::*;

        let charger = match chargers
            .find(charger_id)
            .select(Charger::as_select())
            .get_result(&mut conn)
        {
            Ok(c) => c,
            Err(NotFound) => return Err(Error::ChargerNotFound),
            Err(_err) => return Err(Error::InternalError),
        };

        match with_connectors(&mut conn, vec![charger]) {
            Ok(mut v) => v.pop().ok_or(Error::ChargerNotFound),
            Err(_err) => Err(Error::InternalError),
        }
    })
    .await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::crawler::store::upsert_charger;

    /// A stored charger that is deleted again when dropped.
    pub struct TestCharger {
        pub id: uuid::Uuid,
    }

    impl TestCharger {
        pub fn create(
            lat: f64,
            lon: f64,
            connectors: &[(&str, f64)],
            availability: Option<&str>,
        ) -> Self {
            let charger = Charger {
                id: uuid::Uuid::new_v4(),
                external_id: format!("test-{}", uuid::Uuid::new_v4()),
                name: Some("Test charger".to_string()),
                brand_name: None,
                url: None,
                latitude: lat,
                longitude: lon,
                street_name: None,
                municipality: None,
                postal_code: None,
                freeform_address: None,
                charging_availability: availability.map(str::to_string),
            };
            let connectors = connectors
                .iter()
                .map(|(kind, power)| Connector {
                    id: uuid::Uuid::new_v4(),
                    charger_id: charger.id,
                    connector_type: kind.to_string(),
                    rated_power_kw: Some(*power),
                    voltage_v: None,
                    current_a: None,
                    current_type: None,
                })
                .collect();

            let pool = db_connector::test_connection_pool();
            let mut conn = pool.get().unwrap();
            let id = upsert_charger(&mut conn, &charger, connectors).unwrap();

            Self { id }
        }

        pub fn random(lat: f64, lon: f64, connectors: &[(&str, f64)]) -> Self {
            Self::create(lat, lon, connectors, None)
        }
    }

    impl Drop for TestCharger {
        fn drop(&mut self) {
            use db_connector::schema::chargers::dsl::*;

            let pool = db_connector::test_connection_pool();
            let Ok(mut conn) = pool.get() else {
                return;
            };
            diesel::delete(chargers.find(self.id)).execute(&mut conn).ok();
        }
    }

    /// A random spot in the southern ocean, far away from any crawled data,
    /// so concurrently running tests do not see each other's chargers.
    pub fn isolated_origin() -> (f64, f64) {
        let n = uuid::Uuid::new_v4().as_u128();
        let lat = -70.0 + (n % 20_000) as f64 / 1000.0;
        let lon = -170.0 + ((n >> 32) % 40_000) as f64 / 1000.0;
        (lat, lon)
    }
}
