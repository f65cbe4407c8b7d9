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

use db_connector::models::{chargers::Charger, connectors::Connector};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConnectorSchema {
    pub id: uuid::Uuid,
    pub connector_type: String,
    pub rated_power_kw: Option<f64>,
    pub voltage_v: Option<i32>,
    pub current_a: Option<i32>,
    pub current_type: Option<String>,
}

impl From<Connector> for ConnectorSchema {
    fn from(value: Connector) -> Self {
        Self {
            id: value.id,
            connector_type: value.connector_type,
            rated_power_kw: value.rated_power_kw,
            voltage_v: value.voltage_v,
            current_a: value.current_a,
            current_type: value.current_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChargerSchema {
    pub id: uuid::Uuid,
    pub external_id: String,
    pub name: Option<String>,
    pub brand_name: Option<String>,
    pub url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub street_name: Option<String>,
    pub municipality: Option<String>,
    pub postal_code: Option<String>,
    pub freeform_address: Option<String>,
    pub charging_availability: Option<String>,
    pub connectors: Vec<ConnectorSchema>,
    /// Only present when the query gave a user position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl ChargerSchema {
    pub fn new(charger: Charger, connectors: Vec<Connector>) -> Self {
        Self {
            id: charger.id,
            external_id: charger.external_id,
            name: charger.name,
            brand_name: charger.brand_name,
            url: charger.url,
            latitude: charger.latitude,
            longitude: charger.longitude,
            street_name: charger.street_name,
            municipality: charger.municipality,
            postal_code: charger.postal_code,
            freeform_address: charger.freeform_address,
            charging_availability: charger.charging_availability,
            connectors: connectors.into_iter().map(ConnectorSchema::from).collect(),
            distance_km: None,
        }
    }
}
