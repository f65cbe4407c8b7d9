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

//! Wire format of the POI search and charging availability endpoints.

use std::collections::BTreeMap;

use db_connector::models::{chargers::Charger, connectors::Connector};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub results: Vec<PoiResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiResult {
    pub id: String,
    #[serde(default)]
    pub poi: PoiInfo,
    pub position: Position,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub charging_park: Option<ChargingPark>,
    #[serde(default)]
    pub data_sources: Option<DataSources>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoiInfo {
    pub name: Option<String>,
    #[serde(default)]
    pub brands: Vec<Brand>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Brand {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street_name: Option<String>,
    pub municipality: Option<String>,
    pub postal_code: Option<String>,
    pub freeform_address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChargingPark {
    #[serde(default)]
    pub connectors: Vec<PoiConnector>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoiConnector {
    #[serde(rename = "connectorType")]
    pub connector_type: String,
    #[serde(rename = "ratedPowerKW")]
    pub rated_power_kw: Option<f64>,
    #[serde(rename = "voltageV")]
    pub voltage_v: Option<i32>,
    #[serde(rename = "currentA")]
    pub current_a: Option<i32>,
    #[serde(rename = "currentType")]
    pub current_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSources {
    pub charging_availability: Option<DataSourceRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSourceRef {
    pub id: String,
}

impl PoiResult {
    /// Convert into storable rows. The charger gets a fresh id which the
    /// upsert replaces with the stored one when the charger already exists.
    pub fn into_records(self) -> (Charger, Vec<Connector>) {
        let charger = Charger {
            id: uuid::Uuid::new_v4(),
            external_id: self.id,
            name: self.poi.name,
            brand_name: self.poi.brands.into_iter().next().map(|b| b.name),
            url: self.poi.url,
            latitude: self.position.lat,
            longitude: self.position.lon,
            street_name: self.address.street_name,
            municipality: self.address.municipality,
            postal_code: self.address.postal_code,
            freeform_address: self.address.freeform_address,
            charging_availability: self
                .data_sources
                .and_then(|s| s.charging_availability)
                .map(|a| a.id),
        };

        let connectors = self
            .charging_park
            .map(|p| p.connectors)
            .unwrap_or_default()
            .into_iter()
            .map(|c| Connector {
                id: uuid::Uuid::new_v4(),
                charger_id: charger.id,
                connector_type: c.connector_type,
                rated_power_kw: c.rated_power_kw,
                voltage_v: c.voltage_v,
                current_a: c.current_a,
                current_type: c.current_type,
            })
            .collect();

        (charger, connectors)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub connectors: Vec<AvailabilityConnector>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityConnector {
    #[serde(rename = "type")]
    pub connector_type: String,
    #[serde(default)]
    pub availability: Availability,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub current: ConnectorAvailability,
}

/// Live counts for one connector type at a charger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorAvailability {
    pub available: Option<u32>,
    pub occupied: Option<u32>,
    pub reserved: Option<u32>,
    pub out_of_service: Option<u32>,
}

impl AvailabilityResponse {
    /// Connector type to counts. A type listed twice keeps its last entry.
    pub fn into_status(self) -> BTreeMap<String, ConnectorAvailability> {
        self.connectors
            .into_iter()
            .map(|c| (c.connector_type, c.availability.current))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn result_json(id: &str, lat: f64, lon: f64) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "poi": {
                "name": format!("Station {id}"),
                "brands": [{ "name": "GreenWay" }, { "name": "Other" }],
                "url": "https://example.invalid"
            },
            "position": { "lat": lat, "lon": lon },
            "address": {
                "streetName": "Marszałkowska",
                "municipality": "Warszawa",
                "postalCode": "00-001",
                "freeformAddress": "Marszałkowska 1, 00-001 Warszawa"
            },
            "chargingPark": {
                "connectors": [
                    {
                        "connectorType": "IEC62196Type2CCS",
                        "ratedPowerKW": 50.0,
                        "voltageV": 400,
                        "currentA": 125,
                        "currentType": "DC"
                    },
                    { "connectorType": "IEC62196Type2Outlet", "ratedPowerKW": 22.0 }
                ]
            },
            "dataSources": { "chargingAvailability": { "id": format!("avail-{id}") } }
        })
    }

    pub fn result(id: &str, lat: f64, lon: f64) -> PoiResult {
        serde_json::from_value(result_json(id, lat, lon)).unwrap()
    }

    #[test]
    fn test_result_into_records() {
        let (charger, connectors) = result("abc", 52.23, 21.01).into_records();

        assert_eq!(charger.external_id, "abc");
        assert_eq!(charger.brand_name.as_deref(), Some("GreenWay"));
        assert_eq!(charger.postal_code.as_deref(), Some("00-001"));
        assert_eq!(charger.charging_availability.as_deref(), Some("avail-abc"));
        assert_eq!(charger.latitude, 52.23);
        assert_eq!(connectors.len(), 2);
        assert!(connectors.iter().all(|c| c.charger_id == charger.id));
        assert_eq!(connectors[0].rated_power_kw, Some(50.0));
        assert_eq!(connectors[0].current_type.as_deref(), Some("DC"));
        assert_eq!(connectors[1].voltage_v, None);
    }

    #[test]
    fn test_minimal_result() {
        let result: PoiResult = serde_json::from_value(serde_json::json!({
            "id": "bare",
            "position": { "lat": 50.0, "lon": 19.0 }
        }))
        .unwrap();
        let (charger, connectors) = result.into_records();

        assert_eq!(charger.name, None);
        assert_eq!(charger.brand_name, None);
        assert_eq!(charger.charging_availability, None);
        assert!(connectors.is_empty());
    }

    #[test]
    fn test_availability_into_status() {
        let resp: AvailabilityResponse = serde_json::from_value(serde_json::json!({
            "connectors": [
                {
                    "type": "IEC62196Type2CCS",
                    "availability": {
                        "current": { "available": 1, "occupied": 1, "reserved": 0, "outOfService": 0 }
                    }
                },
                { "type": "Chademo" }
            ]
        }))
        .unwrap();
        let status = resp.into_status();

        assert_eq!(status.len(), 2);
        assert_eq!(status["IEC62196Type2CCS"].available, Some(1));
        assert_eq!(status["IEC62196Type2CCS"].out_of_service, Some(0));
        assert_eq!(status["Chademo"], ConnectorAvailability::default());

        let json = serde_json::to_value(&status["IEC62196Type2CCS"]).unwrap();
        assert_eq!(json["outOfService"], 0);
    }
}
