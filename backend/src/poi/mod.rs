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

//! Client for the third party POI search API charger data comes from.

use std::{collections::BTreeMap, time::Duration};

use derive_more::{Display, Error, From};

use crate::crawler::Rectangle;

pub mod types;

use types::{AvailabilityResponse, ConnectorAvailability, SearchResponse};

/// Most results the search endpoint returns for one query.
pub const PAGE_LIMIT: u32 = 100;

const SEARCH_PATH: &str = "/search/2/poiSearch/EV%20charging%20station.json";
const AVAILABILITY_PATH: &str = "/search/2/chargingAvailability.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Display, Error, From)]
pub enum PoiError {
    #[display("Request to POI source failed: {_0}")]
    Request(reqwest::Error),
    #[display("POI source answered with status {status}")]
    #[from(skip)]
    Status { status: u16 },
}

#[derive(Clone)]
pub struct PoiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    country: String,
}

impl PoiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self, PoiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country: "PL".to_string(),
        })
    }

    /// One page of chargers inside `rect`.
    ///
    /// `summary.total_results` of the answer is capped at `limit` by the source.
    pub async fn search_rectangle(
        &self,
        rect: &Rectangle,
        limit: u32,
    ) -> Result<SearchResponse, PoiError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let params = [
            ("key", self.api_key.clone()),
            ("countrySet", self.country.clone()),
            ("topLeft", format!("{},{}", rect.north, rect.west)),
            ("btmRight", format!("{},{}", rect.south, rect.east)),
            ("limit", limit.to_string()),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(PoiError::Status {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    /// Live availability per connector type for an availability reference.
    pub async fn charging_availability(
        &self,
        reference: &str,
    ) -> Result<BTreeMap<String, ConnectorAvailability>, PoiError> {
        let url = format!("{}{}", self.base_url, AVAILABILITY_PATH);
        let params = [
            ("key", self.api_key.as_str()),
            ("chargingAvailability", reference),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(PoiError::Status {
                status: response.status().as_u16(),
            });
        }

        let availability: AvailabilityResponse = response.json().await?;
        Ok(availability.into_status())
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};

    use super::*;

    async fn search(req: HttpRequest) -> HttpResponse {
        let query = web::Query::<BTreeMap<String, String>>::from_query(req.query_string());
        let Ok(query) = query else {
            return HttpResponse::BadRequest().finish();
        };
        if query.get("key").map(String::as_str) != Some("test-key") {
            return HttpResponse::Forbidden().finish();
        }
        // Echo the rectangle back through the result id so the test can check it.
        let id = format!(
            "{}|{}|{}|{}",
            query.get("topLeft").cloned().unwrap_or_default(),
            query.get("btmRight").cloned().unwrap_or_default(),
            query.get("countrySet").cloned().unwrap_or_default(),
            query.get("limit").cloned().unwrap_or_default(),
        );
        HttpResponse::Ok().json(serde_json::json!({
            "summary": { "totalResults": 1 },
            "results": [types::tests::result_json(&id, 52.0, 21.0)]
        }))
    }

    async fn availability(req: HttpRequest) -> HttpResponse {
        if !req.query_string().contains("chargingAvailability=known") {
            return HttpResponse::NotFound().finish();
        }
        HttpResponse::Ok().json(serde_json::json!({
            "connectors": [{
                "type": "IEC62196Type2CCS",
                "availability": {
                    "current": { "available": 2, "occupied": 0, "reserved": 0, "outOfService": 1 }
                }
            }]
        }))
    }

    async fn garbage() -> HttpResponse {
        HttpResponse::Ok().body("this is not json")
    }

    fn start_server() -> SocketAddr {
        let server = HttpServer::new(|| {
            App::new()
                .route("/search/2/poiSearch/{query}", web::get().to(search))
                .route("/search/2/chargingAvailability.json", web::get().to(availability))
                .route("/garbage/search/2/poiSearch/{query}", web::get().to(garbage))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        addr
    }

    fn rect() -> Rectangle {
        Rectangle {
            north: 52.5,
            south: 52.0,
            west: 21.0,
            east: 21.5,
        }
    }

    #[actix_web::test]
    async fn test_search_rectangle() {
        let addr = start_server();
        let client = PoiClient::new("test-key", format!("http://{addr}/")).unwrap();

        let page = client.search_rectangle(&rect(), PAGE_LIMIT).await.unwrap();
        assert_eq!(page.summary.total_results, 1);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].id, "52.5,21|52,21.5|PL|100");
    }

    #[actix_web::test]
    async fn test_search_with_bad_key() {
        let addr = start_server();
        let client = PoiClient::new("wrong-key", format!("http://{addr}")).unwrap();

        let err = client.search_rectangle(&rect(), PAGE_LIMIT).await.unwrap_err();
        assert!(matches!(err, PoiError::Status { status: 403 }));
    }

    #[actix_web::test]
    async fn test_search_undecodable_body() {
        let addr = start_server();
        let client = PoiClient::new("test-key", format!("http://{addr}/garbage")).unwrap();

        let err = client.search_rectangle(&rect(), PAGE_LIMIT).await.unwrap_err();
        assert!(matches!(err, PoiError::Request(_)));
    }

    #[actix_web::test]
    async fn test_unreachable_source() {
        // nothing listens on port 9 of localhost
        let client = PoiClient::new("test-key", "http://127.0.0.1:9").unwrap();
        assert!(client.search_rectangle(&rect(), PAGE_LIMIT).await.is_err());
    }

    #[actix_web::test]
    async fn test_charging_availability() {
        let addr = start_server();
        let client = PoiClient::new("test-key", format!("http://{addr}")).unwrap();

        let status = client.charging_availability("known").await.unwrap();
        assert_eq!(status["IEC62196Type2CCS"].available, Some(2));
        assert_eq!(status["IEC62196Type2CCS"].out_of_service, Some(1));

        let err = client.charging_availability("unknown").await.unwrap_err();
        assert!(matches!(err, PoiError::Status { status: 404 }));
    }
}
