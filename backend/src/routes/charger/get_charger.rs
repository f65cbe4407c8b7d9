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

use super::load_charger;
use crate::{models::charger::ChargerSchema, utils::parse_uuid, AppState};

/// Get one charger with its connectors.
#[utoipa::path(
    params(("id" = String, Path, description = "Id of the charger")),
    responses(
        (status = 200, body = ChargerSchema),
        (status = 400, description = "The id is not a valid uuid"),
        (status = 404, description = "Charger not found")
    )
)]
#[get("/chargers/{id}")]
pub async fn get_charger(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let charger_id = parse_uuid(&path)?;
    let (charger, connectors) = load_charger(&state, charger_id).await?;

    Ok(HttpResponse::Ok().json(ChargerSchema::new(charger, connectors)))
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    use super::*;
    use crate::{routes::charger::tests::TestCharger, tests::configure};

    #[actix_web::test]
    async fn test_invalid_id() {
        let app = App::new().configure(configure).service(get_charger);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get().uri("/chargers/42").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().unwrap().starts_with("Invalid id"));
    }

    #[actix_web::test]
    async fn test_get_charger() {
        let charger = TestCharger::random(
            52.0,
            21.0,
            &[("IEC62196Type2CCS", 50.0), ("Chademo", 50.0)],
        );
        let app = App::new().configure(configure).service(get_charger);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri(&format!("/chargers/{}", charger.id))
            .to_request();
        let found: ChargerSchema = test::call_and_read_body_json(&app, req).await;
        assert_eq!(found.id, charger.id);
        assert_eq!(found.connectors.len(), 2);
        assert_eq!(found.distance_km, None);
    }

    #[actix_web::test]
    async fn test_unknown_charger() {
        let app = App::new().configure(configure).service(get_charger);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri(&format!("/chargers/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
