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

use actix_web::{post, web, HttpResponse, Responder};
use actix_web_validator::Json;
use db_connector::models::favorites::Favorite;
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error::DatabaseError},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::is_favorite;
use crate::{
    error::Error,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct AddFavoriteSchema {
    pub charger_id: uuid::Uuid,
}

/// Add a charger to the favorites of the logged in user.
#[utoipa::path(
    context_path = "/favorites",
    request_body = AddFavoriteSchema,
    responses(
        (status = 201, description = "The charger was added to the favorites"),
        (status = 401, description = "Token missing or invalid"),
        (status = 404, description = "Charger not found"),
        (status = 409, description = "The charger is already a favorite")
    ),
    security(
        ("jwt" = [])
    )
)]
#[post("/")]
pub async fn add_favorite(
    state: web::Data<AppState>,
    uid: crate::models::uuid::Uuid,
    payload: Json<AddFavoriteSchema>,
) -> actix_web::Result<impl Responder> {
    let user = uid.0;
    let charger = payload.charger_id;

    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        use db_connector::schema::{chargers, favorites};

        let charger_exists: bool =
            match diesel::select(diesel::dsl::exists(chargers::table.find(charger)))
                .get_result(&mut conn)
            {
                Ok(e) => e,
                Err(_err) => return Err(Error::InternalError),
            };
        if !charger_exists {
            return Err(Error::ChargerNotFound);
        }

        match is_favorite(&mut conn, user, charger) {
            Ok(true) => return Err(Error::FavoriteAlreadyExists),
            Ok(false) => (),
            Err(_err) => return Err(Error::InternalError),
        }

        let favorite = Favorite {
            id: uuid::Uuid::new_v4(),
            user_id: user,
            charger_id: charger,
        };
        // the checks above can race with a concurrent request, the constraints cannot
        match diesel::insert_into(favorites::table)
            .values(&favorite)
            .execute(&mut conn)
        {
            Ok(_) => Ok(()),
            Err(DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(Error::FavoriteAlreadyExists)
            }
            Err(DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)) => {
                if info.constraint_name().is_some_and(|c| c.contains("user")) {
                    Err(Error::UserNotFound)
                } else {
                    Err(Error::ChargerNotFound)
                }
            }
            Err(err) => {
                log::error!("Failed to add favorite: {err}");
                Err(Error::InternalError)
            }
        }
    })
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "message": "Charger added to favorites" })))
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, test, App};

    use super::*;
    use crate::{
        middleware::jwt::JwtMiddleware,
        models::token_claims::TokenClaims,
        routes::{
            charger::tests::TestCharger, favorites::tests::favorite_count, user::tests::TestUser,
        },
        tests::{configure, JWT_SECRET},
    };

    #[actix_web::test]
    async fn test_without_token() {
        let app = App::new()
            .configure(configure)
            .service(add_favorite)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let req = test::TestRequest::post()
            .uri("/")
            .set_json(AddFavoriteSchema {
                charger_id: uuid::Uuid::new_v4(),
            })
            .to_request();
        let resp = crate::tests::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_malformed_charger_id() {
        let app = App::new()
            .configure(configure)
            .service(add_favorite)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let token = TokenClaims::new(uuid::Uuid::new_v4()).encode(JWT_SECRET).unwrap();
        let req = test::TestRequest::post()
            .uri("/")
            .cookie(Cookie::new("access_token", token))
            .set_json(serde_json::json!({ "charger_id": "not-a-uuid" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["detail"].as_str().is_some_and(|detail| !detail.is_empty()));
    }

    #[actix_web::test]
    async fn test_add_favorite_twice() {
        let user = TestUser::random().await;
        let charger = TestCharger::random(52.0, 21.0, &[("Chademo", 50.0)]);
        let token = user.login().await;

        let app = App::new()
            .configure(configure)
            .service(add_favorite)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        for expected in [201, 409] {
            let req = test::TestRequest::post()
                .uri("/")
                .insert_header(("Authorization", format!("Bearer {token}")))
                .set_json(AddFavoriteSchema {
                    charger_id: charger.id,
                })
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }
        assert_eq!(favorite_count(user.id), 1);
    }

    #[actix_web::test]
    async fn test_unknown_charger() {
        let user = TestUser::random().await;
        let token = user.login().await;

        let app = App::new()
            .configure(configure)
            .service(add_favorite)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(AddFavoriteSchema {
                charger_id: uuid::Uuid::new_v4(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
        assert_eq!(favorite_count(user.id), 0);
    }
}
