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

use super::{authorize, load_user};
use crate::{models::filtered_user::FilteredUser, AppState};

/// Get the account information of the logged in user.
#[utoipa::path(
    context_path = "/user",
    params(("id" = String, Path, description = "Id of the user")),
    responses(
        (status = 200, body = FilteredUser),
        (status = 401, description = "Token missing or not issued for this user"),
        (status = 404, description = "User not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    uid: crate::models::uuid::Uuid,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let user_id = authorize(uid, &path)?;
    let user = load_user(&state, user_id).await?;

    Ok(HttpResponse::Ok().json(FilteredUser::from(user)))
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, test, App};

    use super::*;
    use crate::{
        middleware::jwt::JwtMiddleware,
        models::token_claims::TokenClaims,
        routes::user::tests::TestUser,
        tests::{configure, JWT_SECRET},
    };

    #[actix_web::test]
    async fn test_without_token() {
        let app = App::new()
            .configure(configure)
            .service(get_user)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri(&format!("/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = crate::tests::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_other_users_id() {
        let app = App::new()
            .configure(configure)
            .service(get_user)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let token = TokenClaims::new(uuid::Uuid::new_v4()).encode(JWT_SECRET).unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/{}", uuid::Uuid::new_v4()))
            .cookie(Cookie::new("access_token", token))
            .to_request();
        let resp = crate::tests::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_get_own_user() {
        let user = TestUser::random().await;
        let token = user.login().await;

        let app = App::new()
            .configure(configure)
            .service(get_user)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri(&format!("/{}", user.id))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp: FilteredUser = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.id, user.id);
        assert_eq!(resp.username, user.username);
        assert_eq!(resp.email, user.email);
    }

    #[actix_web::test]
    async fn test_deleted_user() {
        // a valid token for an account that does not exist (anymore)
        let app = App::new()
            .configure(configure)
            .service(get_user)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let id = uuid::Uuid::new_v4();
        let token = TokenClaims::new(id).encode(JWT_SECRET).unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/{id}"))
            .cookie(Cookie::new("access_token", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }
}
