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

use actix_web::{
    cookie::{time::Duration, Cookie, SameSite},
    post, web, HttpRequest, HttpResponse, Responder,
};
use actix_web_validator::Json;
use db_connector::models::users::User;
use diesel::{prelude::*, result::Error::NotFound};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::Error,
    models::token_claims::{TokenClaims, ACCESS_TOKEN_MINUTES},
    rate_limit::LoginRateLimiter,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Serialize, Deserialize, Clone, Debug, Validate, ToSchema)]
pub struct LoginSchema {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Log in with username and password.
///
/// The access token is returned in the body and also set as `access_token` cookie.
#[utoipa::path(
    request_body = LoginSchema,
    responses(
        (status = 200, description = "Login was successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts")
    )
)]
#[post("/login")]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    rate_limiter: web::Data<LoginRateLimiter>,
    data: Json<LoginSchema>,
) -> actix_web::Result<impl Responder> {
    let data = data.into_inner();
    rate_limiter.check(data.username.clone(), &req)?;

    let mut conn = get_connection(&state)?;
    let name = data.username.clone();
    let user: Option<User> = web_block_unpacked(move || {
        use db_connector::schema::users::dsl::*;

        match users
            .filter(username.eq(&name))
            .select(User::as_select())
            .get_result(&mut conn)
        {
            Ok(user) => Ok(Some(user)),
            Err(NotFound) => Ok(None),
            Err(_err) => Err(Error::InternalError),
        }
    })
    .await?;

    // unknown user and wrong password must be indistinguishable, in body and in time
    let Some(user) = user else {
        state.hasher.verify_dummy(data.password).await?;
        return Err(Error::WrongCredentials.into());
    };
    if !state.hasher.verify_password(data.password, &user.password).await? {
        return Err(Error::WrongCredentials.into());
    }

    let token = TokenClaims::new(user.id).encode(&state.jwt_secret)?;

    let cookie = Cookie::build("access_token", token.clone())
        .path("/")
        .max_age(Duration::minutes(ACCESS_TOKEN_MINUTES))
        .http_only(true)
        .same_site(SameSite::Strict)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}
