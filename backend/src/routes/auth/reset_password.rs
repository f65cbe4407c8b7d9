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
use askama::Template;
use chrono::Utc;
use db_connector::models::{password_reset_tokens::PasswordResetToken, users::User};
use diesel::{prelude::*, result::Error::NotFound};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::Error,
    utils::{generate_random_string, get_connection, send_email, web_block_unpacked},
    AppState, RESET_TOKEN_LIFETIME,
};

const RESET_TOKEN_LENGTH: usize = 32;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ResetPasswordSchema {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ConfirmResetSchema {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

#[derive(Template)]
#[template(path = "reset_password.html")]
struct ResetPasswordTemplate<'a> {
    name: &'a str,
    link: &'a str,
}

/// Send a link to choose a new password to the account's email address.
#[utoipa::path(
    request_body = ResetPasswordSchema,
    responses(
        (status = 200, description = "The reset link was sent"),
        (status = 404, description = "No account with this email exists")
    )
)]
#[post("/reset-password")]
pub async fn reset_password(
    state: web::Data<AppState>,
    data: Json<ResetPasswordSchema>,
) -> actix_web::Result<impl Responder> {
    let mail = data.email.to_lowercase();

    let mut conn = get_connection(&state)?;
    let user: User = web_block_unpacked(move || {
        use db_connector::schema::users::dsl::*;

        match users
            .filter(email.eq(&mail))
            .select(User::as_select())
            .get_result(&mut conn)
        {
            Ok(user) => Ok(user),
            Err(NotFound) => Err(Error::UserNotFound),
            Err(_err) => Err(Error::InternalError),
        }
    })
    .await?;

    let reset_token = PasswordResetToken {
        id: uuid::Uuid::new_v4(),
        user_id: user.id,
        token: generate_random_string(RESET_TOKEN_LENGTH),
        created: Utc::now().timestamp(),
    };
    let link = format!(
        "{}/reset-password?token={}",
        state.frontend_url.trim_end_matches('/'),
        reset_token.token
    );

    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        use db_connector::schema::password_reset_tokens;

        match diesel::insert_into(password_reset_tokens::table)
            .values(&reset_token)
            .execute(&mut conn)
        {
            Ok(_) => Ok(()),
            Err(_err) => Err(Error::InternalError),
        }
    })
    .await?;

    let template = ResetPasswordTemplate {
        name: &user.username,
        link: &link,
    };
    let body = match template.render() {
        Ok(body) => body,
        Err(err) => {
            log::error!("Failed to render reset mail: {err}");
            return Err(Error::InternalError.into());
        }
    };
    send_email(&user.email, "WattWay Password Reset", body, &state).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password reset link sent" })))
}

/// Set a new password with a token from a reset mail. The token is consumed.
#[utoipa::path(
    request_body = ConfirmResetSchema,
    responses(
        (status = 200, description = "The password was changed"),
        (status = 401, description = "Unknown or expired token")
    )
)]
#[post("/reset-password/confirm")]
pub async fn confirm_reset_password(
    state: web::Data<AppState>,
    data: Json<ConfirmResetSchema>,
) -> actix_web::Result<impl Responder> {
    let data = data.into_inner();

    let mut conn = get_connection(&state)?;
    let reset_token = data.token.clone();
    let found: PasswordResetToken = web_block_unpacked(move || {
        use db_connector::schema::password_reset_tokens::dsl::*;

        match password_reset_tokens
            .filter(token.eq(&reset_token))
            .select(PasswordResetToken::as_select())
            .get_result(&mut conn)
        {
            Ok(t) => Ok(t),
            Err(NotFound) => Err(Error::Unauthorized),
            Err(_err) => Err(Error::InternalError),
        }
    })
    .await?;

    if found.created < (Utc::now() - RESET_TOKEN_LIFETIME).timestamp() {
        return Err(Error::Unauthorized.into());
    }

    let password_hash = state.hasher.hash_password(data.new_password).await?;

    let token_id = found.id;
    let uid = found.user_id;
    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        use db_connector::schema::{password_reset_tokens, users};

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            // a token used concurrently is only deleted once
            let deleted = diesel::delete(password_reset_tokens::table.find(token_id)).execute(conn)?;
            if deleted == 0 {
                return Ok(false);
            }
            diesel::update(users::table.find(uid))
                .set(users::password.eq(&password_hash))
                .execute(conn)?;
            Ok(true)
        })
        .map_err(|err| {
            log::error!("Failed to reset password: {err}");
            Error::InternalError
        })
        .and_then(|changed| if changed { Ok(()) } else { Err(Error::Unauthorized) })
    })
    .await?;

    log::info!("Password of user {uid} was reset");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password changed" })))
}
