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

use actix_web::{put, web, HttpResponse, Responder};
use actix_web_validator::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{authorize, load_user};
use crate::{
    error::Error,
    routes::auth::register::{check_taken, conflict_from_db_error},
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// Every field is optional and applied on its own.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateUserSchema {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserResponse {
    pub message: String,
    pub username: String,
}

#[derive(AsChangeset)]
#[diesel(table_name = db_connector::schema::users)]
struct UserChangeset {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

/// Update username, email or password of the logged in user.
#[utoipa::path(
    context_path = "/user",
    params(("id" = String, Path, description = "Id of the user")),
    request_body = UpdateUserSchema,
    responses(
        (status = 200, body = UpdateUserResponse),
        (status = 401, description = "Token missing or not issued for this user"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email is taken by another user")
    ),
    security(
        ("jwt" = [])
    )
)]
#[put("/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    uid: crate::models::uuid::Uuid,
    path: web::Path<String>,
    data: Json<UpdateUserSchema>,
) -> actix_web::Result<impl Responder> {
    let user_id = authorize(uid, &path)?;
    let data = data.into_inner();
    let user = load_user(&state, user_id).await?;

    let new_email = data.email.map(|e| e.to_lowercase());
    {
        let mut conn = get_connection(&state)?;
        let name = data.username.clone();
        let mail = new_email.clone();
        web_block_unpacked(move || {
            check_taken(&mut conn, name.as_deref(), mail.as_deref(), Some(user_id))
        })
        .await?;
    }

    let new_password = match data.password {
        Some(password) => Some(state.hasher.hash_password(password).await?),
        None => None,
    };

    let changes = UserChangeset {
        username: data.username,
        email: new_email,
        password: new_password,
    };
    let username = changes.username.clone().unwrap_or(user.username);

    if changes.username.is_some() || changes.email.is_some() || changes.password.is_some() {
        let mut conn = get_connection(&state)?;
        web_block_unpacked(move || {
            use db_connector::schema::users::dsl::*;

            match diesel::update(users.find(user_id)).set(&changes).execute(&mut conn) {
                Ok(0) => Err(Error::UserNotFound),
                Ok(_) => Ok(()),
                Err(err) => Err(conflict_from_db_error(err)),
            }
        })
        .await?;
    }

    Ok(HttpResponse::Ok().json(UpdateUserResponse {
        message: "User information updated successfully".to_string(),
        username,
    }))
}
