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

use actix_web::{delete, web, HttpResponse, Responder};
use diesel::prelude::*;

use super::authorize;
use crate::{
    error::Error,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// Delete the account of the logged in user together with its favorites.
#[utoipa::path(
    context_path = "/user",
    params(("id" = String, Path, description = "Id of the user")),
    responses(
        (status = 200, description = "The account was deleted"),
        (status = 401, description = "Token missing or not issued for this user"),
        (status = 404, description = "User not found")
    ),
    security(
        ("jwt" = [])
    )
)]
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    uid: crate::models::uuid::Uuid,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let user_id = authorize(uid, &path)?;

    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        use db_connector::schema::users::dsl::*;

        // favorites and reset tokens go with it (ON DELETE CASCADE)
        match diesel::delete(users.find(user_id)).execute(&mut conn) {
            Ok(0) => Err(Error::UserNotFound),
            Ok(_) => Ok(()),
            Err(_err) => Err(Error::InternalError),
        }
    })
    .await?;

    log::info!("Deleted user {user_id}");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User account deleted successfully" })))
}
