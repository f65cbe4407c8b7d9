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
use actix_web_validator::Query;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::Error,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Debug, Clone, Deserialize, Serialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RemoveFavoriteQuery {
    pub charger_id: uuid::Uuid,
}

/// Remove a charger from the favorites of the logged in user.
#[utoipa::path(
    context_path = "/favorites",
    params(RemoveFavoriteQuery),
    responses(
        (status = 200, description = "The favorite was removed"),
        (status = 401, description = "Token missing or invalid"),
        (status = 404, description = "The charger is not a favorite of the user")
    ),
    security(
        ("jwt" = [])
    )
)]
#[delete("/")]
pub async fn remove_favorite(
    state: web::Data<AppState>,
    uid: crate::models::uuid::Uuid,
    query: Query<RemoveFavoriteQuery>,
) -> actix_web::Result<impl Responder> {
    let user = uid.0;
    let charger = query.charger_id;

    let mut conn = get_connection(&state)?;
    web_block_unpacked(move || {
        use db_connector::schema::favorites::dsl::*;

        match diesel::delete(favorites.filter(user_id.eq(user)).filter(charger_id.eq(charger)))
            .execute(&mut conn)
        {
            Ok(0) => Err(Error::FavoriteNotFound),
            Ok(_) => Ok(()),
            Err(_err) => Err(Error::InternalError),
        }
    })
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Charger removed from favorites" })))
}
