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
use db_connector::models::chargers::Charger;
use diesel::prelude::*;

use crate::{
    error::Error,
    models::charger::ChargerSchema,
    routes::charger::with_connectors,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

/// List the favorite chargers of the logged in user.
#[utoipa::path(
    context_path = "/favorites",
    responses(
        (status = 200, body = Vec<ChargerSchema>),
        (status = 401, description = "Token missing or invalid"),
        (status = 404, description = "The user has no favorites")
    ),
    security(
        ("jwt" = [])
    )
)]
#[get("/")]
pub async fn get_favorites(
    state: web::Data<AppState>,
    uid: crate::models::uuid::Uuid,
) -> actix_web::Result<impl Responder> {
    let user = uid.0;

    let mut conn = get_connection(&state)?;
    let rows = web_block_unpacked(move || {
        use db_connector::schema::{chargers, favorites};

        let found: Vec<Charger> = match favorites::table
            .inner_join(chargers::table)
            .filter(favorites::user_id.eq(user))
            .order(chargers::name.asc())
            .select(Charger::as_select())
            .load(&mut conn)
        {
            Ok(found) => found,
            Err(_err) => return Err(Error::InternalError),
        };
        if found.is_empty() {
            return Err(Error::NoFavoritesFound);
        }

        with_connectors(&mut conn, found).map_err(|_| Error::InternalError)
    })
    .await?;

    let chargers: Vec<ChargerSchema> = rows
        .into_iter()
        .map(|(charger, connectors)| ChargerSchema::new(charger, connectors))
        .collect();

    Ok(HttpResponse::Ok().json(chargers))
}
