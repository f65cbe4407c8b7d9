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

use actix_web::web;
use diesel::prelude::*;

use crate::middleware::jwt::JwtMiddleware;

pub mod add;
pub mod get;
pub mod remove;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/favorites")
        .wrap(JwtMiddleware)
        .service(add::add_favorite)
        .service(get::get_favorites)
        .service(remove::remove_favorite);
    cfg.service(scope);
}

/// Whether `user` already marked `charger` as favorite.
pub fn is_favorite(
    conn: &mut PgConnection,
    user: uuid::Uuid,
    charger: uuid::Uuid,
) -> QueryResult<bool> {
    use db_connector::schema::favorites::dsl::*;

    diesel::select(diesel::dsl::exists(
        favorites.filter(user_id.eq(user)).filter(charger_id.eq(charger)),
    ))
    .get_result(conn)
}
