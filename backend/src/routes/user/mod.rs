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
use db_connector::models::users::User;
use diesel::{prelude::*, result::Error::NotFound};

use crate::{
    error::Error,
    middleware::jwt::JwtMiddleware,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

pub mod delete;
pub mod get_user;
pub mod update_user;

pub fn configure(cfg: &mut web::ServiceConfig) {
    let scope = web::scope("/user")
        .wrap(JwtMiddleware)
        .service(get_user::get_user)
        .service(update_user::update_user)
        .service(delete::delete_user);
    cfg.service(scope);
}

/// Account routes only serve the account the access token belongs to.
pub fn authorize(caller: crate::models::uuid::Uuid, requested: &str) -> Result<uuid::Uuid, Error> {
    match uuid::Uuid::parse_str(requested) {
        Ok(id) if id == caller.0 => Ok(id),
        _ => Err(Error::Unauthorized),
    }
}

pub async fn load_user(state: &web::Data<AppState>, user_id: uuid::Uuid) -> actix_web::Result<User> {
    let mut conn = get_connection(state)?;
    web_block_unpacked(move || {
        use db_connector::schema::users::dsl::*;

        match users
            .find(user_id)
            .select(User::as_select())
            .get_result(&mut conn)
        {
            Ok(user) => Ok(user),
            Err(NotFound) => Err(Error::UserNotFound),
            Err(_err) => Err(Error::InternalError),
        }
    })
    .await
}
