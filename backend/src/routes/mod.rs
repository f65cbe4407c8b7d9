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

pub mod auth;
pub mod charger;
pub mod favorites;
pub mod user;

use actix_web::web;

use crate::error::Error;

/// Rejected payloads and queries answer with the same JSON body as every other error.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        actix_web_validator::JsonConfig::default()
            .error_handler(|err, _req| Error::BadRequest(err.to_string()).into()),
    )
    .app_data(
        actix_web_validator::QueryConfig::default()
            .error_handler(|err, _req| Error::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| Error::BadRequest(err.to_string()).into()),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_extractors);
    cfg.configure(auth::configure);
    cfg.configure(charger::configure);
    cfg.configure(favorites::configure);
    cfg.configure(user::configure);
}
