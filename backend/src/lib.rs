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

use chrono::{TimeDelta, Utc};
use db_connector::Pool;
use diesel::{prelude::*, r2d2::PooledConnection};
use lettre::SmtpTransport;

pub mod config;
pub mod crawler;
pub mod error;
pub mod geo;
pub mod hasher;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod poi;
pub mod rate_limit;
pub mod routes;
pub mod utils;

/// Reset tokens older than this are rejected and purged.
pub const RESET_TOKEN_LIFETIME: TimeDelta = TimeDelta::hours(1);

pub struct AppState {
    pub pool: Pool,
    pub jwt_secret: String,
    pub mailer: Option<SmtpTransport>,
    pub sender_email: String,
    pub sender_name: String,
    pub frontend_url: String,
    pub poi: poi::PoiClient,
    pub hasher: hasher::HasherManager,
}

pub fn clean_reset_tokens(conn: &mut PooledConnection<diesel::r2d2::ConnectionManager<PgConnection>>) {
    use db_connector::schema::password_reset_tokens::dsl::*;

    if let Some(time) = Utc::now().checked_sub_signed(RESET_TOKEN_LIFETIME) {
        match diesel::delete(password_reset_tokens.filter(created.lt(time.timestamp())))
            .execute(conn)
        {
            Ok(0) => (),
            Ok(n) => log::debug!("Removed {n} expired reset tokens"),
            Err(err) => log::error!("Failed to remove expired reset tokens: {err}"),
        }
    }
}
