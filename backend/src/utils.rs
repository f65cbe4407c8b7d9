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

use std::str::FromStr;

use actix_web::web;
use diesel::{
    r2d2::{ConnectionManager, PooledConnection},
    PgConnection,
};
use lettre::message::header::ContentType;
use lettre::{Message, Transport};
use rand::{distr::Alphanumeric, Rng};

use crate::{error::Error, AppState};

pub fn get_connection(
    state: &web::Data<AppState>,
) -> actix_web::Result<PooledConnection<ConnectionManager<PgConnection>>> {
    match state.pool.get() {
        Ok(conn) => Ok(conn),
        Err(err) => {
            log::error!("Failed to get a database connection: {err}");
            Err(Error::InternalError.into())
        }
    }
}

/// Random alphanumeric string, used for reset tokens.
pub fn generate_random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub async fn web_block_unpacked<F, R>(f: F) -> Result<R, actix_web::Error>
where
    F: FnOnce() -> Result<R, Error> + Send + 'static,
    R: Send + 'static,
{
    match web::block(f).await {
        Ok(res) => match res {
            Ok(v) => Ok(v),
            Err(err) => Err(err.into()),
        },
        Err(_err) => Err(Error::InternalError.into()),
    }
}

pub fn parse_uuid(uuid: &str) -> actix_web::Result<uuid::Uuid> {
    match uuid::Uuid::from_str(uuid) {
        Ok(v) => Ok(v),
        Err(err) => Err(Error::BadRequest(format!("Invalid id: {err}")).into()),
    }
}

/// Send a mail through the configured relay.
///
/// Without a relay the mail is dropped with a warning so that development
/// setups work without SMTP credentials.
pub async fn send_email(
    email: &str,
    subject: &str,
    body: String,
    state: &web::Data<AppState>,
) -> actix_web::Result<()> {
    let Some(mailer) = state.mailer.clone() else {
        log::warn!("No mail relay configured, dropping mail '{subject}' to {email}");
        return Ok(());
    };

    let from = match format!("{} <{}>", state.sender_name, state.sender_email).parse() {
        Ok(from) => from,
        Err(err) => {
            log::error!("Invalid sender address: {err}");
            return Err(Error::InternalError.into());
        }
    };
    let to = match email.parse() {
        Ok(to) => to,
        Err(err) => {
            log::error!("Invalid recipient address {email}: {err}");
            return Err(Error::InternalError.into());
        }
    };
    let message = match Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(body)
    {
        Ok(m) => m,
        Err(err) => {
            log::error!("Failed to build mail: {err}");
            return Err(Error::InternalError.into());
        }
    };

    web_block_unpacked(move || match mailer.send(&message) {
        Ok(_) => {
            log::debug!("Mail sent successfully");
            Ok(())
        }
        Err(err) => {
            log::error!("Could not send mail: {err}");
            Err(Error::UpstreamError)
        }
    })
    .await
}
