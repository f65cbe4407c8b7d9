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

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Lifetime of an access token in minutes.
pub const ACCESS_TOKEN_MINUTES: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

impl TokenClaims {
    pub fn new(user_id: uuid::Uuid) -> Self {
        let now = chrono::Utc::now();
        let iat = now.timestamp() as usize;
        let exp = (now + chrono::Duration::minutes(ACCESS_TOKEN_MINUTES)).timestamp() as usize;

        Self {
            sub: user_id.to_string(),
            iat,
            exp,
        }
    }

    pub fn encode(&self, secret: &str) -> Result<String, Error> {
        match jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            self,
            &jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        ) {
            Ok(token) => Ok(token),
            Err(err) => {
                log::error!("Failed to encode access token: {err}");
                Err(Error::InternalError)
            }
        }
    }
}
