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

use anyhow::Context;
use lettre::{transport::smtp::authentication::Credentials, SmtpTransport};

pub const DEFAULT_POI_BASE_URL: &str = "https://api.tomtom.com";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8081";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub relay: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

impl SmtpConfig {
    pub fn build_transport(&self) -> anyhow::Result<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.relay)
            .with_context(|| format!("Invalid mail relay {}", self.relay))?
            .port(self.port)
            .credentials(Credentials::new(self.user.clone(), self.pass.clone()))
            .build();

        Ok(transport)
    }
}

/// Process wide settings, read once at startup and handed to whatever needs them.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub poi_api_key: String,
    pub poi_base_url: String,
    pub smtp: Option<SmtpConfig>,
    pub sender_email: String,
    pub sender_name: String,
    pub frontend_url: String,
    pub bind_address: String,
    pub log_dir: String,
}

fn required(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Read the configuration from the environment, loading `.env` first.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        // Mail is optional as a whole, but a half configured relay is a mistake.
        let smtp = match optional("EMAIL_RELAY") {
            Some(relay) => {
                let port = required("EMAIL_RELAY_PORT")?
                    .parse()
                    .context("EMAIL_RELAY_PORT must be a port number")?;
                Some(SmtpConfig {
                    relay,
                    port,
                    user: required("EMAIL_USER")?,
                    pass: required("EMAIL_PASS")?,
                })
            }
            None => None,
        };

        Ok(Self {
            jwt_secret: required("JWT_SECRET")?,
            poi_api_key: required("POI_API_KEY")?,
            poi_base_url: optional("POI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_POI_BASE_URL.to_string()),
            smtp,
            sender_email: required("SENDER_EMAIL")?,
            sender_name: required("SENDER_NAME")?,
            frontend_url: required("FRONTEND_URL")?,
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            log_dir: Self::log_dir_from_env(),
        })
    }

    /// Directory release builds write their log files to.
    pub fn log_dir_from_env() -> String {
        dotenvy::dotenv().ok();
        optional("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())
    }

    /// Settings the crawler needs. Mail and token settings are not required there.
    pub fn poi_from_env() -> anyhow::Result<(String, String)> {
        dotenvy::dotenv().ok();

        let key = required("POI_API_KEY")?;
        let base_url = optional("POI_BASE_URL").unwrap_or_else(|| DEFAULT_POI_BASE_URL.to_string());

        Ok((key, base_url))
    }
}
