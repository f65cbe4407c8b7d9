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

use std::time::Duration;

use actix_web::{
    middleware::{Compress, Logger},
    web, App, HttpServer,
};
use anyhow::Context;
pub use backend::*;
use backend::{
    config::Config, logging::init_logging, poi::PoiClient, rate_limit::LoginRateLimiter,
    utils::get_connection,
};
use db_connector::{get_connection_pool, run_migrations};

fn cleanup_thread(state: web::Data<AppState>) {
    loop {
        std::thread::sleep(Duration::from_secs(60));

        let mut conn = match get_connection(&state) {
            Ok(c) => c,
            Err(_err) => {
                continue;
            }
        };

        clean_reset_tokens(&mut conn);
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging(&config.log_dir, "backend")?;

    let pool = get_connection_pool()
        .map_err(|err| anyhow::anyhow!("Failed to create connection pool: {err}"))?;
    {
        let mut conn = pool.get().context("Failed to get connection from pool")?;
        run_migrations(&mut conn).map_err(|err| anyhow::anyhow!("Failed to run migrations: {err}"))?;
    }

    let mailer = match &config.smtp {
        Some(smtp) => Some(smtp.build_transport()?),
        None => {
            log::warn!("EMAIL_RELAY is not set, password reset mails will not be sent");
            None
        }
    };

    let state = web::Data::new(AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        mailer,
        sender_email: config.sender_email.clone(),
        sender_name: config.sender_name.clone(),
        frontend_url: config.frontend_url.clone(),
        poi: PoiClient::new(config.poi_api_key.clone(), config.poi_base_url.clone())?,
        hasher: backend::hasher::HasherManager::default(),
    });

    let state_cpy = state.clone();
    std::thread::spawn(move || cleanup_thread(state_cpy));

    let login_ratelimiter = web::Data::new(LoginRateLimiter::new());

    let server = HttpServer::new(move || {
        let cors = actix_cors::Cors::permissive();
        App::new()
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(login_ratelimiter.clone())
            .service(web::scope("/api").configure(routes::configure))
    });

    log::info!("Listening on {}", config.bind_address);
    server
        .bind(&config.bind_address)
        .with_context(|| format!("Failed to bind {}", config.bind_address))?
        .run()
        .await?;

    Ok(())
}
