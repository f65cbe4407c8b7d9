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
use backend::{
    config::Config,
    crawler::{generate_grid, store::PgChargerStore, Crawler, CrawlerSettings, GRID_STEP, POLAND},
    logging::init_logging,
    poi::PoiClient,
};
use db_connector::{get_connection_pool, run_migrations};

/**
 * Crawl all chargers in the region and write them to the database.
 */
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&Config::log_dir_from_env(), "update_db")?;

    let (api_key, base_url) = Config::poi_from_env()?;

    let pool = get_connection_pool()
        .map_err(|err| anyhow::anyhow!("Failed to create connection pool: {err}"))?;
    {
        let mut conn = pool.get().context("Failed to get connection from pool")?;
        run_migrations(&mut conn).map_err(|err| anyhow::anyhow!("Failed to run migrations: {err}"))?;
    }

    let client = PoiClient::new(api_key, base_url)?;
    let grid = generate_grid(POLAND, GRID_STEP, GRID_STEP);
    log::info!("Crawling {} tiles", grid.len());

    let mut crawler = Crawler::new(client, PgChargerStore::new(pool), CrawlerSettings::default());
    let stats = crawler.run(&grid).await;

    log::info!("Done: {stats}");
    if stats.fetch_failures > 0 || stats.store_failures > 0 {
        log::warn!(
            "{} pages could not be fetched and {} could not be stored",
            stats.fetch_failures,
            stats.store_failures
        );
    }

    Ok(())
}
