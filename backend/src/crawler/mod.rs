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

//! Crawls the POI source rectangle by rectangle into the charger store.
//!
//! The source answers at most one page per query. A page whose reported total
//! reaches the page limit is assumed to be truncated, so its rectangle is split
//! into quadrants and each quadrant is queried again until every page fits.

use std::ops::AddAssign;

use async_trait::async_trait;

use crate::poi::{types::SearchResponse, PoiClient, PoiError};

pub mod store;

pub use store::PgChargerStore;

/// Axis aligned area given by its bounding latitudes and longitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl Rectangle {
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// Split at the midpoint into NW, NE, SW and SE.
    pub fn quadrants(&self) -> [Rectangle; 4] {
        let mid_lat = (self.north + self.south) / 2.0;
        let mid_lon = (self.west + self.east) / 2.0;

        [
            Rectangle {
                north: self.north,
                south: mid_lat,
                west: self.west,
                east: mid_lon,
            },
            Rectangle {
                north: self.north,
                south: mid_lat,
                west: mid_lon,
                east: self.east,
            },
            Rectangle {
                north: mid_lat,
                south: self.south,
                west: self.west,
                east: mid_lon,
            },
            Rectangle {
                north: mid_lat,
                south: self.south,
                west: mid_lon,
                east: self.east,
            },
        ]
    }
}

/// Region covered by `update_db`.
pub const POLAND: Rectangle = Rectangle {
    north: 55.0,
    south: 49.0,
    west: 14.0,
    east: 24.0,
};

/// Degrees per grid tile in both directions.
pub const GRID_STEP: f64 = 0.5;

/// Tile `region` into `step_lat` x `step_lon` rectangles, row by row from the
/// south west corner. The last row and column are clamped to the region edge.
pub fn generate_grid(region: Rectangle, step_lat: f64, step_lon: f64) -> Vec<Rectangle> {
    let mut grid = Vec::new();
    if step_lat <= 0.0 || step_lon <= 0.0 {
        return grid;
    }

    let mut row = 0u32;
    loop {
        let south = region.south + f64::from(row) * step_lat;
        if south >= region.north {
            break;
        }
        let north = (south + step_lat).min(region.north);

        let mut col = 0u32;
        loop {
            let west = region.west + f64::from(col) * step_lon;
            if west >= region.east {
                break;
            }
            let east = (west + step_lon).min(region.east);
            grid.push(Rectangle {
                north,
                south,
                west,
                east,
            });
            col += 1;
        }
        row += 1;
    }

    grid
}

#[async_trait(?Send)]
pub trait ChargerSource {
    async fn search(&self, rect: &Rectangle, limit: u32) -> Result<SearchResponse, PoiError>;
}

#[async_trait(?Send)]
impl ChargerSource for PoiClient {
    async fn search(&self, rect: &Rectangle, limit: u32) -> Result<SearchResponse, PoiError> {
        self.search_rectangle(rect, limit).await
    }
}

/// Persists one page of search results. A page is stored completely or not at all.
pub trait ChargerStore {
    /// Returns the number of chargers written.
    fn upsert_page(&mut self, page: SearchResponse) -> anyhow::Result<usize>;
}

#[derive(Debug, Clone, Copy)]
pub struct CrawlerSettings {
    pub limit: u32,
    pub max_depth: u32,
    /// Rectangles are not split below this span in degrees.
    pub min_span: f64,
}

impl Default for CrawlerSettings {
    fn default() -> Self {
        Self {
            limit: crate::poi::PAGE_LIMIT,
            max_depth: 10,
            min_span: 0.0005,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub requests: usize,
    pub splits: usize,
    pub pages_saved: usize,
    pub chargers_saved: usize,
    pub fetch_failures: usize,
    pub store_failures: usize,
    pub truncated_at_bound: usize,
}

impl AddAssign for CrawlStats {
    fn add_assign(&mut self, rhs: Self) {
        self.requests += rhs.requests;
        self.splits += rhs.splits;
        self.pages_saved += rhs.pages_saved;
        self.chargers_saved += rhs.chargers_saved;
        self.fetch_failures += rhs.fetch_failures;
        self.store_failures += rhs.store_failures;
        self.truncated_at_bound += rhs.truncated_at_bound;
    }
}

impl std::fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} requests, {} splits, {} chargers in {} pages, {} failed fetches, {} failed pages, {} truncated pages kept",
            self.requests,
            self.splits,
            self.chargers_saved,
            self.pages_saved,
            self.fetch_failures,
            self.store_failures,
            self.truncated_at_bound
        )
    }
}

pub struct Crawler<S, T> {
    source: S,
    store: T,
    settings: CrawlerSettings,
}

impl<S: ChargerSource, T: ChargerStore> Crawler<S, T> {
    pub fn new(source: S, store: T, settings: CrawlerSettings) -> Self {
        Self {
            source,
            store,
            settings,
        }
    }

    pub fn into_store(self) -> T {
        self.store
    }

    fn can_split(&self, rect: &Rectangle, depth: u32) -> bool {
        depth < self.settings.max_depth
            && rect.lat_span() / 2.0 >= self.settings.min_span
            && rect.lon_span() / 2.0 >= self.settings.min_span
    }

    /// Crawl one rectangle and everything it has to be split into.
    pub async fn crawl_rectangle(&mut self, rect: Rectangle) -> CrawlStats {
        let mut stats = CrawlStats::default();
        let mut stack = vec![(rect, 0u32)];

        while let Some((rect, depth)) = stack.pop() {
            stats.requests += 1;
            let page = match self.source.search(&rect, self.settings.limit).await {
                Ok(page) => page,
                Err(err) => {
                    log::error!("Failed to fetch chargers for {rect:?}: {err}");
                    stats.fetch_failures += 1;
                    continue;
                }
            };

            if page.summary.total_results == self.settings.limit {
                if self.can_split(&rect, depth) {
                    log::debug!("Page for {rect:?} is truncated, splitting");
                    stats.splits += 1;
                    // reversed so the NW quadrant is crawled first
                    for quadrant in rect.quadrants().into_iter().rev() {
                        stack.push((quadrant, depth + 1));
                    }
                    continue;
                }
                log::warn!(
                    "Page for {rect:?} is still truncated at depth {depth}, keeping {} results",
                    page.results.len()
                );
                stats.truncated_at_bound += 1;
            }

            let count = page.results.len();
            match self.store.upsert_page(page) {
                Ok(saved) => {
                    log::info!("Saved {saved} chargers for {rect:?}");
                    stats.pages_saved += 1;
                    stats.chargers_saved += saved;
                }
                Err(err) => {
                    log::error!("Failed to save {count} chargers for {rect:?}: {err:#}");
                    stats.store_failures += 1;
                }
            }
        }

        stats
    }

    /// Crawl every tile in order and sum up the statistics.
    pub async fn run(&mut self, grid: &[Rectangle]) -> CrawlStats {
        let mut stats = CrawlStats::default();
        for (i, rect) in grid.iter().enumerate() {
            log::info!("Crawling tile {}/{}", i + 1, grid.len());
            stats += self.crawl_rectangle(*rect).await;
        }

        stats
    }
}
