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
use db_connector::{
    models::{
        chargers::{Charger, ChargerUpdate},
        connectors::Connector,
    },
    Pool,
};
use diesel::prelude::*;

use super::ChargerStore;
use crate::poi::types::SearchResponse;

pub struct PgChargerStore {
    pool: Pool,
}

impl PgChargerStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Insert or update a charger by its external id and replace its connectors.
/// Returns the stored id of the charger.
pub fn upsert_charger(
    conn: &mut PgConnection,
    charger: &Charger,
    new_connectors: Vec<Connector>,
) -> QueryResult<uuid::Uuid> {
    use db_connector::schema::{chargers, connectors};

    let charger_id: uuid::Uuid = diesel::insert_into(chargers::table)
        .values(charger)
        .on_conflict(chargers::external_id)
        .do_update()
        .set(&ChargerUpdate::from(charger))
        .returning(chargers::id)
        .get_result(conn)?;

    diesel::delete(connectors::table.filter(connectors::charger_id.eq(charger_id)))
        .execute(conn)?;

    let new_connectors: Vec<Connector> = new_connectors
        .into_iter()
        .map(|c| Connector { charger_id, ..c })
        .collect();
    if !new_connectors.is_empty() {
        diesel::insert_into(connectors::table)
            .values(&new_connectors)
            .execute(conn)?;
    }

    Ok(charger_id)
}

impl ChargerStore for PgChargerStore {
    fn upsert_page(&mut self, page: SearchResponse) -> anyhow::Result<usize> {
        let mut conn = self.pool.get().context("Failed to get a database connection")?;

        let count = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let mut count = 0;
                for result in page.results {
                    let (charger, connectors) = result.into_records();
                    upsert_charger(conn, &charger, connectors)?;
                    count += 1;
                }
                Ok(count)
            })
            .context("Failed to upsert page")?;

        Ok(count)
    }
}
