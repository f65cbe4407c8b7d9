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

use actix_web::{get, web, HttpResponse, Responder};

use super::load_charger;
use crate::{error::Error, poi::types::ConnectorAvailability, utils::parse_uuid, AppState};

/// Live availability of a charger's connectors, keyed by connector type.
#[utoipa::path(
    params(("id" = String, Path, description = "Id of the charger")),
    responses(
        (status = 200, body = std::collections::BTreeMap<String, ConnectorAvailability>),
        (status = 400, description = "The charger has no availability data"),
        (status = 404, description = "Charger not found"),
        (status = 500, description = "The availability could not be fetched")
    )
)]
#[get("/charging-status/{id}")]
pub async fn charging_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let charger_id = parse_uuid(&path)?;
    let (charger, _) = load_charger(&state, charger_id).await?;

    let Some(reference) = charger.charging_availability else {
        return Err(Error::NoAvailabilityReference.into());
    };

    let status = match state.poi.charging_availability(&reference).await {
        Ok(status) => status,
        Err(err) => {
            log::error!("Failed to fetch availability of charger {charger_id}: {err}");
            return Err(Error::UpstreamError.into());
        }
    };

    Ok(HttpResponse::Ok().json(status))
}
