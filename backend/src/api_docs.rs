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

pub use backend::*;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

struct JwtToken;

impl Modify for JwtToken {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    servers((url = "/api")),
    paths(
        routes::auth::login::login,
        routes::auth::register::register,
        routes::auth::reset_password::reset_password,
        routes::auth::reset_password::confirm_reset_password,
        routes::charger::get_chargers::get_chargers,
        routes::charger::get_charger::get_charger,
        routes::charger::charging_status::charging_status,
        routes::favorites::add::add_favorite,
        routes::favorites::get::get_favorites,
        routes::favorites::remove::remove_favorite,
        routes::user::get_user::get_user,
        routes::user::update_user::update_user,
        routes::user::delete::delete_user,
    ),
    components(schemas(
        routes::auth::login::LoginSchema,
        routes::auth::login::LoginResponse,
        routes::auth::register::RegisterSchema,
        routes::auth::reset_password::ResetPasswordSchema,
        routes::auth::reset_password::ConfirmResetSchema,
        routes::favorites::add::AddFavoriteSchema,
        routes::user::update_user::UpdateUserSchema,
        routes::user::update_user::UpdateUserResponse,
        models::charger::ChargerSchema,
        models::charger::ConnectorSchema,
        models::filtered_user::FilteredUser,
        poi::types::ConnectorAvailability,
    )),
    modifiers(&JwtToken)
)]
struct ApiDoc;

/**
 * Print the OpenAPI document of the backend to stdout.
 */
fn main() -> anyhow::Result<()> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);

    Ok(())
}
