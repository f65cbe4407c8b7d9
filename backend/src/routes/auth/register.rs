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

use actix_web::{post, web, HttpResponse, Responder};
use actix_web_validator::Json;
use db_connector::models::users::User;
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error::DatabaseError, Error::NotFound},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::Error,
    models::filtered_user::FilteredUser,
    utils::{get_connection, web_block_unpacked},
    AppState,
};

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct RegisterSchema {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Map a unique violation on `users` to the field that collided.
pub fn conflict_from_db_error(err: diesel::result::Error) -> Error {
    match err {
        DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            if info.constraint_name().is_some_and(|c| c.contains("email")) {
                Error::EmailAlreadyExists
            } else {
                Error::UsernameAlreadyExists
            }
        }
        err => {
            log::error!("Failed to write user: {err}");
            Error::InternalError
        }
    }
}

/// Fail with a conflict when `name` or `mail` belongs to a user other than `except`.
pub fn check_taken(
    conn: &mut PgConnection,
    name: Option<&str>,
    mail: Option<&str>,
    except: Option<uuid::Uuid>,
) -> Result<(), Error> {
    use db_connector::schema::users::dsl::*;

    if let Some(name) = name {
        match users
            .filter(username.eq(name))
            .select(User::as_select())
            .get_result(conn)
        {
            Err(NotFound) => (),
            Ok(u) if Some(u.id) == except => (),
            Ok(_) => return Err(Error::UsernameAlreadyExists),
            Err(_err) => return Err(Error::InternalError),
        }
    }

    if let Some(mail) = mail {
        match users
            .filter(email.eq(mail))
            .select(User::as_select())
            .get_result(conn)
        {
            Err(NotFound) => (),
            Ok(u) if Some(u.id) == except => (),
            Ok(_) => return Err(Error::EmailAlreadyExists),
            Err(_err) => return Err(Error::InternalError),
        }
    }

    Ok(())
}

/// Register a new user.
#[utoipa::path(
    request_body = RegisterSchema,
    responses(
        (status = 201, description = "Registration was successful", body = FilteredUser),
        (status = 400, description = "The payload is invalid"),
        (status = 409, description = "Username or email is already taken")
    )
)]
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    data: Json<RegisterSchema>,
) -> actix_web::Result<impl Responder> {
    use db_connector::schema::users::dsl::*;

    let data = data.into_inner();
    let user_mail = data.email.to_lowercase();

    let mut conn = get_connection(&state)?;
    {
        let name = data.username.clone();
        let mail = user_mail.clone();
        web_block_unpacked(move || check_taken(&mut conn, Some(&name), Some(&mail), None)).await?;
    }

    let password_hash = state.hasher.hash_password(data.password).await?;

    let user = User {
        id: uuid::Uuid::new_v4(),
        username: data.username,
        email: user_mail,
        password: password_hash,
        created_at: chrono::Utc::now().naive_utc(),
    };

    let mut conn = get_connection(&state)?;
    let user = web_block_unpacked(move || {
        match diesel::insert_into(users).values(&user).execute(&mut conn) {
            Ok(_) => Ok(user),
            Err(err) => Err(conflict_from_db_error(err)),
        }
    })
    .await?;

    log::info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(FilteredUser::from(user)))
}
