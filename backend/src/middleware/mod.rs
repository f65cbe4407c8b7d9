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

use actix_web::{http, HttpRequest};

pub mod jwt;

/// Token from the named cookie, or else from an `Authorization: Bearer` header.
pub fn get_token(req: &HttpRequest, name: &str) -> Option<String> {
    req.cookie(name).map(|c| c.value().to_string()).or_else(|| {
        let header = req.headers().get(http::header::AUTHORIZATION)?;
        let header = header.to_str().ok()?;
        let (scheme, token) = header.split_once(' ')?;
        if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
            Some(token.trim().to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{cookie::Cookie, test::TestRequest};

    use super::*;

    #[test]
    fn test_cookie_wins_over_header() {
        let req = TestRequest::get()
            .cookie(Cookie::new("access_token", "from-cookie"))
            .insert_header(("Authorization", "Bearer from-header"))
            .to_http_request();
        assert_eq!(get_token(&req, "access_token").as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_header() {
        let req = TestRequest::get()
            .insert_header(("Authorization", "bearer abc.def"))
            .to_http_request();
        assert_eq!(get_token(&req, "access_token").as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_malformed_header() {
        for value in ["abc", "Basic dXNlcjpwYXNz", "Bearer ", ""] {
            let req = TestRequest::get()
                .insert_header(("Authorization", value))
                .to_http_request();
            assert_eq!(get_token(&req, "access_token"), None, "{value}");
        }
    }
}
