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

use std::num::NonZeroU32;

use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use governor::{
    clock::{Clock, QuantaClock, QuantaInstant},
    state::InMemoryState,
    NotUntil, Quota, RateLimiter,
};

fn ip_from_req(req: &HttpRequest) -> String {
    match req.connection_info().realip_remote_addr() {
        Some(ip) => ip.to_string(),
        None => {
            log::debug!("No ip found for route {}", req.path());
            String::from("unknown")
        }
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct LoginRateLimitKey {
    user: String,
    ip: String,
}

#[cfg(test)]
const REQUESTS_PER_SECOND: u32 = 1;

#[cfg(test)]
const REQUESTS_BURST: u32 = 5;

#[cfg(not(test))]
const REQUESTS_PER_SECOND: u32 = 5;

#[cfg(not(test))]
const REQUESTS_BURST: u32 = 25;

// RateLimiter for the login route
pub struct LoginRateLimiter(
    RateLimiter<
        LoginRateLimitKey,
        dashmap::DashMap<LoginRateLimitKey, InMemoryState>,
        QuantaClock,
        governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    >,
);

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        let quota = Quota::per_second(NonZeroU32::new(REQUESTS_PER_SECOND).unwrap_or(NonZeroU32::MIN))
            .allow_burst(NonZeroU32::new(REQUESTS_BURST).unwrap_or(NonZeroU32::MIN));
        Self(RateLimiter::keyed(quota))
    }

    pub fn check(&self, username: String, req: &HttpRequest) -> actix_web::Result<()> {
        let ip = ip_from_req(req);

        let key = LoginRateLimitKey { user: username, ip };
        if let Err(err) = self.0.check_key(&key) {
            log::warn!("RateLimiter triggered for {key:?}");
            let now = self.0.clock().now();

            Err(RateLimitError::new(err, now).into())
        } else {
            Ok(())
        }
    }
}

#[derive(Debug)]
struct RateLimitError {
    wait_time: NotUntil<QuantaInstant>,
    now: QuantaInstant,
}

impl RateLimitError {
    pub fn new(wait_time: NotUntil<QuantaInstant>, now: QuantaInstant) -> Self {
        Self { wait_time, now }
    }
}

impl std::fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let wait_time = self.wait_time.wait_time_from(self.now);
        write!(f, "Retry in {} seconds.", wait_time.as_secs())
    }
}

impl ResponseError for RateLimitError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        StatusCode::TOO_MANY_REQUESTS
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let wait_time = self.wait_time.wait_time_from(self.now);
        HttpResponse::TooManyRequests()
            .append_header(("retry-after", wait_time.as_secs()))
            .json(serde_json::json!({ "detail": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test;

    use super::LoginRateLimiter;

    #[actix_web::test]
    async fn test_login_rate_limiter() {
        let limiter = LoginRateLimiter::new();
        let req = test::TestRequest::post()
            .uri("/login")
            .insert_header(("X-Forwarded-For", "123.123.123.2"))
            .to_http_request();
        let username = "rate_limited".to_string();

        for _ in 0..5 {
            assert!(limiter.check(username.clone(), &req).is_ok());
        }
        let ret = limiter.check(username.clone(), &req);
        assert!(ret.is_err());
        let resp = ret.unwrap_err().error_response();
        assert_eq!(resp.status(), 429);

        let ret = limiter.check("someone_else".to_string(), &req);
        assert!(ret.is_ok());

        let req = test::TestRequest::post()
            .uri("/login")
            .insert_header(("X-Forwarded-For", "123.123.123.3"))
            .to_http_request();
        let ret = limiter.check(username, &req);
        assert!(ret.is_ok());
    }

    #[actix_web::test]
    async fn test_request_without_ip() {
        let limiter = LoginRateLimiter::new();
        let req = test::TestRequest::post().uri("/login").to_http_request();
        assert!(limiter.check("no_ip".to_string(), &req).is_ok());
    }
}
