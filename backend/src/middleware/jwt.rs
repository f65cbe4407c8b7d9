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

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    web, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::future::{ready, Ready};

use super::get_token;
use crate::{error::Error, models::token_claims::TokenClaims, AppState};

/// Rejects requests without a valid access token and stores the id of the
/// token's subject in the request extensions.
pub struct JwtMiddleware;

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Error = actix_web::Error;
    type Response = ServiceResponse<B>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type Transform = JwtService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtService { service }))
    }
}

// Trait to use JwtMiddleware as an extractor
impl FromRequest for JwtMiddleware {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Err(err) = validate_token(req) {
            return ready(Err(err.into()));
        }

        ready(Ok(JwtMiddleware {}))
    }
}

pub struct JwtService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for JwtService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(err) = validate_token(req.request()) {
            return Box::pin(async move { Err(err.into()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await })
    }
}

fn validate_token(req: &HttpRequest) -> Result<(), Error> {
    let Some(token) = get_token(req, "access_token") else {
        return Err(Error::Unauthorized);
    };

    let Some(data) = req.app_data::<web::Data<AppState>>() else {
        log::error!("AppState is missing");
        return Err(Error::InternalError);
    };
    let claims = match decode::<TokenClaims>(
        &token,
        &DecodingKey::from_secret(data.jwt_secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(claims) => claims.claims,
        Err(err) => {
            log::debug!("Rejected access token: {err}");
            return Err(Error::Unauthorized);
        }
    };

    let user_id = match uuid::Uuid::parse_str(claims.sub.as_str()) {
        Ok(id) => id,
        Err(_err) => return Err(Error::Unauthorized),
    };

    req.extensions_mut().insert::<uuid::Uuid>(user_id);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::uuid::Uuid, tests::configure, tests::JWT_SECRET, utils::generate_random_string};
    use actix_web::{cookie::Cookie, get, test, App, Responder};
    use chrono::{Duration, Utc};

    #[get("/hello")]
    async fn with_extractor(_: JwtMiddleware, uid: Uuid) -> impl Responder {
        uid.0.to_string()
    }

    #[get("/hello")]
    async fn without_extractor(uid: Uuid) -> impl Responder {
        uid.0.to_string()
    }

    fn token_for(id: uuid::Uuid, secret: &str) -> String {
        TokenClaims::new(id).encode(secret).unwrap()
    }

    #[actix_web::test]
    async fn test_valid_token_extractor() {
        let id = uuid::Uuid::new_v4();
        let app = App::new().configure(configure).service(with_extractor);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri("/hello")
            .cookie(Cookie::new("access_token", token_for(id, JWT_SECRET)))
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, id.to_string());
    }

    #[actix_web::test]
    async fn test_valid_bearer_middleware() {
        let id = uuid::Uuid::new_v4();
        let app = App::new()
            .configure(configure)
            .service(without_extractor)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri("/hello")
            .insert_header(("Authorization", format!("Bearer {}", token_for(id, JWT_SECRET))))
            .to_request();

        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, id.to_string());
    }

    #[actix_web::test]
    async fn test_no_token_extractor() {
        let app = App::new().configure(configure).service(with_extractor);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get().uri("/hello").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_no_token_middleware() {
        let app = App::new()
            .configure(configure)
            .service(without_extractor)
            .wrap(JwtMiddleware);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get().uri("/hello").to_request();

        let resp = test::try_call_service(&app, req).await;
        assert!(resp.is_err());
    }

    #[actix_web::test]
    async fn garbage_token() {
        let app = App::new().configure(configure).service(with_extractor);
        let app = test::init_service(app).await;

        let req = test::TestRequest::get()
            .uri("/hello")
            .cookie(Cookie::new("access_token", generate_random_string(1024)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn fake_token() {
        let app = App::new().configure(configure).service(with_extractor);
        let app = test::init_service(app).await;

        let token = token_for(uuid::Uuid::new_v4(), &generate_random_string(64));
        let req = test::TestRequest::get()
            .uri("/hello")
            .cookie(Cookie::new("access_token", token))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn expired_token() {
        let app = App::new().configure(configure).service(with_extractor);
        let app = test::init_service(app).await;

        let now = Utc::now();
        let claims = TokenClaims {
            sub: uuid::Uuid::new_v4().to_string(),
            iat: (now - Duration::hours(3)).timestamp() as usize,
            exp: (now - Duration::hours(2)).timestamp() as usize,
        };
        let req = test::TestRequest::get()
            .uri("/hello")
            .cookie(Cookie::new("access_token", claims.encode(JWT_SECRET).unwrap()))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
