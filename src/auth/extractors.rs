use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// The authenticated identity for the current request, taken from the
/// claims `AuthMiddleware` placed in request extensions.
///
/// Using this extractor on a route outside the middleware's protection is
/// a wiring mistake; it fails closed with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: i16,
}

impl FromRequest for AuthUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthUser {
                id: claims.id,
                email: claims.email,
                role: claims.role,
            })),
            None => {
                let err = AppError::Unauthorized("No token provided".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
