//! Signed-in operator extracted from the identity cookie.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest};
use serde::Serialize;

/// Operator allowed to create tickets and manage the board.
///
/// Extraction fails with `401 Unauthorized` when no identity is attached to
/// the request; [`crate::middleware::redirect_unauthorized`] turns that into
/// a redirect to the sign-in page.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Operator {
    pub email: String,
}

impl FromRequest for Operator {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let operator = req
            .get_identity()
            .ok()
            .and_then(|identity| identity.id().ok())
            .map(|email| Operator { email })
            .ok_or_else(|| ErrorUnauthorized("sign-in required"));
        ready(operator)
    }
}
