//! Request middleware for operator-only scopes.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::middleware::Next;
use actix_web::{Error, HttpResponse};
use actix_web_flash_messages::FlashMessage;

/// Where unauthenticated operators are sent.
pub const SIGN_IN_PATH: &str = "/";

/// Turns `401 Unauthorized` responses into a `303` redirect to the sign-in
/// page with an error flash. Mount with
/// [`actix_web::middleware::from_fn`] inside the flash-message framework.
pub async fn redirect_unauthorized<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody,
{
    let res = next.call(req).await?;
    if res.status() != StatusCode::UNAUTHORIZED {
        return Ok(res.map_into_left_body());
    }

    log::info!("Redirecting unauthenticated request for {}", res.request().path());
    FlashMessage::error("Faça login para continuar.".to_string()).send();
    let (req, _) = res.into_parts();
    let redirect = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, SIGN_IN_PATH))
        .finish();
    Ok(ServiceResponse::new(req, redirect).map_into_right_body())
}
