//! JSON helper called by the fill page's document blur handler.

use actix_web::{HttpResponse, Responder, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::types::DocumentKind;
use crate::repository::{DocumentValidation, HttpRepository};
use crate::services::ServiceError;
use crate::services::client_form::check_document;

#[derive(Deserialize)]
struct DocumentCheckRequest {
    kind: DocumentKind,
    document: String,
}

/// `checked` is false when the digit count was not ready for validation.
#[derive(Serialize)]
struct DocumentCheckResponse {
    checked: bool,
    #[serde(flatten)]
    validation: DocumentValidation,
}

#[post("/document")]
pub async fn api_check_document(
    repo: web::Data<HttpRepository>,
    web::Json(request): web::Json<DocumentCheckRequest>,
) -> impl Responder {
    match check_document(repo.get_ref(), request.kind, &request.document).await {
        Ok(validation) => HttpResponse::Ok().json(DocumentCheckResponse {
            checked: validation.is_some(),
            validation: validation.unwrap_or_default(),
        }),
        Err(ServiceError::TypeConstraint(_)) => HttpResponse::Ok().json(DocumentCheckResponse {
            checked: false,
            validation: DocumentValidation::default(),
        }),
        Err(e) => {
            log::error!("Failed to validate document: {e}");
            HttpResponse::BadGateway().finish()
        }
    }
}
