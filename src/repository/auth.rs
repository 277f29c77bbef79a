use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::domain::auth::{LoginField, LoginOutcome, LoginRejection, Session};
use crate::domain::types::Document;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::http::HttpRepository;
use crate::repository::{Authenticator, DocumentValidation, DocumentValidator};

const INVALID_CREDENTIALS: &str = "Email ou senha inválidos";

#[async_trait]
impl DocumentValidator for HttpRepository {
    async fn validate_document(
        &self,
        document: &Document,
    ) -> RepositoryResult<DocumentValidation> {
        let response = self
            .client()
            .post(self.url("/api/data/document"))
            .json(&json!({ "document": document.digits() }))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<DocumentValidation>().await?)
    }
}

#[async_trait]
impl Authenticator for HttpRepository {
    async fn login(&self, email: &str, password_md5: &str) -> RepositoryResult<LoginOutcome> {
        let response = self
            .client()
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password_md5 }))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
        login_outcome(email, status, &text, &body)
    }
}

/// Maps the login reply onto a session or a field-scoped rejection. Only a
/// 2xx reply without an error marker is a session; every 4xx is a rejection.
fn login_outcome(
    email: &str,
    status: StatusCode,
    text: &str,
    body: &Value,
) -> RepositoryResult<LoginOutcome> {
    let failed = match body.get("error") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(_) => true,
    };

    if status.is_success() && !failed {
        if !body.is_object() {
            return Err(RepositoryError::Decode(
                "login reply is not a JSON object".to_string(),
            ));
        }
        let token = ["token", "accessToken"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string);
        return Ok(LoginOutcome::Authenticated(Session {
            email: email.to_string(),
            token,
        }));
    }

    if !status.is_success() && !status.is_client_error() {
        return Err(RepositoryError::rejected_status(status.as_u16(), text));
    }

    let flag = |key: &str| body.get(key).and_then(Value::as_bool).unwrap_or(false);
    let field = if flag("isEmailError") {
        LoginField::Email
    } else {
        LoginField::Password
    };
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|message| failed && !message.trim().is_empty())
        .unwrap_or(INVALID_CREDENTIALS)
        .to_string();

    Ok(LoginOutcome::Rejected(LoginRejection { field, message }))
}
