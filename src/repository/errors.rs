use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    /// The request never produced a usable HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered but refused the operation. `message` is the API's
    /// own user-facing text, or empty when it sent none.
    #[error("Request rejected ({code}): {message}")]
    Rejected { code: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    /// A request URL could not be built from the configured base URL.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Rejection for a non-success reply whose body is not meant for users.
    /// The body is logged, never carried.
    pub(crate) fn rejected_status(code: u16, body: &str) -> Self {
        log::warn!("API replied {code}: {body}");
        RepositoryError::Rejected {
            code,
            message: String::new(),
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::rejected_status(status.as_u16(), &err.to_string())
        } else if err.is_builder() {
            RepositoryError::Unexpected(err.to_string())
        } else {
            RepositoryError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_status_body_is_not_carried_to_users() {
        let err = RepositoryError::rejected_status(502, "<html>Bad Gateway</html>");
        assert!(matches!(
            err,
            RepositoryError::Rejected { code: 502, ref message } if message.is_empty()
        ));
    }
}
