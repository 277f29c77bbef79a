//! reqwest-backed client for the remote ticket API.

use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Handle to the remote ticket API. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Clone, Debug)]
pub struct HttpRepository {
    client: Client,
    base_url: String,
}

impl HttpRepository {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(base_url: &str) -> RepositoryResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `path` followed by `segment` as one percent-encoded path segment, so
    /// `?`, `#` and `/` inside `segment` cannot change the request target.
    pub(crate) fn segment_url(&self, path: &str, segment: &str) -> RepositoryResult<Url> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|err| RepositoryError::Unexpected(format!("invalid API URL: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                RepositoryError::Unexpected(format!("API URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }
}

/// `{code, message, data}` wrapper the API uses for mutations.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the envelope when its code equals `expected`, otherwise a
    /// [`RepositoryError::Rejected`] carrying the API message.
    pub fn expect_code(self, expected: u16, http_status: u16) -> RepositoryResult<Self> {
        let code = self.code.unwrap_or(http_status);
        if code == expected {
            Ok(self)
        } else {
            Err(RepositoryError::Rejected {
                code,
                message: self.message.unwrap_or_default(),
            })
        }
    }
}

/// Reads a JSON envelope, keeping the HTTP status for code fallback.
/// A 404 is [`RepositoryError::NotFound`]; a body that is not an envelope
/// is logged and dropped.
pub(crate) async fn read_envelope<T>(response: Response) -> RepositoryResult<(u16, ApiEnvelope<T>)>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(RepositoryError::NotFound);
    }
    let body = response.text().await?;
    if body.trim().is_empty() {
        let empty = ApiEnvelope {
            code: None,
            message: None,
            data: None,
        };
        return Ok((status.as_u16(), empty));
    }
    let envelope = serde_json::from_str::<ApiEnvelope<T>>(&body).map_err(|err| {
        if status.is_success() {
            RepositoryError::from(err)
        } else {
            RepositoryError::rejected_status(status.as_u16(), &body)
        }
    })?;
    Ok((status.as_u16(), envelope))
}
