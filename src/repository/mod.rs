//! Access to the remote ticket API and the public postal-code service.
//!
//! All state lives server-side; implementations never cache between calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::address::Address;
use crate::domain::auth::LoginOutcome;
use crate::domain::ticket::{NewTicket, Ticket, TicketPatch};
use crate::domain::types::{Document, PostalCode, TicketId};
use crate::repository::errors::RepositoryResult;

pub mod address;
pub mod auth;
pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod ticket;

pub use address::CepLookup;
pub use http::HttpRepository;

/// Ticket returned by a successful create call together with the API's
/// user-facing message.
#[derive(Clone, Debug, PartialEq)]
pub struct CreatedTicket {
    pub message: String,
    pub ticket: Ticket,
}

/// Result of the remote CPF/CNPJ checksum validation.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentValidation {
    pub valid: bool,
    #[serde(default)]
    pub formatted: String,
}

#[async_trait]
pub trait TicketReader {
    /// Full collection, no pagination.
    async fn list_tickets(&self) -> RepositoryResult<Vec<Ticket>>;
    /// `Ok(None)` when the API has no record for `id`.
    async fn get_ticket_by_id(&self, id: &TicketId) -> RepositoryResult<Option<Ticket>>;
}

#[async_trait]
pub trait TicketWriter {
    async fn create_ticket(&self, new_ticket: &NewTicket) -> RepositoryResult<CreatedTicket>;
    /// Merges `patch` into the stored ticket, returning the API message.
    async fn update_ticket(&self, id: &TicketId, patch: &TicketPatch) -> RepositoryResult<String>;
    async fn delete_ticket(&self, id: &TicketId) -> RepositoryResult<String>;
}

#[async_trait]
pub trait DocumentValidator {
    async fn validate_document(&self, document: &Document)
    -> RepositoryResult<DocumentValidation>;
}

#[async_trait]
pub trait Authenticator {
    /// `password_md5` is the lower-case hex MD5 of the operator's password.
    async fn login(&self, email: &str, password_md5: &str) -> RepositoryResult<LoginOutcome>;
}

#[async_trait]
pub trait AddressLookup {
    /// `Ok(None)` when the postal code resolves to no address.
    async fn lookup_address(&self, cep: &PostalCode) -> RepositoryResult<Option<Address>>;
}
