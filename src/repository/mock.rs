//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::address::Address;
use crate::domain::auth::LoginOutcome;
use crate::domain::ticket::{NewTicket, Ticket, TicketPatch};
use crate::domain::types::{Document, PostalCode, TicketId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AddressLookup, Authenticator, CreatedTicket, DocumentValidation, DocumentValidator,
    TicketReader, TicketWriter,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl TicketReader for Repository {
        async fn list_tickets(&self) -> RepositoryResult<Vec<Ticket>>;
        async fn get_ticket_by_id(&self, id: &TicketId) -> RepositoryResult<Option<Ticket>>;
    }

    #[async_trait]
    impl TicketWriter for Repository {
        async fn create_ticket(&self, new_ticket: &NewTicket) -> RepositoryResult<CreatedTicket>;
        async fn update_ticket(&self, id: &TicketId, patch: &TicketPatch) -> RepositoryResult<String>;
        async fn delete_ticket(&self, id: &TicketId) -> RepositoryResult<String>;
    }

    #[async_trait]
    impl DocumentValidator for Repository {
        async fn validate_document(&self, document: &Document) -> RepositoryResult<DocumentValidation>;
    }

    #[async_trait]
    impl Authenticator for Repository {
        async fn login(&self, email: &str, password_md5: &str) -> RepositoryResult<LoginOutcome>;
    }
}

mock! {
    pub CepService {}

    #[async_trait]
    impl AddressLookup for CepService {
        async fn lookup_address(&self, cep: &PostalCode) -> RepositoryResult<Option<Address>>;
    }
}
