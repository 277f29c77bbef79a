//! Admin board and ticket detail services.

use futures::future::join_all;

use crate::domain::ticket::{StatusFilter, Ticket, TicketPatch};
use crate::domain::types::TicketId;
use crate::dto::tickets::BoardPageData;
use crate::flows::board::{BulkOutcome, BulkUpdate, TicketBoard};
use crate::repository::errors::RepositoryError;
use crate::repository::{TicketReader, TicketWriter};
use crate::services::{ServiceError, ServiceResult};

/// Fetches the full ticket collection once and renders every row, with
/// `filter` deciding which start out visible.
pub async fn load_board<R>(repo: &R, filter: StatusFilter) -> ServiceResult<BoardPageData>
where
    R: TicketReader + ?Sized,
{
    let tickets = repo.list_tickets().await.map_err(|e| {
        log::error!("Failed to list tickets: {e}");
        e
    })?;
    let board = TicketBoard::new(tickets);
    Ok(BoardPageData::new(&board, filter))
}

/// Sets `pending = target` on every posted id, one concurrent update per
/// id. Every call settles before the outcome is returned.
pub async fn bulk_update_status<R>(repo: &R, update: BulkUpdate) -> BulkOutcome
where
    R: TicketWriter + ?Sized,
{
    let patch = update.patch();
    let results = join_all(update.ids().iter().map(|id| repo.update_ticket(id, &patch))).await;

    let outcome = update.settle(results);
    log::info!(
        "Bulk status update to pending={}: {} updated, {} failed",
        outcome.target_pending,
        outcome.updated.len(),
        outcome.failed.len()
    );
    outcome
}

/// Loads one ticket for the admin detail view.
pub async fn load_ticket_details<R>(repo: &R, ticket_id: &str) -> ServiceResult<Ticket>
where
    R: TicketReader + ?Sized,
{
    let id = TicketId::new(ticket_id).map_err(|_| ServiceError::NotFound)?;
    match repo.get_ticket_by_id(&id).await {
        Ok(Some(ticket)) => Ok(ticket),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load ticket {id}: {e}");
            Err(e.into())
        }
    }
}

/// Flips one ticket's `pending` flag from the detail view.
pub async fn set_ticket_pending<R>(repo: &R, ticket_id: &str, pending: bool) -> ServiceResult<String>
where
    R: TicketWriter + ?Sized,
{
    let id = TicketId::new(ticket_id).map_err(|_| ServiceError::NotFound)?;
    match repo.update_ticket(&id, &TicketPatch::pending(pending)).await {
        Ok(message) => Ok(message),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update ticket {id}: {e}");
            Err(e.into())
        }
    }
}
