//! Admin ticket board: the fetched set with its filter view, and bulk
//! status updates settled against per-row results.
//!
//! Filtering is client-side: a page view fetches the collection once and
//! every row is rendered, so switching filters never asks the server again.

use serde::Serialize;

use crate::domain::ticket::{StatusFilter, Ticket, TicketPatch};
use crate::domain::types::TicketId;
use crate::repository::errors::RepositoryResult;

/// Tickets fetched once per page view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TicketBoard {
    tickets: Vec<Ticket>,
}

impl TicketBoard {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Tickets visible under `filter`; never touches the server.
    pub fn filtered(&self, filter: StatusFilter) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|ticket| filter.matches(ticket))
            .collect()
    }
}

/// One `pending = target` update per selected ticket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkUpdate {
    target: bool,
    ids: Vec<TicketId>,
}

#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct BulkOutcome {
    pub target_pending: bool,
    pub updated: Vec<TicketId>,
    pub failed: Vec<TicketId>,
}

impl BulkOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl BulkUpdate {
    /// Selection as posted by the board; a repeated id is updated once.
    pub fn new(ids: impl IntoIterator<Item = TicketId>, target: bool) -> Self {
        let mut unique: Vec<TicketId> = Vec::new();
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self {
            target,
            ids: unique,
        }
    }

    pub fn ids(&self) -> &[TicketId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn patch(&self) -> TicketPatch {
        TicketPatch::pending(self.target)
    }

    /// Pairs every id with its settled result. Failed rows keep their stored
    /// flag server-side; the next board fetch shows them unchanged.
    pub fn settle<T>(self, results: Vec<RepositoryResult<T>>) -> BulkOutcome {
        let mut outcome = BulkOutcome {
            target_pending: self.target,
            ..BulkOutcome::default()
        };

        for (id, result) in self.ids.into_iter().zip(results) {
            match result {
                Ok(_) => outcome.updated.push(id),
                Err(err) => {
                    log::warn!("Ticket {id} kept its status after failed update: {err}");
                    outcome.failed.push(id);
                }
            }
        }

        outcome
    }
}
