//! DTOs shaped for the ticket board, detail and summary templates.

use serde::Serialize;

use crate::domain::ticket::{StatusFilter, Ticket};
use crate::domain::types::DecimalComma;
use crate::flows::board::TicketBoard;

/// Placeholder for fill-time fields the client has not sent yet.
pub const NOT_AVAILABLE: &str = "N/A";

fn yes_no(value: bool) -> &'static str {
    if value { "Sim" } else { "Não" }
}

fn status_label(pending: bool) -> &'static str {
    if pending { "Pendente" } else { "Gerada" }
}

fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// One line of the admin ticket table. Rows outside the active filter are
/// rendered hidden so the browser can switch filters without a fetch.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TicketRowView {
    pub id: String,
    pub name: String,
    pub document: String,
    pub value: String,
    pub filled: &'static str,
    pub status: &'static str,
    pub pending: bool,
    pub visible: bool,
}

impl From<&Ticket> for TicketRowView {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            name: or_na(ticket.name.as_deref()),
            document: or_na(ticket.document.as_deref()),
            value: ticket.purchase_value_brl(),
            filled: yes_no(ticket.filled),
            status: status_label(ticket.pending),
            pending: ticket.pending,
            visible: true,
        }
    }
}

/// Ticket summary for the link-ready panel and the admin detail page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TicketSummaryView {
    pub id: String,
    pub items_quantity: u32,
    pub value: String,
    pub weight: String,
    pub carrier: String,
    pub status: &'static str,
    pub pending: bool,
    pub filled: bool,
    /// Label/value pairs of the client-supplied data, empty until filled.
    pub client_fields: Vec<(&'static str, String)>,
}

impl From<&Ticket> for TicketSummaryView {
    fn from(ticket: &Ticket) -> Self {
        let carrier = match ticket.carrier() {
            Some(carrier) => carrier.label().to_string(),
            None => or_na(ticket.shipping.as_deref()),
        };
        let weight = DecimalComma::new(ticket.weight.as_str())
            .map(|weight| format!("{} kg", weight.as_str()))
            .unwrap_or_else(|_| or_na(Some(ticket.weight.as_str())));

        let client_fields = if ticket.filled {
            let document_label = ticket.document_kind().map_or("Documento", |kind| kind.label());
            vec![
                (document_label, or_na(ticket.document.as_deref())),
                ("Nome", or_na(ticket.name.as_deref())),
                ("Telefone", or_na(ticket.phone.as_deref())),
                ("Email", or_na(ticket.email.as_deref())),
                ("CEP", or_na(ticket.cep.as_deref())),
                ("Rua", or_na(ticket.street.as_deref())),
                ("Número", or_na(ticket.number.as_deref())),
                ("Bairro", or_na(ticket.neighborhood.as_deref())),
                ("Cidade", or_na(ticket.city.as_deref())),
                ("Complemento", or_na(ticket.complement.as_deref())),
            ]
        } else {
            Vec::new()
        };

        Self {
            id: ticket.id.to_string(),
            items_quantity: ticket.items_quantity,
            value: ticket.purchase_value_brl(),
            weight,
            carrier,
            status: status_label(ticket.pending),
            pending: ticket.pending,
            filled: ticket.filled,
            client_fields,
        }
    }
}

/// Data required to render the ticket board template.
#[derive(Debug, Clone, Serialize)]
pub struct BoardPageData {
    /// Every fetched ticket, in API order.
    pub rows: Vec<TicketRowView>,
    /// Filter applied on first render.
    pub filter: StatusFilter,
    pub total: usize,
    /// Rows matching `filter`.
    pub visible: usize,
}

impl BoardPageData {
    pub fn new(board: &TicketBoard, filter: StatusFilter) -> Self {
        let rows: Vec<TicketRowView> = board
            .tickets()
            .iter()
            .map(|ticket| TicketRowView {
                visible: filter.matches(ticket),
                ..TicketRowView::from(ticket)
            })
            .collect();

        Self {
            visible: board.filtered(filter).len(),
            total: rows.len(),
            rows,
            filter,
        }
    }
}
