use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::domain::ticket::{NewTicket, Ticket, TicketPatch};
use crate::domain::types::TicketId;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::http::{HttpRepository, read_envelope};
use crate::repository::{CreatedTicket, TicketReader, TicketWriter};

#[async_trait]
impl TicketReader for HttpRepository {
    async fn list_tickets(&self) -> RepositoryResult<Vec<Ticket>> {
        let response = self.client().get(self.url("/api/data/tickets")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::rejected_status(status.as_u16(), &body));
        }

        // Plain array, or the same array wrapped in `{data: [...]}`.
        let tickets = match response.json::<Value>().await? {
            Value::Array(items) => Value::Array(items),
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            other => other,
        };
        match tickets {
            Value::Array(_) => Ok(serde_json::from_value(tickets)?),
            Value::Null => Ok(Vec::new()),
            other => Err(RepositoryError::Decode(format!(
                "expected a ticket array, got {other}"
            ))),
        }
    }

    async fn get_ticket_by_id(&self, id: &TicketId) -> RepositoryResult<Option<Ticket>> {
        let response = self
            .client()
            .get(self.segment_url("/api/data/ticket", id.as_str())?)
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::rejected_status(status.as_u16(), &body));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        ticket_from_body(serde_json::from_str(&body)?)
    }
}

/// Interprets a ticket lookup body: `null` and `{error: ...}` both mean the
/// API holds no such ticket.
fn ticket_from_body(body: Value) -> RepositoryResult<Option<Ticket>> {
    let ticket = match body {
        Value::Null => return Ok(None),
        Value::Object(ref map) if map.contains_key("error") => return Ok(None),
        Value::Object(mut map) if map.contains_key("data") && !map.contains_key("id") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };
    if ticket.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(ticket)?))
}

#[async_trait]
impl TicketWriter for HttpRepository {
    async fn create_ticket(&self, new_ticket: &NewTicket) -> RepositoryResult<CreatedTicket> {
        let response = self
            .client()
            .post(self.url("/api/data/ticket"))
            .json(new_ticket)
            .send()
            .await?;
        let (status, envelope) = read_envelope::<Ticket>(response).await?;
        let envelope = envelope.expect_code(201, status)?;
        let ticket = envelope.data.ok_or_else(|| {
            RepositoryError::Decode("create reply carries no ticket".to_string())
        })?;

        Ok(CreatedTicket {
            message: envelope.message.unwrap_or_default(),
            ticket,
        })
    }

    async fn update_ticket(&self, id: &TicketId, patch: &TicketPatch) -> RepositoryResult<String> {
        let response = self
            .client()
            .put(self.segment_url("/api/data/ticket", id.as_str())?)
            .json(patch)
            .send()
            .await?;
        let (status, envelope) = read_envelope::<Value>(response).await?;
        let envelope = envelope.expect_code(200, status)?;
        Ok(envelope.message.unwrap_or_default())
    }

    async fn delete_ticket(&self, id: &TicketId) -> RepositoryResult<String> {
        let response = self
            .client()
            .delete(self.segment_url("/api/data/ticket", id.as_str())?)
            .send()
            .await?;
        let (status, envelope) = read_envelope::<Value>(response).await?;
        let envelope = envelope.expect_code(200, status)?;
        Ok(envelope.message.unwrap_or_default())
    }
}
