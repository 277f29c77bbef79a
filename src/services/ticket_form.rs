//! Ticket creation by the operator.

use crate::flows::creation::CreationFlow;
use crate::forms::ticket::TicketForm;
use crate::repository::TicketWriter;

/// Runs one submission of the creation form and returns the resulting
/// state: `Editing` when the form is invalid, `LinkReady` on a 201 reply and
/// `Failed` otherwise.
pub async fn create_ticket<R>(repo: &R, form: TicketForm, page_url: &str) -> CreationFlow
where
    R: TicketWriter + ?Sized,
{
    let flow = CreationFlow::editing(form).submit();
    let Some(payload) = flow.payload().cloned() else {
        return flow;
    };

    let result = repo.create_ticket(&payload).await;
    match &result {
        Ok(created) => log::info!("Created ticket {}", created.ticket.id),
        Err(err) => log::error!("Failed to create ticket: {err}"),
    }

    flow.finish(result, page_url)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::repository::CreatedTicket;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;

    fn scenario_form() -> TicketForm {
        TicketForm {
            items_quantity: "3".to_string(),
            purchase_value: "150,00".to_string(),
            weight: "2,50".to_string(),
            shipping: "SEDEX".to_string(),
        }
    }

    #[actix_web::test]
    async fn created_ticket_produces_link_with_its_id() {
        let mut repo = MockRepository::new();
        repo.expect_create_ticket()
            .withf(|ticket| {
                serde_json::to_value(ticket).unwrap()
                    == json!({
                        "itemsQuantity": 3,
                        "purchaseValue": "150,00",
                        "weight": "2,50",
                        "shipping": "sedex",
                        "pending": true,
                        "filled": false
                    })
            })
            .times(1)
            .returning(|_| {
                Ok(CreatedTicket {
                    message: "Etiqueta criada com sucesso!".to_string(),
                    ticket: serde_json::from_value(json!({
                        "id": "65a0c1",
                        "itemsQuantity": 3,
                        "purchaseValue": "150,00",
                        "weight": "2,50",
                        "shipping": "sedex",
                        "pending": true,
                        "filled": false
                    }))
                    .unwrap(),
                })
            });

        let flow = create_ticket(&repo, scenario_form(), "http://localhost:8080/form").await;

        let CreationFlow::LinkReady(ready) = flow else {
            panic!("expected link ready, got {}", flow.state_name());
        };
        assert_eq!(ready.ticket.id.as_str(), "65a0c1");
        assert_eq!(ready.link, "http://localhost:8080/client/65a0c1");
    }

    #[actix_web::test]
    async fn rejected_create_is_a_failed_state_not_a_busy_one() {
        let mut repo = MockRepository::new();
        repo.expect_create_ticket().times(1).returning(|_| {
            Err(RepositoryError::Rejected {
                code: 400,
                message: "Dados inválidos".to_string(),
            })
        });

        let flow = create_ticket(&repo, scenario_form(), "http://localhost:8080/form").await;

        assert!(!flow.is_busy());
        assert_eq!(
            flow,
            CreationFlow::Failed {
                form: scenario_form(),
                message: "Dados inválidos".to_string(),
            }
        );
    }

    #[actix_web::test]
    async fn invalid_form_is_not_sent() {
        let mut repo = MockRepository::new();
        repo.expect_create_ticket().never();

        let flow = create_ticket(&repo, TicketForm::default(), "http://localhost:8080/form").await;

        assert_eq!(flow.state_name(), "editing");
    }
}
