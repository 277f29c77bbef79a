//! Client-facing fill form: loading, blur-time checks and submission.

use crate::domain::ticket::TicketPatch;
use crate::domain::types::{Document, DocumentKind, TicketId};
use crate::flows::fill::{FillEditor, FillFlow};
use crate::forms::client::ClientFillForm;
use crate::repository::{
    AddressLookup, DocumentValidation, DocumentValidator, TicketReader, TicketWriter,
};
use crate::services::ServiceResult;

/// Fetches the ticket behind a fill link and resolves the page state.
pub async fn load_fill_flow<R>(repo: &R, ticket_id: &str) -> FillFlow
where
    R: TicketReader + ?Sized,
{
    let Ok(id) = TicketId::new(ticket_id) else {
        return FillFlow::NotFound;
    };

    let lookup = repo.get_ticket_by_id(&id).await;
    if let Err(err) = &lookup {
        log::error!("Failed to load ticket {id}: {err}");
    }
    FillFlow::resolve(lookup)
}

/// Remote checksum validation for the document field's blur handler.
/// Returns `Ok(None)` without calling the API while the digit count does not
/// match `kind`.
pub async fn check_document<R>(
    repo: &R,
    kind: DocumentKind,
    raw: &str,
) -> ServiceResult<Option<DocumentValidation>>
where
    R: DocumentValidator + ?Sized,
{
    if !kind.is_complete(raw) {
        return Ok(None);
    }
    let document = Document::parse(raw)?;
    let validation = repo.validate_document(&document).await?;
    Ok(Some(validation))
}

/// Autofills street, neighborhood and city from the posted postal code,
/// overwriting what the client typed there. The lookup only runs once the
/// code has exactly eight digits; an unknown code leaves the form as posted.
pub async fn autofill_address<R, L>(
    repo: &R,
    lookup: &L,
    ticket_id: &str,
    form: ClientFillForm,
) -> FillFlow
where
    R: TicketReader + ?Sized,
    L: AddressLookup + ?Sized,
{
    let mut flow = load_fill_flow(repo, ticket_id).await.with_form(form);
    let Some(cep) = flow.editor().and_then(FillEditor::postal_code_to_lookup) else {
        return flow;
    };

    match lookup.lookup_address(&cep).await {
        Ok(Some(address)) => {
            if let Some(editor) = flow.editor_mut() {
                editor.apply_address(address);
            }
        }
        Ok(None) => log::info!("No address for CEP {cep}"),
        Err(err) => log::warn!("Failed to look up CEP {cep}: {err}"),
    }
    flow
}

/// Makes the posted document kind active, clearing the other document field.
pub async fn switch_document_kind<R>(repo: &R, ticket_id: &str, form: ClientFillForm) -> FillFlow
where
    R: TicketReader + ?Sized,
{
    let kind = form.document_kind;
    let mut flow = load_fill_flow(repo, ticket_id).await.with_form(form);
    if let Some(editor) = flow.editor_mut() {
        editor.toggle_document_kind(kind);
    }
    flow
}

/// Submits the posted fill form: re-checks the ticket, validates the
/// document remotely, then sends the update.
pub async fn submit_fill<R>(repo: &R, ticket_id: &str, form: ClientFillForm) -> FillFlow
where
    R: TicketReader + TicketWriter + DocumentValidator + ?Sized,
{
    let mut flow = load_fill_flow(repo, ticket_id).await.with_form(form);
    let Some(document) = flow.editor().map(FillEditor::document_to_validate) else {
        return flow;
    };

    if let Some(document) = document {
        match repo.validate_document(&document).await {
            Ok(validation) => {
                let accepted = flow
                    .editor_mut()
                    .is_some_and(|editor| editor.apply_document_validation(&validation));
                if !accepted {
                    log::info!("Document rejected for ticket {ticket_id}");
                    return flow;
                }
            }
            Err(err) => {
                log::error!("Failed to validate document: {err}");
                return flow.abort(&err);
            }
        }
    }

    let flow = flow.submit();
    let Some(fill) = flow.payload() else {
        return flow;
    };
    let Some(id) = flow.editor().map(|editor| editor.ticket_id.clone()) else {
        return flow;
    };

    let result = repo.update_ticket(&id, &TicketPatch::from(fill)).await;
    match &result {
        Ok(_) => log::info!("Ticket {id} filled by client"),
        Err(err) => log::error!("Failed to save ticket {id}: {err}"),
    }
    flow.finish(result)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::address::Address;
    use crate::domain::ticket::Ticket;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::{MockCepService, MockRepository};

    fn ticket(filled: bool) -> Ticket {
        serde_json::from_value(json!({
            "id": "t-1",
            "itemsQuantity": 3,
            "purchaseValue": "150,00",
            "weight": "2,50",
            "pending": true,
            "filled": filled
        }))
        .unwrap()
    }

    fn form() -> ClientFillForm {
        ClientFillForm {
            document_kind: DocumentKind::Cpf,
            cpf: "123.456.789-09".to_string(),
            cnpj: String::new(),
            name: "Maria Souza".to_string(),
            phone: "(11) 98765-4321".to_string(),
            email: "maria@example.com".to_string(),
            cep: "01310-100".to_string(),
            street: "Av. Paulista".to_string(),
            number: "1000".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            complement: String::new(),
        }
    }

    fn valid_document(repo: &mut MockRepository) {
        repo.expect_validate_document().returning(|_| {
            Ok(DocumentValidation {
                valid: true,
                formatted: "123.456.789-09".to_string(),
            })
        });
    }

    #[actix_web::test]
    async fn unknown_ticket_renders_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(None));

        let flow = load_fill_flow(&repo, "missing").await;

        assert_eq!(flow, FillFlow::NotFound);
    }

    #[actix_web::test]
    async fn filled_ticket_renders_already_filled() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(Some(ticket(true))));

        assert_eq!(load_fill_flow(&repo, "t-1").await, FillFlow::AlreadyFilled);
    }

    #[actix_web::test]
    async fn successful_submit_sends_filled_patch() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(Some(ticket(false))));
        valid_document(&mut repo);
        repo.expect_update_ticket()
            .withf(|id, patch| {
                id.as_str() == "t-1"
                    && patch.filled == Some(true)
                    && patch.document.as_deref() == Some("12345678909")
                    && patch.phone.as_deref() == Some("11987654321")
                    && patch.complement.is_none()
                    && patch.pending.is_none()
            })
            .times(1)
            .returning(|_, _| Ok("Dados salvos".to_string()));

        let flow = submit_fill(&repo, "t-1", form()).await;

        assert_eq!(
            flow,
            FillFlow::Done {
                message: "Dados salvos".to_string()
            }
        );
    }

    #[actix_web::test]
    async fn invalid_document_blocks_the_update() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(Some(ticket(false))));
        repo.expect_validate_document().times(1).returning(|_| {
            Ok(DocumentValidation {
                valid: false,
                formatted: String::new(),
            })
        });
        repo.expect_update_ticket().never();

        let flow = submit_fill(&repo, "t-1", form()).await;

        assert_eq!(flow.state_name(), "editing");
        assert_eq!(flow.editor().unwrap().errors["cpf"], "CPF inválido");
    }

    #[actix_web::test]
    async fn rejected_save_is_not_reported_as_missing_ticket() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(Some(ticket(false))));
        valid_document(&mut repo);
        repo.expect_update_ticket().returning(|_, _| {
            Err(RepositoryError::Rejected {
                code: 500,
                message: String::new(),
            })
        });

        let flow = submit_fill(&repo, "t-1", form()).await;

        assert_eq!(flow.state_name(), "save_rejected");
        assert_eq!(flow.editor().unwrap().form.name, "Maria Souza");
    }

    #[actix_web::test]
    async fn submit_against_filled_ticket_does_not_update() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(Some(ticket(true))));
        repo.expect_validate_document().never();
        repo.expect_update_ticket().never();

        assert_eq!(submit_fill(&repo, "t-1", form()).await, FillFlow::AlreadyFilled);
    }

    #[actix_web::test]
    async fn document_check_skips_incomplete_numbers() {
        let mut repo = MockRepository::new();
        repo.expect_validate_document()
            .withf(|document| document.digits() == "12345678000195")
            .times(1)
            .returning(|_| {
                Ok(DocumentValidation {
                    valid: true,
                    formatted: "12.345.678/0001-95".to_string(),
                })
            });

        assert!(
            check_document(&repo, DocumentKind::Cpf, "12.345.678/0001-95")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            check_document(&repo, DocumentKind::Cnpj, "12.345.678/0001")
                .await
                .unwrap()
                .is_none()
        );
        let validation = check_document(&repo, DocumentKind::Cnpj, "12.345.678/0001-95")
            .await
            .unwrap()
            .unwrap();
        assert!(validation.valid);
    }

    fn paulista() -> Address {
        Address {
            street: "Avenida Paulista".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
        }
    }

    #[actix_web::test]
    async fn address_autofill_overwrites_typed_address() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(Some(ticket(false))));
        let mut lookup = MockCepService::new();
        lookup
            .expect_lookup_address()
            .withf(|cep| cep.as_str() == "01310100")
            .times(1)
            .returning(|_| Ok(Some(paulista())));
        let typed = ClientFillForm {
            street: "Rua Antiga".to_string(),
            neighborhood: "Centro".to_string(),
            city: "Campinas".to_string(),
            ..form()
        };

        let flow = autofill_address(&repo, &lookup, "t-1", typed).await;

        let editor = flow.editor().unwrap();
        assert_eq!(editor.form.street, "Avenida Paulista");
        assert_eq!(editor.form.neighborhood, "Bela Vista");
        assert_eq!(editor.form.city, "São Paulo");
        assert_eq!(editor.form.number, "1000");
    }

    #[actix_web::test]
    async fn incomplete_postal_code_is_not_looked_up() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(Some(ticket(false))));
        let mut lookup = MockCepService::new();
        lookup.expect_lookup_address().never();
        let partial = ClientFillForm {
            cep: "01310".to_string(),
            ..form()
        };

        let flow = autofill_address(&repo, &lookup, "t-1", partial).await;

        assert_eq!(flow.editor().unwrap().form.street, "Av. Paulista");
    }

    #[actix_web::test]
    async fn switching_document_kind_clears_the_other_field() {
        let mut repo = MockRepository::new();
        repo.expect_get_ticket_by_id().returning(|_| Ok(Some(ticket(false))));
        let posted = ClientFillForm {
            document_kind: DocumentKind::Cnpj,
            cnpj: "12.345.678/0001-95".to_string(),
            ..form()
        };

        let flow = switch_document_kind(&repo, "t-1", posted).await;

        let editor = flow.editor().unwrap();
        assert_eq!(editor.form.document_kind, DocumentKind::Cnpj);
        assert!(editor.form.cpf.is_empty());
        assert_eq!(editor.form.cnpj, "12.345.678/0001-95");
    }
}
