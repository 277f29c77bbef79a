use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::ticket::NewTicket;
use crate::domain::types::{Carrier, DecimalComma, ItemsQuantity, TypeConstraintError};
use crate::forms::{FieldErrors, FormError, field_errors, invalid};

/// Option value meaning "no carrier chosen".
pub const NO_CARRIER: &str = "default";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
/// Operator form for creating a shipping ticket.
pub struct TicketForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Informe a quantidade de items"),
        custom(function = "validate_quantity")
    )]
    pub items_quantity: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Informe um valor"),
        custom(function = "validate_decimal")
    )]
    pub purchase_value: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Informe o peso"),
        custom(function = "validate_decimal")
    )]
    pub weight: String,
    /// Carrier code, blank or [`NO_CARRIER`] when none.
    #[serde(default)]
    #[validate(custom(function = "validate_carrier"))]
    pub shipping: String,
}

fn validate_quantity(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.parse::<ItemsQuantity>().is_ok() {
        Ok(())
    } else {
        Err(invalid("quantity", "Informe uma quantidade válida"))
    }
}

fn validate_decimal(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || DecimalComma::new(value).is_ok() {
        Ok(())
    } else {
        Err(invalid("decimal", "Informe um número positivo, ex.: 150,00"))
    }
}

fn validate_carrier(value: &str) -> Result<(), ValidationError> {
    match parse_carrier(value) {
        Ok(_) => Ok(()),
        Err(_) => Err(invalid("carrier", "Selecione uma transportadora válida")),
    }
}

fn parse_carrier(value: &str) -> Result<Option<Carrier>, TypeConstraintError> {
    let value = value.trim();
    if value.is_empty() || value == NO_CARRIER {
        return Ok(None);
    }
    value.parse().map(Some)
}

impl TicketForm {
    /// Validation errors keyed by field; empty when the form can be submitted.
    pub fn field_errors(&self) -> FieldErrors {
        match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => field_errors(&errors),
        }
    }

    /// Converts the validated form into the create payload.
    pub fn to_new_ticket(&self) -> Result<NewTicket, FormError> {
        self.validate()?;

        let items_quantity = self
            .items_quantity
            .parse::<ItemsQuantity>()
            .map_err(|source| FormError::InvalidField {
                field: "items_quantity",
                source,
            })?;
        let purchase_value = DecimalComma::new(self.purchase_value.as_str()).map_err(|source| {
            FormError::InvalidField {
                field: "purchase_value",
                source,
            }
        })?;
        let weight = DecimalComma::new(self.weight.as_str())
            .map_err(|source| FormError::InvalidField { field: "weight", source })?
            .with_two_places();
        let shipping = parse_carrier(&self.shipping)
            .map_err(|source| FormError::InvalidField { field: "shipping", source })?;

        Ok(NewTicket::new(items_quantity, purchase_value, weight, shipping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(quantity: &str, value: &str, weight: &str, shipping: &str) -> TicketForm {
        TicketForm {
            items_quantity: quantity.to_string(),
            purchase_value: value.to_string(),
            weight: weight.to_string(),
            shipping: shipping.to_string(),
        }
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errors = TicketForm::default().field_errors();

        assert_eq!(errors["items_quantity"], "Informe a quantidade de items");
        assert_eq!(errors["purchase_value"], "Informe um valor");
        assert_eq!(errors["weight"], "Informe o peso");
        assert!(!errors.contains_key("shipping"));
    }

    #[test]
    fn shipping_is_optional() {
        let ticket = form("3", "150,00", "2,50", NO_CARRIER).to_new_ticket().unwrap();
        assert_eq!(ticket.shipping, None);
        assert!(ticket.pending);
        assert!(!ticket.filled);
    }

    #[test]
    fn dot_decimals_are_sent_with_commas() {
        let ticket = form("3", "150.00", "2.5", "SEDEX").to_new_ticket().unwrap();

        assert_eq!(ticket.items_quantity, 3);
        assert_eq!(ticket.purchase_value.as_str(), "150,00");
        assert_eq!(ticket.weight.as_str(), "2,50");
        assert_eq!(ticket.shipping, Some(Carrier::Sedex));
    }

    #[test]
    fn weight_is_sent_with_two_decimal_places() {
        let ticket = form("1", "99,90", "7", NO_CARRIER).to_new_ticket().unwrap();
        assert_eq!(ticket.weight.as_str(), "7,00");
        assert_eq!(ticket.purchase_value.as_str(), "99,90");
    }

    #[test]
    fn malformed_values_are_field_errors() {
        let errors = form("0", "R$ 10", "abc", "dhl").field_errors();

        assert_eq!(errors["items_quantity"], "Informe uma quantidade válida");
        assert_eq!(errors["purchase_value"], "Informe um número positivo, ex.: 150,00");
        assert_eq!(errors["weight"], "Informe um número positivo, ex.: 150,00");
        assert_eq!(errors["shipping"], "Selecione uma transportadora válida");
        assert!(form("0", "10", "1", "").to_new_ticket().is_err());
    }
}
