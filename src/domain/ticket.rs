use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::types::{
    Carrier, DecimalComma, Document, DocumentKind, ItemsQuantity, PostalCode, TicketId,
};

/// Shipping ticket as stored by the remote API.
///
/// Creation-time fields are always present; fill-time fields stay `None`
/// until the client submits the fill form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(alias = "_id")]
    pub id: TicketId,
    #[serde(default)]
    pub items_quantity: u32,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub purchase_value: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub weight: String,
    #[serde(default)]
    pub shipping: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub cep: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub filled: bool,
}

impl Ticket {
    /// Document variant implied by the stored document length, if any.
    pub fn document_kind(&self) -> Option<DocumentKind> {
        self.document
            .as_deref()
            .and_then(|document| DocumentKind::from_len(document.len()))
    }

    /// Parsed carrier, when the stored value is one of the supported codes.
    pub fn carrier(&self) -> Option<Carrier> {
        self.shipping.as_deref().and_then(|s| s.parse().ok())
    }

    /// Purchase value formatted as currency for display.
    pub fn purchase_value_brl(&self) -> String {
        DecimalComma::new(self.purchase_value.as_str())
            .map(|value| value.to_brl())
            .unwrap_or_else(|_| self.purchase_value.clone())
    }
}

/// Older API revisions send `weight` as a JSON number; accept both and keep
/// the comma-decimal string form.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string().replace('.', ","),
        Raw::Null => String::new(),
    })
}

/// Payload for `POST /api/data/ticket`.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub items_quantity: u32,
    pub purchase_value: DecimalComma,
    pub weight: DecimalComma,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "carrier_code")]
    pub shipping: Option<Carrier>,
    pub pending: bool,
    pub filled: bool,
}

impl NewTicket {
    /// New tickets always start pending and unfilled.
    #[must_use]
    pub fn new(
        items_quantity: ItemsQuantity,
        purchase_value: DecimalComma,
        weight: DecimalComma,
        shipping: Option<Carrier>,
    ) -> Self {
        Self {
            items_quantity: items_quantity.get(),
            purchase_value,
            weight,
            shipping,
            pending: true,
            filled: false,
        }
    }
}

fn carrier_code<S>(carrier: &Option<Carrier>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match carrier {
        Some(carrier) => serializer.serialize_str(carrier.code()),
        None => serializer.serialize_none(),
    }
}

/// Partial update for `PUT /api/data/ticket/{id}`; absent fields are left
/// untouched by the server.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
}

impl TicketPatch {
    /// Patch that only flips the `pending` flag.
    pub fn pending(pending: bool) -> Self {
        Self {
            pending: Some(pending),
            ..Self::default()
        }
    }
}

/// Client-submitted personal and address data.
#[derive(Clone, Debug, PartialEq)]
pub struct TicketFill {
    pub document: Document,
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub cep: PostalCode,
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub complement: Option<String>,
}

impl From<TicketFill> for TicketPatch {
    fn from(fill: TicketFill) -> Self {
        Self {
            pending: None,
            filled: Some(true),
            document: Some(fill.document.digits().to_string()),
            name: Some(fill.name),
            phone: fill.phone,
            email: Some(fill.email),
            cep: Some(fill.cep.into()),
            street: Some(fill.street),
            number: Some(fill.number),
            neighborhood: Some(fill.neighborhood),
            city: Some(fill.city),
            complement: fill.complement,
        }
    }
}

/// Admin list filter over the `pending` flag.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Tickets still awaiting label generation.
    Pending,
    /// Tickets whose label has been generated.
    Created,
}

impl StatusFilter {
    pub fn matches(self, ticket: &Ticket) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => ticket.pending,
            StatusFilter::Created => !ticket.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ticket_accepts_numeric_weight_and_mongo_id() {
        let ticket: Ticket = serde_json::from_value(json!({
            "_id": "64f1",
            "itemsQuantity": 3,
            "purchaseValue": "150,00",
            "weight": 2.5,
            "pending": true,
            "filled": false
        }))
        .unwrap();

        assert_eq!(ticket.id.as_str(), "64f1");
        assert_eq!(ticket.weight, "2,5");
        assert_eq!(ticket.purchase_value_brl(), "R$ 150,00");
        assert!(ticket.document.is_none());
    }

    #[test]
    fn new_ticket_is_pending_and_unfilled_on_the_wire() {
        let ticket = NewTicket::new(
            ItemsQuantity::new(3).unwrap(),
            DecimalComma::new("150,00").unwrap(),
            DecimalComma::new("2.50").unwrap(),
            Some(Carrier::Sedex),
        );

        assert_eq!(
            serde_json::to_value(&ticket).unwrap(),
            json!({
                "itemsQuantity": 3,
                "purchaseValue": "150,00",
                "weight": "2,50",
                "shipping": "sedex",
                "pending": true,
                "filled": false
            })
        );
    }

    #[test]
    fn patch_omits_absent_fields() {
        assert_eq!(
            serde_json::to_value(TicketPatch::pending(false)).unwrap(),
            json!({ "pending": false })
        );
    }

    #[test]
    fn fill_patch_marks_ticket_filled_and_omits_blank_complement() {
        let fill = TicketFill {
            document: Document::parse("123.456.789-09").unwrap(),
            name: "Maria".to_string(),
            phone: None,
            email: "maria@example.com".to_string(),
            cep: PostalCode::new("01310-100").unwrap(),
            street: "Av. Paulista".to_string(),
            number: "1000".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            complement: None,
        };

        let body = serde_json::to_value(TicketPatch::from(fill)).unwrap();

        assert_eq!(body["filled"], json!(true));
        assert_eq!(body["document"], json!("12345678909"));
        assert_eq!(body["cep"], json!("01310100"));
        assert!(body.get("complement").is_none());
        assert!(body.get("pending").is_none());
    }
}
