//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (digits-only documents, comma
//! decimals, positive quantities) so that once a value reaches the domain
//! layer it can be sent to the remote API as-is.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided quantity is zero or not a number.
    #[error("quantity must be a positive integer")]
    NonPositiveQuantity,
    /// Provided decimal could not be parsed or was not positive.
    #[error("invalid decimal value: {0}")]
    InvalidDecimal(String),
    /// Document digit count matches neither CPF nor CNPJ.
    #[error("document must have 11 or 14 digits, got {0}")]
    InvalidDocumentLength(usize),
    /// Postal code does not have exactly eight digits.
    #[error("postal code must have 8 digits")]
    InvalidPostalCode,
    /// Carrier code is not one of the supported carriers.
    #[error("unknown carrier: {0}")]
    UnknownCarrier(String),
}

/// Removes every non-digit character from `value`.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Server-assigned ticket identifier.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct TicketId(String);

impl TicketId {
    /// Trims whitespace and rejects empty identifiers.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the identifier as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TicketId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TicketId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TicketId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TicketId> for String {
    fn from(value: TicketId) -> Self {
        value.0
    }
}

/// Number of items in a shipment, always greater than zero.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub struct ItemsQuantity(u32);

impl ItemsQuantity {
    pub fn new(value: u32) -> Result<Self, TypeConstraintError> {
        if value == 0 {
            return Err(TypeConstraintError::NonPositiveQuantity);
        }
        Ok(Self(value))
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ItemsQuantity {
    type Error = TypeConstraintError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ItemsQuantity> for u32 {
    fn from(value: ItemsQuantity) -> Self {
        value.0
    }
}

impl FromStr for ItemsQuantity {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|_| TypeConstraintError::NonPositiveQuantity)?;
        Self::new(value)
    }
}

/// Positive decimal kept in its wire form: digits with a comma as the
/// fractional separator (`"150,00"`, `"2,5"`, `"7"`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct DecimalComma(String);

impl DecimalComma {
    /// Accepts `150`, `150,00` or `150.00` and normalizes the separator to a comma.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }

        let normalized = trimmed.replace('.', ",");
        let mut parts = normalized.splitn(2, ',');
        let integer = parts.next().unwrap_or_default();
        let fraction = parts.next();

        let well_formed = !integer.is_empty()
            && integer.chars().all(|c| c.is_ascii_digit())
            && fraction.is_none_or(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()));
        if !well_formed {
            return Err(TypeConstraintError::InvalidDecimal(raw));
        }

        let decimal = Self(normalized);
        if decimal.to_f64() <= 0.0 {
            return Err(TypeConstraintError::InvalidDecimal(raw));
        }
        Ok(decimal)
    }

    /// Borrow the comma-decimal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, for display and comparisons only.
    pub fn to_f64(&self) -> f64 {
        self.0.replace(',', ".").parse().unwrap_or(0.0)
    }

    /// Same value rounded to two decimal places: `7` becomes `7,00`.
    pub fn with_two_places(&self) -> Self {
        Self(format!("{:.2}", self.to_f64()).replace('.', ","))
    }

    /// Formats the value as Brazilian currency, e.g. `R$ 1.234,50`.
    pub fn to_brl(&self) -> String {
        format_brl(self.to_f64())
    }
}

impl Display for DecimalComma {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DecimalComma {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DecimalComma> for String {
    fn from(value: DecimalComma) -> Self {
        value.0
    }
}

/// Formats an amount as `R$ 1.234,56`.
pub fn format_brl(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let (sign, cents) = if cents < 0 { ("-", -cents) } else { ("", cents) };
    let integer = (cents / 100).to_string();

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{sign}R$ {grouped},{:02}", cents % 100)
}

/// Which identity document the client is filling in.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Individual taxpayer id, 11 digits.
    #[default]
    Cpf,
    /// Organization taxpayer id, 14 digits.
    Cnpj,
}

impl DocumentKind {
    pub const fn expected_len(self) -> usize {
        match self {
            DocumentKind::Cpf => 11,
            DocumentKind::Cnpj => 14,
        }
    }

    /// Picks the variant by digit count.
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            11 => Some(DocumentKind::Cpf),
            14 => Some(DocumentKind::Cnpj),
            _ => None,
        }
    }

    /// Whether `raw` holds exactly the number of digits this variant needs,
    /// which is the only moment remote validation is worth calling.
    pub fn is_complete(self, raw: &str) -> bool {
        digits_only(raw).len() == self.expected_len()
    }

    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::Cpf => "CPF",
            DocumentKind::Cnpj => "CNPJ",
        }
    }

    /// Form field name carrying this variant.
    pub const fn field(self) -> &'static str {
        match self {
            DocumentKind::Cpf => "cpf",
            DocumentKind::Cnpj => "cnpj",
        }
    }
}

/// Digits-only identity document, tagged by its variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Document {
    Cpf(String),
    Cnpj(String),
}

impl Document {
    /// Strips formatting and classifies the document by its digit count.
    pub fn parse(raw: &str) -> Result<Self, TypeConstraintError> {
        let digits = digits_only(raw);
        match DocumentKind::from_len(digits.len()) {
            Some(DocumentKind::Cpf) => Ok(Document::Cpf(digits)),
            Some(DocumentKind::Cnpj) => Ok(Document::Cnpj(digits)),
            None => Err(TypeConstraintError::InvalidDocumentLength(digits.len())),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Cpf(_) => DocumentKind::Cpf,
            Document::Cnpj(_) => DocumentKind::Cnpj,
        }
    }

    pub fn digits(&self) -> &str {
        match self {
            Document::Cpf(digits) | Document::Cnpj(digits) => digits,
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digits())
    }
}

/// Brazilian postal code (CEP), eight digits.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    pub const LEN: usize = 8;

    pub fn new(raw: &str) -> Result<Self, TypeConstraintError> {
        let digits = digits_only(raw);
        if digits.len() != Self::LEN {
            return Err(TypeConstraintError::InvalidPostalCode);
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PostalCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.0
    }
}

/// Supported shipping carriers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    Pac,
    Sedex,
    Pex,
}

impl Carrier {
    pub const ALL: [Carrier; 3] = [Carrier::Pac, Carrier::Sedex, Carrier::Pex];

    /// Lower-case code sent to the API.
    pub const fn code(self) -> &'static str {
        match self {
            Carrier::Pac => "pac",
            Carrier::Sedex => "sedex",
            Carrier::Pex => "pex",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Carrier::Pac => "PAC",
            Carrier::Sedex => "SEDEX",
            Carrier::Pex => "PEX",
        }
    }
}

impl FromStr for Carrier {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Carrier::ALL
            .into_iter()
            .find(|carrier| carrier.code() == code)
            .ok_or_else(|| TypeConstraintError::UnknownCarrier(s.to_string()))
    }
}

impl Display for Carrier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_variant_follows_digit_count() {
        assert_eq!(
            Document::parse("123.456.789-09").unwrap(),
            Document::Cpf("12345678909".to_string())
        );
        assert_eq!(
            Document::parse("12.345.678/0001-95").unwrap().kind(),
            DocumentKind::Cnpj
        );
        assert_eq!(
            Document::parse("1234567890"),
            Err(TypeConstraintError::InvalidDocumentLength(10))
        );
        assert_eq!(
            Document::parse("123456789012"),
            Err(TypeConstraintError::InvalidDocumentLength(12))
        );
    }

    #[test]
    fn document_completeness_ignores_mask_characters() {
        assert!(DocumentKind::Cpf.is_complete("123.456.789-09"));
        assert!(!DocumentKind::Cnpj.is_complete("123.456.789-09"));
        assert!(!DocumentKind::Cpf.is_complete("123.456.789-"));
        assert!(DocumentKind::Cnpj.is_complete("12.345.678/0001-95"));
    }

    #[test]
    fn decimal_comma_normalizes_dot_separator() {
        assert_eq!(DecimalComma::new("150.00").unwrap().as_str(), "150,00");
        assert_eq!(DecimalComma::new(" 2,50 ").unwrap().as_str(), "2,50");
        assert_eq!(DecimalComma::new("7").unwrap().as_str(), "7");
    }

    #[test]
    fn decimal_comma_rejects_currency_and_zero() {
        assert!(DecimalComma::new("R$ 150,00").is_err());
        assert!(DecimalComma::new("1.234,56").is_err());
        assert!(DecimalComma::new("0,00").is_err());
        assert!(DecimalComma::new("12,").is_err());
        assert_eq!(DecimalComma::new("  "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn brl_formatting_groups_thousands() {
        assert_eq!(format_brl(150.0), "R$ 150,00");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(DecimalComma::new("2,5").unwrap().to_brl(), "R$ 2,50");
        assert_eq!(DecimalComma::new("7").unwrap().with_two_places().as_str(), "7,00");
        assert_eq!(DecimalComma::new("2.5").unwrap().with_two_places().as_str(), "2,50");
        assert_eq!(DecimalComma::new("1,234").unwrap().with_two_places().as_str(), "1,23");
    }

    #[test]
    fn quantity_must_be_positive() {
        assert_eq!("3".parse::<ItemsQuantity>().unwrap().get(), 3);
        assert_eq!(serde_json::from_str::<ItemsQuantity>("4").unwrap().get(), 4);
        assert!(serde_json::from_str::<ItemsQuantity>("0").is_err());
        assert!("0".parse::<ItemsQuantity>().is_err());
        assert!("-1".parse::<ItemsQuantity>().is_err());
        assert!("três".parse::<ItemsQuantity>().is_err());
    }

    #[test]
    fn postal_code_requires_eight_digits() {
        assert_eq!(PostalCode::new("01310-100").unwrap().as_str(), "01310100");
        assert!(PostalCode::new("0131010").is_err());
    }

    #[test]
    fn carrier_parses_case_insensitively() {
        assert_eq!("SEDEX".parse::<Carrier>().unwrap(), Carrier::Sedex);
        assert_eq!("pac".parse::<Carrier>().unwrap(), Carrier::Pac);
        assert!("dhl".parse::<Carrier>().is_err());
    }

    #[test]
    fn ticket_id_rejects_blank() {
        assert!(TicketId::new("   ").is_err());
        assert_eq!(TicketId::new(" abc ").unwrap().as_str(), "abc");
    }
}
