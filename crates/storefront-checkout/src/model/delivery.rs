//! Delivery inputs: postal code, quote and address.
//!
//! Everything here is validated client-side, before any service is called.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Client-side validation failures. These never reach a service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Pincode must be exactly 6 digits, got {0:?}")]
    InvalidPincode(String),

    #[error("Missing required address field: {0}")]
    MissingAddressField(&'static str),
}

/// A 6-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pincode(String);

impl Pincode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Pincode {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.len() == 6 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::InvalidPincode(raw.to_string()))
        }
    }
}

impl TryFrom<String> for Pincode {
    type Error = ValidationError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Pincode> for String {
    fn from(pincode: Pincode) -> Self {
        pincode.0
    }
}

impl Display for Pincode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shipping charge and cash-on-delivery eligibility for one pincode.
///
/// Only valid for the pincode it was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryQuote {
    pub pincode: Pincode,
    pub shipping_charge: Decimal,
    pub cod_available: bool,
}

impl DeliveryQuote {
    /// Whether this quote answers for `pincode`.
    pub fn is_for(&self, pincode: &Pincode) -> bool {
        self.pincode == *pincode
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub name: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
}

impl DeliveryAddress {
    /// Checks that phone, line 1, city and state are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("phone", &self.phone),
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ValidationError::MissingAddressField(*field)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            name: "Asha".into(),
            phone: "9876543210".into(),
            line1: "12 MG Road".into(),
            line2: None,
            city: "Pune".into(),
            state: "MH".into(),
        }
    }

    #[test]
    fn test_pincode_accepts_six_digits() {
        let pincode: Pincode = " 411001 ".parse().unwrap();
        assert_eq!(pincode.as_str(), "411001");
    }

    #[test]
    fn test_pincode_rejects_bad_format() {
        for raw in ["", "41100", "4110011", "41100a", "４１１００１"] {
            assert_eq!(
                raw.parse::<Pincode>(),
                Err(ValidationError::InvalidPincode(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_address_requires_fields() {
        assert!(address().validate().is_ok());

        let mut missing_city = address();
        missing_city.city = "   ".into();
        assert_eq!(
            missing_city.validate(),
            Err(ValidationError::MissingAddressField("city"))
        );

        let mut missing_phone = address();
        missing_phone.phone.clear();
        assert_eq!(
            missing_phone.validate(),
            Err(ValidationError::MissingAddressField("phone"))
        );
    }

    #[test]
    fn test_name_and_second_line_are_optional() {
        let mut minimal = address();
        minimal.name.clear();
        minimal.line2 = None;
        assert!(minimal.validate().is_ok());
    }
}
