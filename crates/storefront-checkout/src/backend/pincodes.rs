use crate::model::{DeliveryQuote, Pincode};
use crate::services::{PincodeService, ServiceError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// One serviceable pincode, as listed in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceablePincode {
    pub pincode: Pincode,
    pub shipping_charge: Decimal,
    pub cod_available: bool,
}

/// In-memory delivery area.
#[derive(Debug, Clone, Default)]
pub struct PincodeDirectory {
    entries: HashMap<Pincode, DeliveryQuote>,
}

impl PincodeDirectory {
    pub fn new(entries: impl IntoIterator<Item = ServiceablePincode>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| {
                let quote = DeliveryQuote {
                    pincode: entry.pincode.clone(),
                    shipping_charge: entry.shipping_charge,
                    cod_available: entry.cod_available,
                };
                (entry.pincode, quote)
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PincodeService for PincodeDirectory {
    #[instrument(skip(self), fields(pincode = %pincode))]
    async fn lookup(&self, pincode: &Pincode) -> Result<DeliveryQuote, ServiceError> {
        let quote = self.entries.get(pincode).cloned();
        debug!(serviceable = quote.is_some(), "Pincode lookup");
        quote.ok_or_else(|| ServiceError::NotServiceable(pincode.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pincode: &str, charge: i64, cod: bool) -> ServiceablePincode {
        ServiceablePincode {
            pincode: pincode.parse().unwrap(),
            shipping_charge: Decimal::from(charge),
            cod_available: cod,
        }
    }

    #[tokio::test]
    async fn test_known_pincode_returns_quote() {
        let directory = PincodeDirectory::new([entry("411001", 50, true), entry("110001", 80, false)]);
        let pincode: Pincode = "110001".parse().unwrap();

        let quote = directory.lookup(&pincode).await.unwrap();
        assert!(quote.is_for(&pincode));
        assert_eq!(quote.shipping_charge, Decimal::from(80));
        assert!(!quote.cod_available);
    }

    #[tokio::test]
    async fn test_unknown_pincode_is_not_serviceable() {
        let directory = PincodeDirectory::new([entry("411001", 50, true)]);
        let pincode: Pincode = "999999".parse().unwrap();

        assert_eq!(
            directory.lookup(&pincode).await,
            Err(ServiceError::NotServiceable(pincode))
        );
    }
}
