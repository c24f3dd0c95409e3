use crate::services::{ServiceError, TaxRateSource};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// A tax rate that never changes, read from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTaxRate(pub Decimal);

#[async_trait]
impl TaxRateSource for FixedTaxRate {
    async fn tax_rate_percent(&self) -> Result<Decimal, ServiceError> {
        Ok(self.0)
    }
}
