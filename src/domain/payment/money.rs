//! Monetary amounts in minor units.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Currencies the processor settles without a fractional part.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["HUF", "JPY", "TWD"];

/// Amount in the smallest currency unit plus an ISO-4217 code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub minor_units: i64,
    pub currency: String,
}

impl Money {
    /// Creates an amount, normalising the currency code to upper case.
    pub fn new(minor_units: i64, currency: impl Into<String>) -> Result<Self, ValidationError> {
        let currency = currency.into().trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "currency",
                format!("'{}' is not an ISO-4217 code", currency),
            ));
        }
        if minor_units < 0 {
            return Err(ValidationError::invalid_format(
                "amount",
                "amount cannot be negative",
            ));
        }
        Ok(Self {
            minor_units,
            currency,
        })
    }

    /// Number of fractional digits the processor expects for this currency.
    pub fn decimals(&self) -> u32 {
        if ZERO_DECIMAL_CURRENCIES.contains(&self.currency.as_str()) {
            0
        } else {
            2
        }
    }

    /// Formats the amount as the processor's decimal string (`"12.34"`).
    pub fn format(&self) -> String {
        match self.decimals() {
            0 => self.minor_units.to_string(),
            d => {
                let scale = 10_i64.pow(d);
                format!(
                    "{}.{:0width$}",
                    self.minor_units / scale,
                    self.minor_units % scale,
                    width = d as usize
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_two_decimal_currencies() {
        assert_eq!(Money::new(1234, "usd").unwrap().format(), "12.34");
        assert_eq!(Money::new(5, "EUR").unwrap().format(), "0.05");
        assert_eq!(Money::new(10000, "EUR").unwrap().format(), "100.00");
    }

    #[test]
    fn formats_zero_decimal_currencies() {
        assert_eq!(Money::new(1500, "JPY").unwrap().format(), "1500");
    }

    #[test]
    fn rejects_bad_currency_and_negative_amounts() {
        assert!(Money::new(100, "US").is_err());
        assert!(Money::new(100, "U$D").is_err());
        assert!(Money::new(-1, "USD").is_err());
    }
}
