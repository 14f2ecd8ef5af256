//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A non-negative unit price with currency information.
///
/// Prices are parsed from the text shown on dish cards (e.g. `"$12.50"`)
/// and always displayed with two fraction digits.
///
/// ```
/// use bistro_core::Price;
///
/// let price = Price::parse("$12.5").unwrap();
/// assert_eq!(price.to_string(), "$12.50");
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self {
            amount,
            currency_code,
        })
    }

    /// Create a USD price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self {
            amount: Decimal::new(i64::from(cents), 2),
            currency_code: CurrencyCode::USD,
        }
    }

    /// Parse a USD price from display text such as `"$12.50"` or `"12.50"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty, not a decimal, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix(CurrencyCode::USD.symbol())
            .unwrap_or(trimmed)
            .trim();
        if digits.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount =
            Decimal::from_str(digits).map_err(|_| PriceError::Invalid(trimmed.to_owned()))?;
        Self::new(amount, CurrencyCode::USD)
    }

    /// Amount rounded to the currency's two display digits.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.amount.round_dp(2)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_money(f, self.amount, self.currency_code)
    }
}

/// Write `amount` as `<symbol><amount with 2 dp>`.
pub(crate) fn format_money(
    f: &mut fmt::Formatter<'_>,
    amount: Decimal,
    currency_code: CurrencyCode,
) -> fmt::Result {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    write!(f, "{}{rounded}", currency_code.symbol())
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_symbol() {
        let price = Price::parse("$12.50").unwrap();
        assert_eq!(price.amount, Decimal::new(1250, 2));
        assert_eq!(price.currency_code, CurrencyCode::USD);
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(Price::parse(" 9 ").unwrap().amount, Decimal::from(9));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("$"), Err(PriceError::Empty));
        assert!(matches!(Price::parse("$abc"), Err(PriceError::Invalid(_))));
        assert_eq!(Price::parse("-3.00"), Err(PriceError::Negative));
    }

    #[test]
    fn test_zero_is_allowed() {
        assert!(Price::parse("0").is_ok());
    }

    #[test]
    fn test_display_pads_and_rounds() {
        assert_eq!(Price::parse("4").unwrap().to_string(), "$4.00");
        assert_eq!(Price::parse("4.5").unwrap().to_string(), "$4.50");
        assert_eq!(Price::parse("4.999").unwrap().to_string(), "$5.00");
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
    }

    #[test]
    fn test_currency_symbols() {
        assert_eq!(CurrencyCode::GBP.symbol(), "£");
        assert_eq!(CurrencyCode::CAD.symbol(), "$");
    }
}
