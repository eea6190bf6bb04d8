//! Monetary amounts using decimal arithmetic.
//!
//! All sums in the ledger are carried at full `Decimal` precision. Rounding to
//! two decimal places happens only when a value is shown to a user or written
//! to a `NUMERIC(10,2)` column, via [`round_money`].

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places used for display and persistence.
pub const MONEY_SCALE: u32 = 2;

/// Round an amount to cents, half away from zero.
///
/// The result always carries exactly two decimal places, so it serializes
/// as `"3.00"` rather than `"3"`.
///
/// ```
/// use bakeledger_core::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(2345, 3)), Decimal::new(235, 2));
/// assert_eq!(round_money(Decimal::new(-2345, 3)), Decimal::new(-235, 2));
/// ```
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Symbol printed in front of amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BRL" => Ok(Self::BRL),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency code: {other}")),
        }
    }
}

/// An amount with currency information, formatted for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., reais, not centavos).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new monetary amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2}",
            self.currency_code.symbol(),
            round_money(self.amount)
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(Decimal::new(125, 3)), Decimal::new(13, 2));
        assert_eq!(round_money(Decimal::new(135, 3)), Decimal::new(14, 2));
        assert_eq!(round_money(Decimal::new(-125, 3)), Decimal::new(-13, 2));
    }

    #[test]
    fn test_round_money_pads_scale() {
        let rounded = round_money(Decimal::new(25, 1));
        assert_eq!(rounded, Decimal::new(250, 2));
        assert_eq!(rounded.to_string(), "2.50");
        assert_eq!(round_money(Decimal::new(3, 0)).to_string(), "3.00");
    }

    #[test]
    fn test_money_display_pads_to_two_places() {
        let money = Money::new(Decimal::new(3, 0), CurrencyCode::BRL);
        assert_eq!(money.to_string(), "R$ 3.00");
    }

    #[test]
    fn test_money_display_rounds() {
        let money = Money::new(Decimal::new(199_999, 5), CurrencyCode::USD);
        assert_eq!(money.to_string(), "$ 2.00");
    }

    #[test]
    fn test_currency_code_from_str() {
        assert_eq!("brl".parse::<CurrencyCode>().unwrap(), CurrencyCode::BRL);
        assert_eq!(" EUR ".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
