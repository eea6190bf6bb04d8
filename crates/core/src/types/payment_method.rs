//! Payment method recorded on each sale.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a stored or submitted payment method is unknown.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct PaymentMethodError(pub String);

/// How a customer paid for a sale.
///
/// Persisted as its snake_case name in a `TEXT` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Pix,
    CreditCard,
    DebitCard,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    /// All payment methods, in display order.
    pub const ALL: [Self; 6] = [
        Self::Cash,
        Self::Pix,
        Self::CreditCard,
        Self::DebitCard,
        Self::BankTransfer,
        Self::Other,
    ];

    /// The persisted name of this payment method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Pix => "pix",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::BankTransfer => "bank_transfer",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = PaymentMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| PaymentMethodError(s.to_owned()))
    }
}
