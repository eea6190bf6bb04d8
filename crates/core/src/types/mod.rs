//! Core types for Bakeledger.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod date_range;
pub mod id;
pub mod money;
pub mod payment_method;
pub mod username;

pub use date_range::{DateRange, DateRangeError};
pub use id::*;
pub use money::{CurrencyCode, Money, round_money};
pub use payment_method::{PaymentMethod, PaymentMethodError};
pub use username::{Username, UsernameError};
