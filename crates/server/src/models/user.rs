//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use bakeledger_core::{UserId, Username};

/// A ledger login account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
