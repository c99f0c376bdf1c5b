//! Lot domain entity

use chrono::{DateTime, Utc};

/// A parking facility. Spots reference it by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lot {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
