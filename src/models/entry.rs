//! Raw rows of the backing table.
//!
//! The table holds two kinds of rows distinguished by `entry_type`: scope
//! identity records (the reserved key [`SCOPE_KEY`](crate::constants::SCOPE_KEY),
//! value = scope name, id = scope id) and user key/value records. Both kinds
//! reference their owning scope through the nullable `scope_id` column, where
//! `NULL` means the root scope.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Discriminates identity records from user records in the backing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    /// Scope identity record. Row id is the scope id, row value is the name.
    Scope,
    /// User-supplied key/value record.
    Value,
}

impl EntryType {
    /// Wire representation stored in the `entry_type` smallint column.
    pub const fn as_i16(self) -> i16 {
        match self {
            EntryType::Scope => 0,
            EntryType::Value => 1,
        }
    }
}

impl TryFrom<i16> for EntryType {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EntryType::Scope),
            1 => Ok(EntryType::Value),
            other => Err(format!("unknown entry type discriminant: {other}")),
        }
    }
}

/// A single row of the backing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StoreEntry {
    pub id: i64,
    /// Owning scope id; `None` for rows attached directly to the root scope.
    pub scope_id: Option<i64>,
    #[sqlx(try_from = "i16")]
    pub entry_type: EntryType,
    pub entry_key: String,
    pub entry_value: String,
}

impl StoreEntry {
    pub fn is_identity(&self) -> bool {
        self.entry_type == EntryType::Scope
    }
}
