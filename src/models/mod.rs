//! # Data Models
//!
//! Row-backed types for the scope storage engine. Every scope and every
//! key/value record lives in one backing table; these models describe the
//! two views of that table the engine works with.

pub mod entry;
pub mod scope;

pub use entry::{EntryType, StoreEntry};
pub use scope::{Scope, Scopes};
