//! Storage layer for courseinfo.
//!
//! This module provides a sled-based storage engine. Records live in one
//! tree keyed by kind and id; unique constraint claims live in a second tree
//! updated in the same transaction.

mod config;
mod engine;
mod record;
mod transaction;

pub mod key;

pub use config::StorageConfig;
pub use engine::StorageEngine;
pub use key::RecordKey;
pub use record::Record;
pub use transaction::{Transaction, TransactionOp};
