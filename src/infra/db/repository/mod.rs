//! Repository implementations for the material properties store.
//!
//! All mutation and lookup of categories, materials, and their
//! mechanical properties goes through these types; nothing bypasses the
//! declared foreign-key relationships.

mod category;
mod material;

pub use category::CategoryRepository;
pub use material::MaterialRepository;

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::domain::{Result, StoreError};

pub(super) type DbConn = Arc<Mutex<Connection>>;

/// Names are identity keys; a blank one is never meaningful.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation("name must not be blank".into()));
    }
    Ok(())
}

/// Commit a transaction, folding commit-time failures into the
/// transaction error kind (lock contention stays `Busy`).
fn commit(tx: rusqlite::Transaction<'_>) -> Result<()> {
    tx.commit().map_err(|err| match StoreError::from(err) {
        StoreError::Internal(e) => StoreError::TransactionFailed(e.to_string()),
        other => other,
    })
}
