//! Infrastructure layer (adapters/implementations).
//!
//! IO-heavy integrations live here; currently that is the SQLite store.

pub mod db;
