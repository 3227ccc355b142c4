//! Domain types for the material properties store.
//! Defines the records exchanged between the repositories and the CLI.

pub mod category;
pub mod error;
pub mod filter;
pub mod material;
pub mod summary;

pub use category::*;
pub use error::*;
pub use filter::*;
pub use material::*;
pub use summary::*;
