//! Document persistence
//!
//! A document is not a record of its own: it exists as two blobs sharing an
//! identifier, and is listable only once both are present.

pub mod keys;
mod store;
mod types;

pub use store::DocumentStore;
pub use types::*;
