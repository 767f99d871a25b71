//! callgrid-state — embedded call-center store for CallGrid.
//!
//! Backed by [redb](https://docs.rs/redb), holds the reference data (skill
//! classes, agents, skill assignments), the configured queueing parameters,
//! and the call log. Domain types are JSON-serialized into redb's `&[u8]`
//! value columns; numeric primary keys map directly onto redb's ordered
//! integer key columns, so the maximum agent id is a `last()` lookup.
//!
//! The `CallStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).
//! An in-memory backend is available for tests.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use store::CallStore;
pub use types::*;
