//! Record store for the HR agent.
//!
//! Provides the `RecordStore` lookup abstraction consumed by the query router
//! and the action extractor, the `RecordLedger` write extension used by the
//! capability set, and `MemoryRecordStore`, an in-memory implementation with
//! built-in sample data and JSON seed loading.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{RecordError, RecordResult};
pub use memory::{MemoryRecordStore, Seed};
pub use store::{
    BalanceUpdate, HONORIFICS, NameLookup, RecordLedger, RecordStore, name_tokens, query_tokens,
};
