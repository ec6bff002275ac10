//! Capability set for the HR agent.
//!
//! One operation per action variant, each returning a `Confirmation` or a
//! typed domain failure whose `Display` is the user-facing explanation:
//! - `CapabilitySet` trait (swappable in tests)
//! - `LedgerCapabilities` committing actions against a `RecordLedger`
//! - `MockCapabilities` recording performed actions

pub mod capability;
pub mod error;
pub mod format;
pub mod ledger;
pub mod mock;

pub use capability::{CapabilitySet, Confirmation};
pub use error::{CapabilityError, CapabilityResult};
pub use ledger::LedgerCapabilities;
pub use mock::MockCapabilities;
