//! HR self-service agent, library crate for the conversational front end.
//!
//! Re-exports all modules so external crates (e.g. `hr-e2e-tests`) can
//! wire a `Dispatcher` with scripted models and in-memory stores.

pub mod classifier;
pub mod config;
pub mod dates;
pub mod dispatcher;
pub mod extractor;
pub mod gateway;
pub mod messages;
pub mod prompt;
pub mod repl;
pub mod router;
