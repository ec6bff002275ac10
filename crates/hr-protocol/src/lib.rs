pub mod action;
pub mod employee;
pub mod extraction;
pub mod intent;
pub mod query;

pub use action::*;
pub use employee::*;
pub use extraction::*;
pub use intent::*;
pub use query::*;
