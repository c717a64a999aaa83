//! The process graph and its post-resolution invariant checks.

pub mod types;
pub mod validate;

pub use types::*;
pub use validate::validate_resolved;
