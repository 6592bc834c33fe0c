//! rc-controller library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and embedding hosts share the same module tree.

pub mod application;
pub mod infrastructure;
