//! Storage infrastructure: configuration loading.
//!
//! The `config` sub-module reads the TOML file that tunes the control session
//! (flavor, countdown length, envelope) and falls back to defaults when the
//! file does not exist.

pub mod config;
