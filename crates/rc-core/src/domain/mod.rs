//! Domain entities for remote pointer control.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! The innermost layer holds the rules that make the system what it is: here,
//! the single-controlled-participant session and the coordinate normalization
//! law.  Nothing in this module sends a message, starts a timer, or touches a
//! rendering surface; outer layers do that and call in here for decisions.

/// Participant identity as supplied by the host session.
pub mod participant;

/// Session lifecycle entity (idle / pending authorization / active).
pub mod session;

/// Rendering-surface bounds and normalized coordinates.
pub mod surface;
