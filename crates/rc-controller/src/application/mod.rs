//! Application layer use cases for remote pointer control.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules in `rc-core`) and the infrastructure (host transport,
//! input listeners, timers).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "drive the
//!   pointer of participant P until someone stops it").
//! - **Depend on abstractions** (traits such as [`host::HostSession`] and
//!   [`crate::infrastructure::timer::TickScheduler`]) so tests can substitute
//!   recording doubles.
//!
//! # Sub-modules
//!
//! - **`host`**            – The collaborator interface the host session provides.
//! - **`control_session`** – The controller-side state machine.  Every
//!   start/stop, pointer event, timer tick and inbound frame funnels through it.
//! - **`authorize`**       – Request/grant/deny handshake with an auto-accept
//!   countdown.
//! - **`grant_access`**    – The desktop peer's side of the same handshake.
//! - **`mock`**            – A recording [`control_session::SessionObserver`]
//!   for tests.

pub mod authorize;
pub mod control_session;
pub mod grant_access;
pub mod host;
pub mod mock;
