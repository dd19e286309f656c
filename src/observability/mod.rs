//! Observability helpers.
//!
//! The crate emits `tracing` events and spans; installing a subscriber is
//! left to the application. This module keeps secrets out of that output.

pub mod logging;

pub use logging::*;
