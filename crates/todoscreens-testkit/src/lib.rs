//! Todoscreens testing infrastructure
//!
//! In-memory task source, display service and clock for driving the
//! orchestrator and the webhook routes without network access.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(missing_docs)]

pub mod factories;
pub mod mocks;
pub mod time;

pub use factories::*;
pub use mocks::{MockDisplay, MockFailure, MockTaskSource};
pub use time::FixedClock;
