//! Engine orchestration of the chat core.

pub mod core;

pub use core::{ChatEngine, EMPTY_OUTPUT_REPLY, LAUNCH_FAILURE_REPLY};
