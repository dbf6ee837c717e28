//! Reply polishing: length tidying and identity scrubbing.
//!
//! Applied in order: tidy first to bound the length, then scrub, so the
//! pattern work runs on already-bounded text.

pub mod identity;
pub mod tidy;

pub use identity::IdentityScrubber;
pub use tidy::tidy_reply;
