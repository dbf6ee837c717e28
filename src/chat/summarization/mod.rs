//! Long-term memory compaction.

pub mod coordinator;

pub use coordinator::{CompactionOutcome, CompactionState, SummarizationCoordinator};
