//! Conversation-memory management for the Mochi assistant.
//!
//! This module holds everything with real state and sequencing, organized
//! into:
//! - `core`: Configuration, errors, and the turn model
//! - `conversation`: The turn store and its prompt assembly
//! - `polish`: Reply tidying and identity scrubbing
//! - `summarization`: The compaction cycle over the long-term summary
//! - `engine`: Caller-facing orchestration of one chat turn

pub mod conversation;
pub mod core;
pub mod engine;
pub mod polish;
pub mod summarization;

// Re-export commonly used types for convenience
pub use conversation::{ConversationStore, PromptParts, build_prompt_block, render_history};
pub use core::{
    ChatConfig, ChatError, ChatResult, CompletionConfig, ConversationConfig, PersonaConfig,
    PolishConfig, SanitizerConfig, Speaker, Turn,
};
pub use engine::{ChatEngine, EMPTY_OUTPUT_REPLY, LAUNCH_FAILURE_REPLY};
pub use polish::{IdentityScrubber, tidy_reply};
pub use summarization::{CompactionOutcome, CompactionState, SummarizationCoordinator};
