//! Core chat types: configuration, errors, and the turn model.

pub mod config;
pub mod errors;
pub mod turn;

pub use config::{
    ChatConfig, CompletionConfig, ConversationConfig, PersonaConfig, PolishConfig, SanitizerConfig,
};
pub use errors::{ChatError, ChatResult};
pub use turn::{Speaker, Turn};
