//! Completion invocation: backend capability trait, the local process
//! client, and raw-output cleaning.

pub mod backend;
pub mod llama_cli;
pub mod sanitizer;

pub use backend::{CompletionBackend, CompletionFuture};
pub use llama_cli::LlamaCliClient;
pub use sanitizer::{SanitizeRules, clean};
