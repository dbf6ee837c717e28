//! Completion backend capability trait.

use std::future::Future;
use std::pin::Pin;

use crate::chat::core::errors::ChatResult;

/// Boxed future type for completion backend operations.
pub type CompletionFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability interface for turning an assembled prompt into reply text.
///
/// Implementations return already-sanitized text; an empty string means the
/// backend ran but produced nothing usable. Tests substitute stub
/// implementations returning canned text instead of launching a process.
pub trait CompletionBackend: Send + Sync {
    /// Run one completion for the given prompt, blocking until it resolves.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be launched or times out.
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, ChatResult<String>>;
}
