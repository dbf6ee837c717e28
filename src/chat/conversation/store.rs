//! Conversation store: the ordered turn log and the long-term summary.

use tracing::debug;

use crate::chat::conversation::prompt::{PromptParts, build_prompt_block, render_history};
use crate::chat::core::config::{ConversationConfig, PersonaConfig};
use crate::chat::core::turn::Turn;

/// Owner of the ordered turn history and the long-term summary string.
///
/// This is the only mutable shared state of the chat core. History is an
/// append-only log with explicit windowing; no mutable reference to it
/// escapes. All mutations go through `&mut self`, so callers that honor the
/// one-invocation-at-a-time rule need no further locking.
#[derive(Clone, Debug)]
pub struct ConversationStore {
    persona: String,
    foreign_names: Vec<String>,
    recent_window: usize,
    compact_threshold: usize,
    turns: Vec<Turn>,
    long_term_summary: String,
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(persona: &PersonaConfig, conversation: &ConversationConfig) -> Self {
        Self {
            persona: persona.name.clone(),
            foreign_names: persona.foreign_names.clone(),
            recent_window: conversation.recent_window,
            compact_threshold: conversation.compact_threshold,
            turns: Vec::new(),
            long_term_summary: String::new(),
        }
    }

    /// Append a user turn.
    pub fn append_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    /// Append an assistant turn.
    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    /// Number of stored turns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Read-only view of the stored turns, oldest first.
    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Persona name used for instructions and assistant lines.
    #[must_use]
    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Assemble the live prompt: persona instructions, the labeled
    /// long-term memory block when a summary is stored, then the last
    /// recent-window turns, oldest first.
    ///
    /// Pure given current state: two calls without intervening appends
    /// yield identical output.
    #[must_use]
    pub fn build_prompt(&self) -> String {
        let start = self.turns.len().saturating_sub(self.recent_window);
        let parts = PromptParts {
            persona: &self.persona,
            foreign_names: &self.foreign_names,
            summary: &self.long_term_summary,
            turns: &self.turns[start..],
        };
        build_prompt_block(&parts)
    }

    /// Whether the history has reached the compaction threshold.
    ///
    /// A query only; callers decide when to actually run compaction.
    #[must_use]
    pub fn should_compact(&self) -> bool {
        self.turns.len() >= self.compact_threshold
    }

    /// Render the full history as summarization input. Never truncated.
    #[must_use]
    pub fn build_compaction_source(&self) -> String {
        render_history(&self.turns, &self.persona)
    }

    /// Replace the long-term summary wholesale. Blank input stores the
    /// empty string, meaning "no memory".
    pub fn apply_summary(&mut self, summary: &str) {
        self.long_term_summary = summary.trim().to_string();
    }

    /// Keep only the last recent-window turns. No-op when the history is
    /// already within the window.
    pub fn prune_to_recent_window(&mut self) {
        if self.turns.len() <= self.recent_window {
            return;
        }
        let start = self.turns.len() - self.recent_window;
        self.turns.drain(..start);
        debug!("Pruned history to the last {} turns", self.recent_window);
    }

    /// Current long-term summary; empty when no memory is stored.
    #[must_use]
    pub fn long_term_summary(&self) -> &str {
        &self.long_term_summary
    }

    /// Forget the long-term summary.
    pub fn clear_summary(&mut self) {
        self.long_term_summary.clear();
    }

    /// Reset history and summary.
    pub fn clear_all(&mut self) {
        self.turns.clear();
        self.long_term_summary.clear();
    }
}
