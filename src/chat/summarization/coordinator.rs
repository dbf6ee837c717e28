//! Compaction cycle orchestration.

use tracing::{debug, info, warn};

use crate::chat::conversation::store::ConversationStore;
use crate::llm::backend::CompletionBackend;

/// Fixed directive for the summarization prompt.
const SUMMARY_DIRECTIVE: &str = "Write 3-6 very short bullet points capturing only important, \
long-term facts about the user, their preferences, and any ongoing tasks or projects.\n\
Do not include greetings or small talk. Do not mention yourself.";

/// Compaction cycle state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CompactionState {
    /// No compaction in flight.
    #[default]
    Idle,
    /// A compaction call is running.
    Compacting,
}

/// Result of one compaction attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompactionOutcome {
    /// The history has not reached the threshold.
    NotDue,
    /// The summary was replaced and the history pruned.
    Updated,
    /// The completion failed or came back blank; state left untouched.
    Failed,
}

/// Orchestrates the summarize-then-prune cycle.
///
/// The cycle has two states, idle and compacting, and always returns to
/// idle after one attempt; there is no retry and no partial state. A
/// failed or blank summarization leaves both the summary and the history
/// untouched and is reported through logs only.
#[derive(Debug, Default)]
pub struct SummarizationCoordinator {
    state: CompactionState,
}

impl SummarizationCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current cycle state.
    #[must_use]
    pub const fn state(&self) -> CompactionState {
        self.state
    }

    /// Run one compaction cycle if the store has reached its threshold.
    ///
    /// On success the summary replacement and the history pruning happen
    /// together; on failure neither does.
    pub async fn maybe_run(
        &mut self,
        store: &mut ConversationStore,
        backend: &dyn CompletionBackend,
    ) -> CompactionOutcome {
        if !store.should_compact() {
            return CompactionOutcome::NotDue;
        }

        self.state = CompactionState::Compacting;
        let outcome = run_cycle(store, backend).await;
        self.state = CompactionState::Idle;
        outcome
    }
}

async fn run_cycle(
    store: &mut ConversationStore,
    backend: &dyn CompletionBackend,
) -> CompactionOutcome {
    if let (Some(first), Some(last)) = (store.turns().first(), store.turns().last()) {
        debug!(
            "Compacting {} turns spanning {} to {}",
            store.len(),
            first.timestamp,
            last.timestamp
        );
    }

    let prompt = build_summary_prompt(store);

    match backend.complete(&prompt).await {
        Ok(summary) if !summary.trim().is_empty() => {
            store.apply_summary(&summary);
            store.prune_to_recent_window();
            info!("Long-term summary updated");
            CompactionOutcome::Updated
        }
        Ok(_) => {
            warn!("Summarization produced no usable text; keeping existing memory");
            CompactionOutcome::Failed
        }
        Err(err) => {
            warn!("Summarization failed: {err}; keeping existing memory");
            CompactionOutcome::Failed
        }
    }
}

fn build_summary_prompt(store: &ConversationStore) -> String {
    format!(
        "You are summarizing a chat between a user and an assistant named {}.\n\
         {SUMMARY_DIRECTIVE}\n\nConversation:\n{}",
        store.persona(),
        store.build_compaction_source()
    )
}
