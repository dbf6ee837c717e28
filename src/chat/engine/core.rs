//! Chat engine orchestration.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chat::conversation::store::ConversationStore;
use crate::chat::core::config::{ChatConfig, PolishConfig};
use crate::chat::core::errors::{ChatError, ChatResult};
use crate::chat::polish::identity::IdentityScrubber;
use crate::chat::polish::tidy::tidy_reply;
use crate::chat::summarization::coordinator::{CompactionOutcome, SummarizationCoordinator};
use crate::llm::backend::CompletionBackend;
use crate::llm::llama_cli::LlamaCliClient;

/// Placeholder reply recorded when the completion process cannot deliver.
pub const LAUNCH_FAILURE_REPLY: &str = "[error running llama-cli]";
/// Placeholder reply recorded when the process produced no usable output.
pub const EMPTY_OUTPUT_REPLY: &str = "[no response]";

/// Caller-facing chat engine.
///
/// Serializes the whole turn pipeline behind `&mut self`: append the user
/// turn, build the prompt, run one completion, polish the reply, record the
/// assistant turn, then give the summarization coordinator its chance. At
/// most one completion (reply or compaction) is in flight at a time; the
/// borrow checker enforces that callers cannot overlap invocations against
/// the same conversation.
pub struct ChatEngine {
    store: ConversationStore,
    backend: Arc<dyn CompletionBackend>,
    scrubber: IdentityScrubber,
    coordinator: SummarizationCoordinator,
    polish: PolishConfig,
}

impl ChatEngine {
    /// Create an engine over an explicit completion backend.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &ChatConfig, backend: Arc<dyn CompletionBackend>) -> ChatResult<Self> {
        config.validate()?;
        let scrubber = IdentityScrubber::new(&config.persona)
            .map_err(|err| ChatError::InvalidConfig(err.to_string()))?;

        Ok(Self {
            store: ConversationStore::new(&config.persona, &config.conversation),
            backend,
            scrubber,
            coordinator: SummarizationCoordinator::new(),
            polish: config.polish.clone(),
        })
    }

    /// Create an engine driving the configured local model executable.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the executable
    /// or model artifact paths are unusable.
    pub fn from_config(config: &ChatConfig) -> ChatResult<Self> {
        let client = LlamaCliClient::new(config.completion.clone())?;
        Self::new(config, Arc::new(client))
    }

    /// Submit one user message and produce displayable reply text.
    ///
    /// Failures never escape as errors: a launch failure or timeout is
    /// recorded and returned as a placeholder reply, and an empty completion
    /// degrades to the `[no response]` placeholder, so conversation
    /// continuity is preserved and a full turn is always appended whole.
    pub async fn submit_user_message(&mut self, text: &str) -> String {
        let text = text.trim();
        self.store.append_user(text);
        let prompt = self.store.build_prompt();

        let reply = match self.backend.complete(&prompt).await {
            Ok(cleaned) if cleaned.is_empty() => {
                info!("Completion produced no usable output");
                EMPTY_OUTPUT_REPLY.to_string()
            }
            Ok(cleaned) => self.polish_reply(&cleaned, text),
            Err(err) => {
                error!("Completion failed: {err}");
                LAUNCH_FAILURE_REPLY.to_string()
            }
        };

        self.store.append_assistant(reply.clone());

        let outcome = self
            .coordinator
            .maybe_run(&mut self.store, self.backend.as_ref())
            .await;
        if outcome == CompactionOutcome::Updated {
            debug!("History compacted down to {} turns", self.store.len());
        }

        reply
    }

    fn polish_reply(&self, cleaned: &str, user_text: &str) -> String {
        if is_name_question(user_text) {
            return format!(
                "My name is {}! I'm your offline AI assistant running on your computer.",
                self.store.persona()
            );
        }

        let tidied = tidy_reply(cleaned, &self.polish);
        self.scrubber.scrub(&tidied)
    }

    /// Current long-term summary; empty when no memory is stored.
    #[must_use]
    pub fn long_term_summary(&self) -> &str {
        self.store.long_term_summary()
    }

    /// Forget the long-term summary only.
    pub fn clear_long_term_summary(&mut self) {
        self.store.clear_summary();
    }

    /// Reset history and summary.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
    }

    /// Number of turns currently held.
    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.store.len()
    }
}

/// Whether the user text asks for the assistant's name or identity.
fn is_name_question(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("what's your name")
        || lower.contains("whats your name")
        || lower.contains("what is your name")
        || lower.contains("who are you")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::core::turn::Speaker;
    use crate::llm::backend::CompletionFuture;

    struct CannedBackend(&'static str);

    impl CompletionBackend for CannedBackend {
        fn complete<'a>(&'a self, _prompt: &'a str) -> CompletionFuture<'a, ChatResult<String>> {
            Box::pin(async move { Ok(self.0.to_string()) })
        }
    }

    struct FailingBackend;

    impl CompletionBackend for FailingBackend {
        fn complete<'a>(&'a self, _prompt: &'a str) -> CompletionFuture<'a, ChatResult<String>> {
            Box::pin(async move {
                Err(ChatError::Launch {
                    command: "llama-cli".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                })
            })
        }
    }

    fn engine(backend: Arc<dyn CompletionBackend>) -> ChatEngine {
        ChatEngine::new(&ChatConfig::default(), backend).unwrap()
    }

    #[tokio::test]
    async fn test_submit_records_both_turns() {
        let mut engine = engine(Arc::new(CannedBackend("Nice to meet you!")));

        let reply = engine.submit_user_message("hi").await;

        assert_eq!(reply, "Nice to meet you!");
        assert_eq!(engine.turn_count(), 2);
    }

    #[tokio::test]
    async fn test_launch_failure_records_placeholder() {
        let mut engine = engine(Arc::new(FailingBackend));

        let reply = engine.submit_user_message("hi").await;

        assert_eq!(reply, LAUNCH_FAILURE_REPLY);
        assert_eq!(engine.turn_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_output_records_placeholder() {
        let mut engine = engine(Arc::new(CannedBackend("")));

        let reply = engine.submit_user_message("hi").await;

        assert_eq!(reply, EMPTY_OUTPUT_REPLY);
        assert_eq!(engine.turn_count(), 2);
    }

    #[tokio::test]
    async fn test_identity_leak_scrubbed_from_reply() {
        let mut engine = engine(Arc::new(CannedBackend(
            "I am Claude, a large language model made by Anthropic. The sky is blue.",
        )));

        let reply = engine.submit_user_message("why is the sky blue?").await;

        assert_eq!(reply, "The sky is blue.");
    }

    #[tokio::test]
    async fn test_name_question_gets_persona_reply() {
        let mut engine = engine(Arc::new(CannedBackend("I am Qwen, nice to meet you")));

        let reply = engine.submit_user_message("What is your name?").await;

        assert_eq!(
            reply,
            "My name is Mochi! I'm your offline AI assistant running on your computer."
        );
    }

    #[tokio::test]
    async fn test_compaction_runs_at_threshold() {
        let mut engine = engine(Arc::new(CannedBackend("User likes hiking.")));

        // Six submissions produce twelve turns; the threshold is reached as
        // the sixth assistant turn lands, and compaction runs right after.
        for _ in 0..6 {
            engine.submit_user_message("tell me about hiking").await;
        }

        assert_eq!(engine.long_term_summary(), "User likes hiking.");
        assert_eq!(engine.turn_count(), 8);
    }

    #[tokio::test]
    async fn test_clear_operations() {
        let mut engine = engine(Arc::new(CannedBackend("User likes hiking.")));
        for _ in 0..6 {
            engine.submit_user_message("hello there").await;
        }
        assert!(!engine.long_term_summary().is_empty());

        engine.clear_long_term_summary();
        assert_eq!(engine.long_term_summary(), "");
        assert!(engine.turn_count() > 0);

        engine.clear_all();
        assert_eq!(engine.turn_count(), 0);
    }

    #[tokio::test]
    async fn test_turn_speakers_alternate() {
        let mut engine = engine(Arc::new(CannedBackend("sure thing")));
        engine.submit_user_message("first").await;

        // Reach into the store through the public prompt to confirm order.
        let prompt = engine.store.build_prompt();
        assert!(prompt.contains("User: first\nMochi: sure thing\n"));
        assert_eq!(engine.store.turns()[0].speaker, Speaker::User);
        assert_eq!(engine.store.turns()[1].speaker, Speaker::Assistant);
    }

    #[test]
    fn test_is_name_question_variants() {
        assert!(is_name_question("What's your name?"));
        assert!(is_name_question("whats your name"));
        assert!(is_name_question("so, who are you exactly?"));
        assert!(!is_name_question("what is the weather like"));
    }
}
