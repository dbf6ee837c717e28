//! Configuration for the chat core.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::core::errors::{ChatError, ChatResult};

/// Top-level configuration for the chat engine.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Persona identity settings.
    #[serde(default)]
    pub persona: PersonaConfig,
    /// Conversation windowing settings.
    #[serde(default)]
    pub conversation: ConversationConfig,
    /// Completion process settings.
    #[serde(default)]
    pub completion: CompletionConfig,
    /// Reply polishing settings.
    #[serde(default)]
    pub polish: PolishConfig,
}

impl ChatConfig {
    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ChatResult<()> {
        if self.persona.name.trim().is_empty() {
            return Err(ChatError::InvalidConfig(
                "persona.name must not be blank".to_string(),
            ));
        }

        if self.conversation.recent_window == 0 {
            return Err(ChatError::InvalidConfig(
                "conversation.recent_window must be > 0".to_string(),
            ));
        }

        if self.conversation.compact_threshold == 0 {
            return Err(ChatError::InvalidConfig(
                "conversation.compact_threshold must be > 0".to_string(),
            ));
        }

        if self.completion.ctx_size == 0 {
            return Err(ChatError::InvalidConfig(
                "completion.ctx_size must be > 0".to_string(),
            ));
        }

        if self.completion.max_new_tokens == 0 {
            return Err(ChatError::InvalidConfig(
                "completion.max_new_tokens must be > 0".to_string(),
            ));
        }

        if !self.completion.temperature.is_finite()
            || !(0.0..=2.0).contains(&self.completion.temperature)
        {
            return Err(ChatError::InvalidConfig(
                "completion.temperature must be within 0.0..=2.0".to_string(),
            ));
        }

        if self.completion.timeout_secs == 0 {
            return Err(ChatError::InvalidConfig(
                "completion.timeout_secs must be > 0".to_string(),
            ));
        }

        if self.completion.sanitizer.banner_delimiter.is_empty() {
            return Err(ChatError::InvalidConfig(
                "completion.sanitizer.banner_delimiter must not be empty".to_string(),
            ));
        }

        if self.completion.sanitizer.end_marker.is_empty() {
            return Err(ChatError::InvalidConfig(
                "completion.sanitizer.end_marker must not be empty".to_string(),
            ));
        }

        // An empty prefix would match every line and drop the whole reply.
        if self
            .completion
            .sanitizer
            .noise_prefixes
            .iter()
            .any(String::is_empty)
        {
            return Err(ChatError::InvalidConfig(
                "completion.sanitizer.noise_prefixes must not contain empty entries".to_string(),
            ));
        }

        if self.polish.max_reply_chars == 0 {
            return Err(ChatError::InvalidConfig(
                "polish.max_reply_chars must be > 0".to_string(),
            ));
        }

        if self.polish.min_sentence_chars >= self.polish.max_reply_chars {
            return Err(ChatError::InvalidConfig(
                "polish.min_sentence_chars must be below polish.max_reply_chars".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> ChatResult<Self> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|err| {
            ChatError::InvalidConfig(format!("cannot parse {}: {err}", path.display()))
        })
    }

    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> ChatResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No config file at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Persona identity settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Name the assistant goes by.
    pub name: String,
    /// Foreign assistant names the persona must never claim.
    pub foreign_names: Vec<String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "Mochi".to_string(),
            foreign_names: vec![
                "Claude".to_string(),
                "ChatGPT".to_string(),
                "Qwen".to_string(),
            ],
        }
    }
}

/// Conversation windowing settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Number of most recent turns kept in the live prompt and after pruning.
    pub recent_window: usize,
    /// Turn count at which compaction becomes due.
    pub compact_threshold: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            recent_window: 8,
            compact_threshold: 12,
        }
    }
}

/// Completion process settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Path to the model executable.
    pub executable: PathBuf,
    /// Path to the model artifact.
    pub model_path: PathBuf,
    /// Context-size limit passed to the process.
    pub ctx_size: u32,
    /// Maximum new tokens per completion.
    pub max_new_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Upper bound on the wait for process exit, in seconds.
    pub timeout_secs: u64,
    /// Raw-output cleaning rules.
    #[serde(default)]
    pub sanitizer: SanitizerConfig,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("llama-cli"),
            model_path: PathBuf::from("models/qwen2.5-0.5b-instruct-q4_k_m.gguf"),
            ctx_size: 900,
            max_new_tokens: 128,
            temperature: 0.7,
            timeout_secs: 120,
            sanitizer: SanitizerConfig::default(),
        }
    }
}

/// Raw-output cleaning rules for the completion process.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Banner row printed by the model binary before generated text.
    pub banner_delimiter: String,
    /// Line prefixes identifying diagnostic noise to drop.
    pub noise_prefixes: Vec<String>,
    /// Literal end-of-generation marker stripped from output.
    pub end_marker: String,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            banner_delimiter: "***************************".to_string(),
            noise_prefixes: vec![
                "sampler".to_string(),
                "llama_".to_string(),
                "common_".to_string(),
                "system_info".to_string(),
                "generate:".to_string(),
                "main:".to_string(),
                "ggml_".to_string(),
                "IMPORTANT:".to_string(),
            ],
            end_marker: "[end of text]".to_string(),
        }
    }
}

/// Reply polishing settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolishConfig {
    /// Hard cap on reply length in characters.
    pub max_reply_chars: usize,
    /// Minimum character offset a sentence cut must exceed.
    pub min_sentence_chars: usize,
}

impl Default for PolishConfig {
    fn default() -> Self {
        Self {
            max_reply_chars: 600,
            min_sentence_chars: 60,
        }
    }
}
