//! Raw model-output cleaning.

use crate::chat::core::config::SanitizerConfig;

/// Cleaning rules applied to raw process output.
#[derive(Clone, Debug)]
pub struct SanitizeRules {
    banner_delimiter: String,
    noise_prefixes: Vec<String>,
    end_marker: String,
}

impl SanitizeRules {
    /// Build rules from configuration.
    #[must_use]
    pub fn new(config: &SanitizerConfig) -> Self {
        Self {
            banner_delimiter: config.banner_delimiter.clone(),
            noise_prefixes: config.noise_prefixes.clone(),
            end_marker: config.end_marker.clone(),
        }
    }
}

impl Default for SanitizeRules {
    fn default() -> Self {
        Self::new(&SanitizerConfig::default())
    }
}

/// Clean raw captured process output into usable reply text.
///
/// The model binary prints a startup banner and runtime diagnostics around
/// the generated text. Everything up to and including the last banner row is
/// discarded, lines starting with a known noise prefix are dropped wholesale,
/// survivors are joined with single spaces, and the end-of-generation marker
/// is removed. Deterministic and stateless.
#[must_use]
pub fn clean(raw: &str, rules: &SanitizeRules) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut text = normalized.trim();
    if text.is_empty() {
        return String::new();
    }

    if let Some(idx) = text.rfind(&rules.banner_delimiter) {
        text = text[idx + rules.banner_delimiter.len()..].trim();
    }

    let mut joined = String::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if rules
            .noise_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
        {
            continue;
        }
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(line);
    }

    joined.replace(&rules.end_marker, "").trim().to_string()
}
