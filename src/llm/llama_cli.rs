//! Completion client driving the local `llama-cli` executable.

use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::chat::core::config::CompletionConfig;
use crate::chat::core::errors::{ChatError, ChatResult};
use crate::llm::backend::{CompletionBackend, CompletionFuture};
use crate::llm::sanitizer::{self, SanitizeRules};

/// Completion client backed by a local model child process.
///
/// Each call is independent: the prompt is written to a scoped temporary
/// file, the process is launched with a fixed argument list, both output
/// streams are captured to completion, and the merged capture is cleaned
/// before being returned. No retry is attempted here; retry policy belongs
/// to the caller.
pub struct LlamaCliClient {
    config: CompletionConfig,
    rules: SanitizeRules,
}

impl LlamaCliClient {
    /// Create a client, failing fast on unusable paths.
    ///
    /// # Errors
    /// Returns an error if the model artifact is missing, or if the
    /// executable is given as a concrete path that does not exist. A bare
    /// executable name is left to `PATH` resolution at launch time.
    pub fn new(config: CompletionConfig) -> ChatResult<Self> {
        if !config.model_path.exists() {
            return Err(ChatError::InvalidConfig(format!(
                "model artifact not found: {}",
                config.model_path.display()
            )));
        }

        if config.executable.components().count() > 1 && !config.executable.exists() {
            return Err(ChatError::InvalidConfig(format!(
                "completion executable not found: {}",
                config.executable.display()
            )));
        }

        let rules = SanitizeRules::new(&config.sanitizer);
        Ok(Self { config, rules })
    }

    async fn run_once(&self, prompt: &str) -> ChatResult<String> {
        // Scoped resource: the temp file is removed on drop on every exit
        // path below, including launch failure and timeout.
        let prompt_file = write_prompt_file(prompt)?;

        let mut command = Command::new(&self.config.executable);
        command
            .arg("-m")
            .arg(&self.config.model_path)
            .arg("-no-cnv")
            .arg("--no-display-prompt")
            .arg("--ctx-size")
            .arg(self.config.ctx_size.to_string())
            .arg("--n-predict")
            .arg(self.config.max_new_tokens.to_string())
            .arg("--temp")
            .arg(self.config.temperature.to_string())
            .arg("-f")
            .arg(prompt_file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(
            "Running completion via {} ({} prompt chars)",
            self.config.executable.display(),
            prompt.chars().count()
        );

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let output = match tokio::time::timeout(timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                return Err(ChatError::Launch {
                    command: self.config.executable.display().to_string(),
                    source,
                });
            }
            Err(_elapsed) => {
                return Err(ChatError::Timeout(self.config.timeout_secs));
            }
        };

        // Exit status is diagnostic only: some model builds exit non-zero
        // after printing a complete reply, and an unusable reply already
        // degrades to an empty cleaned string.
        match output.status.code() {
            Some(0) => debug!("Completion process exited cleanly"),
            Some(code) => warn!("Completion process exited with code {code}"),
            None => warn!("Completion process was terminated by a signal"),
        }

        // The binary writes its banner and runtime logs to stderr and the
        // generated text to stdout; stderr goes first in the merged buffer
        // so banner stripping sees the original chronological order.
        let mut raw = String::from_utf8_lossy(&output.stderr).into_owned();
        raw.push('\n');
        raw.push_str(&String::from_utf8_lossy(&output.stdout));

        Ok(sanitizer::clean(&raw, &self.rules))
    }
}

impl CompletionBackend for LlamaCliClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a, ChatResult<String>> {
        Box::pin(self.run_once(prompt))
    }
}

fn write_prompt_file(prompt: &str) -> ChatResult<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(prompt.as_bytes())?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_with_executable(executable: PathBuf, model: &NamedTempFile) -> CompletionConfig {
        CompletionConfig {
            executable,
            model_path: model.path().to_path_buf(),
            ..CompletionConfig::default()
        }
    }

    #[test]
    fn test_new_rejects_missing_model() {
        let config = CompletionConfig {
            model_path: PathBuf::from("no/such/model.gguf"),
            ..CompletionConfig::default()
        };
        assert!(matches!(
            LlamaCliClient::new(config),
            Err(ChatError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_new_rejects_missing_executable_path() {
        let model = NamedTempFile::new().unwrap();
        let config = config_with_executable(PathBuf::from("/no/such/llama-cli"), &model);
        assert!(matches!(
            LlamaCliClient::new(config),
            Err(ChatError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_reports_launch_failure() {
        let model = NamedTempFile::new().unwrap();
        // A bare name passes construction but cannot be resolved at launch.
        let config = config_with_executable(PathBuf::from("definitely-not-a-real-binary"), &model);
        let client = LlamaCliClient::new(config).unwrap();

        let result = client.complete("hello").await;
        assert!(matches!(result, Err(ChatError::Launch { .. })));
    }

    #[tokio::test]
    async fn test_complete_captures_and_cleans_output() {
        let model = NamedTempFile::new().unwrap();
        // `echo` stands in for the model binary: it prints the fixed argv
        // back, which exercises the full capture-and-clean path.
        let config = config_with_executable(PathBuf::from("/bin/echo"), &model);
        let client = LlamaCliClient::new(config).unwrap();

        let cleaned = client.complete("hello").await.unwrap();
        assert!(cleaned.contains("-no-cnv"));
        assert!(cleaned.contains("--ctx-size 900"));
        assert!(cleaned.contains("--n-predict 128"));
        assert!(cleaned.contains("--temp 0.7"));
    }

    #[test]
    fn test_prompt_file_holds_exact_prompt() {
        let file = write_prompt_file("the exact prompt").unwrap();
        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "the exact prompt");
    }

    #[test]
    fn test_prompt_file_removed_on_drop() {
        let path = {
            let file = write_prompt_file("transient").unwrap();
            file.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
