//! Startup helpers for the Mochi terminal chat.
//!
//! Presentation stays deliberately thin: the loop only relays text to and
//! from the chat engine and exposes the memory viewer commands.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};

use crate::chat::core::config::ChatConfig;
use crate::chat::engine::core::ChatEngine;

/// Environment variable naming the configuration file path.
const CONFIG_ENV: &str = "MOCHI_CONFIG";
/// Default configuration file path when the environment variable is unset.
const DEFAULT_CONFIG_PATH: &str = "mochi.json";

/// Run the terminal chat (used by the `mochi` binary).
///
/// # Returns
/// `ExitCode::SUCCESS` on clean exit, `1` on failure.
#[must_use]
pub fn run() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting Mochi chat v{}", env!("CARGO_PKG_VERSION"));

    let config_path = config_path();
    let config = match ChatConfig::load_or_default(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config from {}: {e}", config_path.display());
            return ExitCode::from(1);
        }
    };

    let engine = match ChatEngine::from_config(&config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to build chat engine: {e}");
            return ExitCode::from(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create runtime: {e}");
            return ExitCode::from(1);
        }
    };

    if let Err(e) = chat_loop(&rt, engine, &config.persona.name) {
        error!("Chat loop error: {e}");
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Resolve the configuration file path from the environment.
#[must_use]
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn chat_loop(
    rt: &tokio::runtime::Runtime,
    mut engine: ChatEngine,
    persona: &str,
) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("=== {persona} - local chat (/memory, /forget, /clear, /quit) ===");

    loop {
        print!("You: ");
        stdout.flush().context("cannot flush stdout")?;

        let mut line = String::new();
        let read = stdin.read_line(&mut line).context("cannot read stdin")?;
        if read == 0 {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" => break,
            "/memory" => {
                let memory = engine.long_term_summary();
                if memory.is_empty() {
                    println!("(No long-term memory saved yet.)");
                } else {
                    println!("{memory}");
                }
            }
            "/forget" => {
                engine.clear_long_term_summary();
                println!("(Long-term memory cleared.)");
            }
            "/clear" => {
                let dropped = engine.turn_count();
                engine.clear_all();
                println!("(Cleared {dropped} turns and the long-term memory.)");
            }
            _ => {
                let reply = rt.block_on(engine.submit_user_message(input));
                println!("{persona}: {reply}");
            }
        }
    }

    Ok(())
}
