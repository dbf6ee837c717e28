//! Binary entrypoint that launches the Mochi terminal chat.

use std::process::ExitCode;

use mochi_agent::start_mochi_chat;

/// Start the chat by loading configuration and driving the local model.
fn main() -> ExitCode {
    start_mochi_chat::run()
}
