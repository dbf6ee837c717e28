//! Prompt assembly for the conversation store.

use crate::chat::core::turn::{Speaker, Turn};

/// Prompt parts before formatting.
#[derive(Clone, Debug)]
pub struct PromptParts<'a> {
    /// Persona name used for instructions and assistant lines.
    pub persona: &'a str,
    /// Names the persona must never claim.
    pub foreign_names: &'a [String],
    /// Long-term summary; empty when no memory is stored.
    pub summary: &'a str,
    /// Turns to include, oldest first.
    pub turns: &'a [Turn],
}

/// Build the complete prompt block from prepared parts.
#[must_use]
pub fn build_prompt_block(parts: &PromptParts<'_>) -> String {
    let mut out = String::new();

    out.push_str(&persona_instructions(parts.persona, parts.foreign_names));

    if !parts.summary.is_empty() {
        out.push_str("Long-term memory about the user:\n");
        out.push_str(parts.summary);
        out.push_str("\n\n");
    }

    for turn in parts.turns {
        render_turn(&mut out, turn, parts.persona);
    }

    out
}

/// Fixed persona instruction block placed at the top of every prompt.
#[must_use]
pub fn persona_instructions(persona: &str, foreign_names: &[String]) -> String {
    let never = if foreign_names.is_empty() {
        "any other model name".to_string()
    } else {
        format!("{}, or any other model name", foreign_names.join(", "))
    };

    format!(
        "You are {persona}, a cute, friendly AI assistant running on the user's own computer.\n\
         - Always refer to yourself as \"{persona}\".\n\
         - Never say you are {never}.\n\
         - Answer in a natural, conversational style.\n\n"
    )
}

/// Render turns one per line, oldest first.
#[must_use]
pub fn render_history(turns: &[Turn], persona: &str) -> String {
    let mut out = String::new();
    for turn in turns {
        render_turn(&mut out, turn, persona);
    }
    out
}

fn render_turn(out: &mut String, turn: &Turn, persona: &str) {
    let name = match turn.speaker {
        Speaker::User => "User",
        Speaker::Assistant => persona,
    };
    out.push_str(name);
    out.push_str(": ");
    out.push_str(&turn.text);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_history_lines() {
        let turns = vec![Turn::user("hi"), Turn::assistant("hello!")];
        let rendered = render_history(&turns, "Mochi");
        assert_eq!(rendered, "User: hi\nMochi: hello!\n");
    }

    #[test]
    fn test_prompt_block_without_summary_has_no_memory_label() {
        let turns = vec![Turn::user("hi")];
        let parts = PromptParts {
            persona: "Mochi",
            foreign_names: &[],
            summary: "",
            turns: &turns,
        };
        let block = build_prompt_block(&parts);
        assert!(!block.contains("Long-term memory"));
        assert!(block.ends_with("User: hi\n"));
    }

    #[test]
    fn test_prompt_block_with_summary() {
        let turns = vec![Turn::user("hi")];
        let parts = PromptParts {
            persona: "Mochi",
            foreign_names: &[],
            summary: "User likes hiking.",
            turns: &turns,
        };
        let block = build_prompt_block(&parts);
        assert!(block.contains("Long-term memory about the user:\nUser likes hiking.\n\n"));
    }

    #[test]
    fn test_persona_instructions_list_foreign_names() {
        let foreign = vec!["Claude".to_string(), "Qwen".to_string()];
        let instructions = persona_instructions("Mochi", &foreign);
        assert!(instructions.contains("You are Mochi"));
        assert!(instructions.contains("Never say you are Claude, Qwen, or any other model name."));
    }
}
