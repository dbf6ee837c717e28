//! Identity scrubbing for model replies.

use regex::Regex;

use crate::chat::core::config::PersonaConfig;

/// Compiled identity-scrubbing rules.
///
/// Replaces known foreign assistant names with the persona name and removes
/// known self-introduction sentences. This is a mitigation, not a guarantee:
/// the rules cover the leak patterns observed from small local models, not
/// every phrasing an uncontrolled model could produce.
pub struct IdentityScrubber {
    persona: String,
    name_rules: Vec<Regex>,
    intro_rules: Vec<Regex>,
    leading_question: Regex,
}

impl IdentityScrubber {
    /// Compile the scrubbing rules for a persona.
    ///
    /// # Errors
    /// Returns an error if any pattern fails to compile.
    pub fn new(persona: &PersonaConfig) -> Result<Self, regex::Error> {
        let mut name_rules = Vec::with_capacity(persona.foreign_names.len());
        for name in &persona.foreign_names {
            name_rules.push(Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name)))?);
        }

        let persona_name = regex::escape(&persona.name);
        let intro_rules = vec![
            Regex::new(&format!(
                r"(?i)i am {persona_name},? a large language model[^.]*\."
            ))?,
            Regex::new(r"(?i)i am a large language model[^.]*\.")?,
            Regex::new(r"(?i)i am an ai assistant[^.]*\.")?,
        ];

        Ok(Self {
            persona: persona.name.clone(),
            name_rules,
            intro_rules,
            leading_question: Regex::new(r"^\s*\?\s*")?,
        })
    }

    /// Rewrite identity leaks in a reply.
    ///
    /// Foreign names are replaced first so that self-introductions phrased
    /// with a foreign name collapse onto the persona pattern and get removed
    /// by the same rule.
    #[must_use]
    pub fn scrub(&self, text: &str) -> String {
        let mut cleaned = text.to_string();

        for rule in &self.name_rules {
            cleaned = rule.replace_all(&cleaned, self.persona.as_str()).into_owned();
        }

        for rule in &self.intro_rules {
            cleaned = rule.replace_all(&cleaned, "").into_owned();
        }

        let cleaned = self.leading_question.replace(&cleaned, "");
        cleaned.trim().to_string()
    }
}
