//! Prompt construction.

use para_core::{CategorySet, FeatureSummary};

/// Descriptions for the conventional PARA labels. Other labels are listed bare.
const KNOWN_DESCRIPTIONS: [(&str, &str); 4] = [
    (
        "projects",
        "short-term efforts with a concrete outcome, open tasks or a deadline",
    ),
    (
        "areas",
        "ongoing responsibilities with a standard to maintain and no end date",
    ),
    (
        "resources",
        "reference material and topics of interest kept for later use",
    ),
    (
        "archive",
        "inactive items from the other categories: finished, paused or obsolete",
    ),
];

const TRUNCATION_MARKER: &str = "\n[... note truncated ...]";

/// Builds the system and user messages for one note.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    categories: CategorySet,
    max_note_chars: usize,
}

impl PromptBuilder {
    pub fn new(categories: CategorySet, max_note_chars: usize) -> Self {
        Self {
            categories,
            max_note_chars,
        }
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// System message. The caller instruction is appended after the base
    /// rules and never replaces them.
    pub fn system(&self, custom_instruction: Option<&str>, strict: bool) -> String {
        let mut out = String::from(
            "You classify personal notes into exactly one category.\n\nCategories:\n",
        );
        for category in self.categories.iter() {
            let key = category.as_str().to_lowercase();
            match KNOWN_DESCRIPTIONS.iter().find(|(k, _)| *k == key) {
                Some((_, description)) => {
                    out.push_str(&format!("- {category}: {description}\n"));
                }
                None => out.push_str(&format!("- {category}\n")),
            }
        }

        out.push_str(
            "\nRules:\n\
             - Choose exactly one category from the list and spell it exactly as listed.\n\
             - Weigh the note's structure (tasks, deadlines, links, tags) as well as its topic.\n\
             - confidence is a number between 0 and 1 describing how sure you are.\n\
             - Reply with a JSON object: {\"category\": \"<label>\", \"confidence\": <number>, \"rationale\": \"<one sentence>\"}.\n",
        );

        if let Some(instruction) = custom_instruction.map(str::trim).filter(|s| !s.is_empty()) {
            out.push_str("\nAdditional instruction from the user (applies on top of the rules above):\n");
            out.push_str(instruction);
            out.push('\n');
        }

        if strict {
            out.push_str(
                "\nIMPORTANT: your previous reply could not be parsed. Reply with ONLY the JSON \
                 object. No prose, no markdown, no code fences. \"category\" must be one of: ",
            );
            out.push_str(&self.categories.joined());
            out.push_str(". \"confidence\" must be a bare number.\n");
        }
        out
    }

    /// User message: feature summary followed by the (possibly truncated) note.
    pub fn user(&self, note_text: &str, features: &FeatureSummary) -> String {
        format!(
            "Note features: {}\n\nNote content:\n{}",
            features.describe(),
            truncate_chars(note_text, self.max_note_chars)
        )
    }
}

/// Cut `text` to at most `max` characters on a char boundary, marking the cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn builder(max: usize) -> PromptBuilder {
        let set = CategorySet::new(["Projects", "Areas", "Someday"], &BTreeMap::new()).unwrap();
        PromptBuilder::new(set, max)
    }

    #[test]
    fn system_prompt_lists_every_category() {
        let s = builder(100).system(None, false);
        assert!(s.contains("- Projects: short-term efforts"));
        assert!(s.contains("- Areas: ongoing"));
        assert!(s.contains("- Someday\n"));
        assert!(!s.contains("Additional instruction"));
        assert!(!s.contains("IMPORTANT"));
    }

    #[test]
    fn custom_instruction_is_appended_after_rules() {
        let s = builder(100).system(Some("Treat recipes as Areas"), false);
        let rules = s.find("Rules:").unwrap();
        let extra = s.find("Treat recipes as Areas").unwrap();
        assert!(extra > rules);
        assert!(s.contains("Choose exactly one category"));
    }

    #[test]
    fn blank_instruction_is_ignored() {
        assert!(!builder(100).system(Some("   "), false).contains("Additional instruction"));
    }

    #[test]
    fn strict_variant_demands_bare_json() {
        let s = builder(100).system(None, true);
        assert!(s.contains("ONLY the JSON"));
        assert!(s.contains("Projects, Areas, Someday"));
    }

    #[test]
    fn note_content_is_truncated_on_char_boundary() {
        let u = builder(3).user("ñandú rocks", &FeatureSummary::default());
        assert!(u.contains("ñan\n[... note truncated ...]"));
        assert!(u.starts_with("Note features: words=0"));
    }

    #[test]
    fn short_note_is_not_truncated() {
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("", 0), "");
    }
}
