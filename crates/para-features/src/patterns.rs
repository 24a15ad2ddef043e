//! Compiled detection patterns.
//!
//! Patterns are literals, so compilation cannot fail in practice; a failed
//! compile leaves the pattern as `None` and the feature reads as absent.

use std::sync::LazyLock;

use regex::Regex;

/// `#tag` in body text. Requires a letter after `#` so headings never match,
/// and whitespace (or line start) before it so `[[Note#Heading]]` never matches.
pub(crate) static TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)#([A-Za-z][\w/-]*)").ok());

pub(crate) static OPEN_TASK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+\[ \]").ok());

pub(crate) static DONE_TASK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+\[[xX]\]").ok());

pub(crate) static TODO_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bTODO:").ok());

pub(crate) static DEADLINE_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?im)\b(?:deadline|due(?:\s+date)?)\s*::?\s*\S").ok());

pub(crate) static ISO_DATE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").ok());

pub(crate) static SLASH_DATE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").ok());

/// `[[link]]`, and `![[embed]]` so that embeds can be told apart.
pub(crate) static WIKILINK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"!?\[\[[^\]]+\]\]").ok());

/// `![alt](path)` or `![[embedded]]`.
pub(crate) static ATTACHMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)|!\[\[[^\]]+\]\]").ok());

pub(crate) fn count(pattern: &LazyLock<Option<Regex>>, text: &str) -> usize {
    pattern.as_ref().map_or(0, |re| re.find_iter(text).count())
}

/// Wikilinks that are not `!` embeds.
pub(crate) fn count_wikilinks(text: &str) -> usize {
    WIKILINK.as_ref().map_or(0, |re| {
        re.find_iter(text)
            .filter(|m| !m.as_str().starts_with('!'))
            .count()
    })
}

pub(crate) fn matches(pattern: &LazyLock<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}
