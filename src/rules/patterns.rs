//! Compiled content patterns
//!
//! Pattern entries from the rules document are resolved into matchers once,
//! at rule-set construction. Scans never re-parse a pattern.

use regex::{Regex, RegexBuilder};

use crate::config::PatternEntry;
use crate::error::ConfigError;

/// A single compiled matcher.
///
/// For case-insensitive rule sets the `Contains` needle is lowercased at
/// compile time and expects a lowercased haystack; regexes carry the
/// equivalent flag internally, so both variants can run over the same folded
/// prefix.
#[derive(Debug, Clone)]
pub enum PatternMatcher {
    Contains { needle: String },
    Regex(Regex),
}

impl PatternMatcher {
    /// Compile one document entry into its matchers. An entry may carry a
    /// `contains` literal, a `regex`, or both; an entry with neither is a
    /// configuration error.
    pub fn compile(
        entry: &PatternEntry,
        case_sensitive: bool,
        rule: &str,
        index: usize,
    ) -> Result<Vec<Self>, ConfigError> {
        let mut matchers = Vec::new();

        if let Some(contains) = &entry.contains {
            let needle = if case_sensitive {
                contains.clone()
            } else {
                contains.to_lowercase()
            };
            matchers.push(PatternMatcher::Contains { needle });
        }

        if let Some(pattern) = &entry.regex {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
                .map_err(|source| ConfigError::InvalidRegex {
                    rule: rule.to_string(),
                    index,
                    source,
                })?;
            matchers.push(PatternMatcher::Regex(regex));
        }

        if matchers.is_empty() {
            return Err(ConfigError::EmptyPattern {
                rule: rule.to_string(),
                index,
            });
        }

        Ok(matchers)
    }

    /// Match against a haystack that has already been folded to match the
    /// rule set's case sensitivity.
    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            PatternMatcher::Contains { needle } => haystack.contains(needle.as_str()),
            PatternMatcher::Regex(regex) => regex.is_match(haystack),
        }
    }
}
