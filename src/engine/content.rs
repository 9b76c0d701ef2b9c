//! Content classification
//!
//! Scans a response body against every configured rule and runs the entropy
//! heuristic. The output is the raw set of signals; turning them into one
//! verdict is the resolver's job.

use std::borrow::Cow;

use crate::engine::entropy;
use crate::rules::{Action, RuleSet};

/// A rule that matched the scanned content.
#[derive(Debug, Clone)]
pub struct RuleMatch<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub action: Action,
}

/// All signals produced by one scan.
#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    pub matches: Vec<RuleMatch<'a>>,
    pub high_entropy: bool,
}

impl Classification<'_> {
    pub fn is_clean(&self) -> bool {
        self.matches.is_empty() && !self.high_entropy
    }
}

/// Longest prefix of `content` that fits in `max_bytes` without splitting a
/// UTF-8 sequence. A cap of 0 disables truncation.
pub fn bounded_prefix(content: &str, max_bytes: usize) -> &str {
    if max_bytes == 0 || content.len() <= max_bytes {
        return content;
    }
    let mut end = max_bytes;
    while end > 0 && !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

/// Run every rule and the entropy heuristic over `content`.
///
/// The literal/regex scan is capped to `max_content_size` bytes; the entropy
/// scan independently to `max_entropy_size` bytes. Pure in (content, rules).
pub fn classify<'a>(rules: &'a RuleSet, content: &str) -> Classification<'a> {
    let settings = rules.settings();

    let prefix = bounded_prefix(content, settings.max_content_size);
    let haystack: Cow<'_, str> = if settings.case_sensitive {
        Cow::Borrowed(prefix)
    } else {
        Cow::Owned(prefix.to_lowercase())
    };

    let mut matches = Vec::new();
    for rule in rules.rules() {
        if rule.matches(&haystack) {
            matches.push(RuleMatch {
                name: rule.name(),
                description: rule.description(),
                action: rule.action(),
            });
        }
    }

    let entropy_window = bounded_prefix(content, settings.max_entropy_size);
    let high_entropy =
        entropy::has_high_entropy_span(entropy_window, settings.entropy_threshold);

    Classification {
        matches,
        high_entropy,
    }
}
