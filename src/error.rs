//! Error types for fetchguard
//!
//! Configuration errors are fatal at construction time; policy errors are
//! surfaced to the calling tool as hard failures.

use std::path::PathBuf;

use thiserror::Error;

/// A rules document that cannot be turned into a valid [`crate::RuleSet`].
///
/// Construction never yields a partially valid manager: the first problem
/// found aborts the whole build, and any previously installed manager stays
/// active.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML (this also covers duplicate rule
    /// names, which the parser rejects as duplicate table keys).
    #[error("failed to parse rules document: {0}")]
    Parse(#[from] toml::de::Error),

    /// The rules file could not be read.
    #[error("failed to read rules file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `version` is missing or empty.
    #[error("rules version is required")]
    MissingVersion,

    /// A rule names an action outside allow/warn/block.
    #[error("rule {rule} has unknown action {action:?} (expected allow, warn or block)")]
    UnknownAction { rule: String, action: String },

    /// A rule has an empty pattern list.
    #[error("rule {rule} has no patterns")]
    EmptyPatterns { rule: String },

    /// A pattern entry has neither a `contains` literal nor a `regex`.
    #[error("rule {rule} pattern {index} has no match criteria")]
    EmptyPattern { rule: String, index: usize },

    /// A pattern regex failed to compile.
    #[error("rule {rule} pattern {index} has invalid regex: {source}")]
    InvalidRegex {
        rule: String,
        index: usize,
        #[source]
        source: regex::Error,
    },

    /// A size threshold in `settings` is negative.
    #[error("settings.{field} must be non-negative, got {value}")]
    NegativeSize { field: &'static str, value: i64 },

    /// The entropy threshold is outside the meaningful range for
    /// per-character Shannon entropy.
    #[error("settings.entropy_threshold must be between 1.0 and 8.0, got {0}")]
    InvalidEntropyThreshold(f64),
}

/// A policy decision that the calling tool must surface as a failure.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The hostname matched a deny pattern. The request must not proceed.
    #[error("access denied: {domain} matches deny pattern {pattern}")]
    AccessDenied { domain: String, pattern: String },

    /// A trusted-domains list is configured and the hostname is not on it.
    #[error("access denied: {domain} is not in the trusted domains list")]
    UntrustedDomain { domain: String },

    /// Content analysis resolved to a block verdict. The retrieved body must
    /// be discarded, not returned to the caller.
    #[error("content blocked: {message}")]
    ContentBlocked { message: String },
}
