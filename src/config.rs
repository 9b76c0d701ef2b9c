//! Rules document loading for fetchguard
//!
//! The rules document is TOML. This module is the raw serde layer: it mirrors
//! the document structure and performs no validation beyond what the parser
//! enforces. Compiling a document into a usable [`crate::RuleSet`] (and
//! rejecting bad actions, empty patterns, malformed regexes and out-of-range
//! thresholds) happens in [`crate::rules`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Raw `settings` table.
///
/// Sizes are in bytes and deserialized as signed integers so that a negative
/// value can be reported as a configuration error rather than a parse error.
/// A size of 0 disables the corresponding cap.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// Master switch. When false every check short-circuits to allow.
    pub enabled: bool,

    /// Bytes of content scanned for literal/regex patterns.
    pub max_content_size: i64,

    /// Bytes of content scanned by the entropy heuristic.
    pub max_entropy_size: i64,

    /// Whether pattern matching is case sensitive.
    pub case_sensitive: bool,

    /// Consumed by an external notification logger, not by the engine.
    pub enable_notifications: bool,

    /// Per-character Shannon entropy (bits) at which a span counts as
    /// likely obfuscated. Valid range 1.0-8.0.
    pub entropy_threshold: f64,

    /// Severity contributed by the entropy heuristic when it fires.
    pub entropy_action: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_content_size: 1_048_576,
            max_entropy_size: 65_536,
            case_sensitive: false,
            enable_notifications: false,
            entropy_threshold: 4.8,
            entropy_action: "warn".to_string(),
        }
    }
}

/// Raw `access_control` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccessControlConfig {
    /// Domain patterns that may never be contacted. Supports `*.suffix`.
    pub deny_domains: Vec<String>,

    /// File patterns owned here but enforced by filesystem collaborators.
    pub deny_files: Vec<String>,
}

/// One pattern entry inside a rule. At least one criterion is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatternEntry {
    /// Literal substring match.
    pub contains: Option<String>,

    /// Regular expression match.
    pub regex: Option<String>,
}

/// Raw rule definition.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub description: String,

    /// One of `allow`, `warn`, `block`.
    pub action: String,

    pub patterns: Vec<PatternEntry>,
}

/// The complete rules document.
///
/// Rule names are table keys, so the parser itself guarantees uniqueness:
/// a document with two `[rules.x]` tables fails to parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuleSetConfig {
    pub version: String,

    pub settings: SettingsConfig,

    /// Domain patterns that are always reachable. When non-empty, hostnames
    /// outside the list are rejected.
    pub trusted_domains: Vec<String>,

    pub access_control: AccessControlConfig,

    pub rules: BTreeMap<String, RuleConfig>,
}

impl RuleSetConfig {
    /// Parse a TOML document.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(document)?)
    }

    /// Read and parse a rules file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&document)
    }

    /// Load from the standard location, falling back to the embedded
    /// defaults when no file exists.
    ///
    /// The path is `~/.fetchguard/rules.toml`, overridable via
    /// `FETCHGUARD_RULES_PATH`.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = Self::rules_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Self::from_toml(DEFAULT_RULES_TOML)
    }

    /// Resolve the rules file path.
    pub fn rules_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("FETCHGUARD_RULES_PATH") {
            if !path.trim().is_empty() {
                return Some(expand_path(&path));
            }
        }
        dirs::home_dir().map(|home| home.join(".fetchguard/rules.toml"))
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Embedded default rules document, used when no rules file is present.
pub const DEFAULT_RULES_TOML: &str = r#"
version = "1.0"

[settings]
enabled = true
case_sensitive = false
max_content_size = 1048576
max_entropy_size = 65536
entropy_threshold = 4.8
entropy_action = "warn"
enable_notifications = false

trusted_domains = []

[access_control]
deny_domains = []
deny_files = [
    "~/.ssh/",
    "~/.aws/credentials",
    "~/.kube/config",
    ".env",
]

[rules.obvious_malware]
description = "Destructive shell commands in retrieved content"
action = "block"
patterns = [
    { contains = "rm -rf /" },
    { regex = 'dd\s+if=/dev/(zero|random|urandom)\s+of=/dev/' },
    { contains = ":(){ :|:& };:" },
]

[rules.remote_code_execution]
description = "Remote content piped directly into a shell"
action = "block"
patterns = [
    { regex = '(curl|wget)[^\n|]*\|\s*(ba|z)?sh' },
]

[rules.credential_exfiltration]
description = "Credential material assigned or posted in retrieved content"
action = "warn"
patterns = [
    { regex = '(api[_-]?key|secret[_-]?key|access[_-]?token|password)\s*[=:]\s*\S+' },
]
"#;
