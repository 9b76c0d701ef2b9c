//! Compiled security rules for fetchguard
//!
//! A [`RuleSet`] is the validated, immutable form of a rules document. It is
//! built once, shared behind an `Arc`, and never mutated; reconfiguration
//! always compiles a fresh one.

pub mod allowlist;
pub mod domains;
pub mod patterns;

use serde::{Deserialize, Serialize};

use crate::config::RuleSetConfig;
use crate::error::ConfigError;
use domains::DomainList;
use patterns::PatternMatcher;

/// Action attached to a rule and to a resolved verdict.
///
/// Ordering is severity: `Block` overrides `Warn` overrides `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Allow,
    Warn,
    Block,
}

impl Action {
    /// Parse an action literal from a rules document.
    pub fn parse(literal: &str) -> Option<Self> {
        match literal {
            "allow" => Some(Action::Allow),
            "warn" => Some(Action::Warn),
            "block" => Some(Action::Block),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Warn => "warn",
            Action::Block => "block",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated global settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub enabled: bool,
    /// Bytes scanned for literal/regex patterns; 0 disables the cap.
    pub max_content_size: usize,
    /// Bytes scanned by the entropy heuristic; 0 disables the cap.
    pub max_entropy_size: usize,
    pub case_sensitive: bool,
    /// Carried for an external notification logger; not interpreted here.
    pub enable_notifications: bool,
    pub entropy_threshold: f64,
    pub entropy_action: Action,
}

/// One compiled rule: a name, a description, an action and at least one
/// pattern matcher.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    description: String,
    action: Action,
    matchers: Vec<PatternMatcher>,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// True if any of the rule's patterns matches the folded haystack.
    pub fn matches(&self, haystack: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(haystack))
    }
}

/// The immutable, validated rule snapshot consulted by a single check.
#[derive(Debug, Clone)]
pub struct RuleSet {
    version: String,
    settings: Settings,
    deny_domains: DomainList,
    deny_files: Vec<String>,
    trusted_domains: DomainList,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile and validate a parsed rules document.
    ///
    /// Fails on the first problem found; a `RuleSet` is never partially
    /// valid.
    pub fn compile(config: RuleSetConfig) -> Result<Self, ConfigError> {
        if config.version.trim().is_empty() {
            return Err(ConfigError::MissingVersion);
        }

        let settings = compile_settings(&config)?;

        let mut rules = Vec::with_capacity(config.rules.len());
        // BTreeMap iteration is name-ordered, which keeps everything
        // downstream deterministic.
        for (name, rule) in &config.rules {
            let action = Action::parse(&rule.action).ok_or_else(|| ConfigError::UnknownAction {
                rule: name.clone(),
                action: rule.action.clone(),
            })?;

            if rule.patterns.is_empty() {
                return Err(ConfigError::EmptyPatterns { rule: name.clone() });
            }

            let mut matchers = Vec::new();
            for (index, entry) in rule.patterns.iter().enumerate() {
                matchers.extend(PatternMatcher::compile(
                    entry,
                    settings.case_sensitive,
                    name,
                    index,
                )?);
            }

            rules.push(Rule {
                name: name.clone(),
                description: rule.description.clone(),
                action,
                matchers,
            });
        }

        let deny_files = config
            .access_control
            .deny_files
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self {
            version: config.version,
            settings,
            deny_domains: DomainList::from_entries(&config.access_control.deny_domains),
            deny_files,
            trusted_domains: DomainList::from_entries(&config.trusted_domains),
            rules,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn deny_domains(&self) -> &DomainList {
        &self.deny_domains
    }

    /// File deny patterns, enforced by filesystem collaborators.
    pub fn deny_files(&self) -> &[String] {
        &self.deny_files
    }

    pub fn trusted_domains(&self) -> &DomainList {
        &self.trusted_domains
    }

    /// All rules, ordered by name.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

fn compile_settings(config: &RuleSetConfig) -> Result<Settings, ConfigError> {
    let raw = &config.settings;

    let max_content_size = non_negative("max_content_size", raw.max_content_size)?;
    let max_entropy_size = non_negative("max_entropy_size", raw.max_entropy_size)?;

    if !(1.0..=8.0).contains(&raw.entropy_threshold) {
        return Err(ConfigError::InvalidEntropyThreshold(raw.entropy_threshold));
    }

    let entropy_action =
        Action::parse(&raw.entropy_action).ok_or_else(|| ConfigError::UnknownAction {
            rule: "settings.entropy_action".to_string(),
            action: raw.entropy_action.clone(),
        })?;

    Ok(Settings {
        enabled: raw.enabled,
        max_content_size,
        max_entropy_size,
        case_sensitive: raw.case_sensitive,
        enable_notifications: raw.enable_notifications,
        entropy_threshold: raw.entropy_threshold,
        entropy_action,
    })
}

fn non_negative(field: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::NegativeSize { field, value })
}
