//! Security engine for fetchguard
//!
//! [`SecurityManager`] is the facade every network-facing tool talks to: one
//! check before contacting a host, one after reading a response body. A
//! manager owns an immutable [`RuleSet`] snapshot; the process-wide current
//! manager lives in a single slot that is replaced atomically on
//! reconfiguration, so the hot path is a snapshot load with no lock held
//! during a check.

pub mod content;
pub mod domain;
pub mod entropy;
pub mod resolver;

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::config::RuleSetConfig;
use crate::error::{ConfigError, PolicyError};
use crate::rules::RuleSet;
use crate::verdict::{SourceContext, Verdict};

/// The main security engine: a validated rule snapshot plus the two check
/// operations.
#[derive(Debug)]
pub struct SecurityManager {
    rules: Arc<RuleSet>,
}

impl SecurityManager {
    /// Compile a parsed rules document into a ready manager.
    ///
    /// All validation happens here; a returned manager is never partially
    /// valid.
    pub fn new(config: RuleSetConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            rules: Arc::new(RuleSet::compile(config)?),
        })
    }

    /// Parse and compile a TOML rules document.
    pub fn from_toml(document: &str) -> Result<Self, ConfigError> {
        Self::new(RuleSetConfig::from_toml(document)?)
    }

    /// Read, parse and compile a rules file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::new(RuleSetConfig::from_file(path)?)
    }

    /// True iff the rule set's master switch is on.
    pub fn is_enabled(&self) -> bool {
        self.rules.settings().enabled
    }

    /// The rule snapshot this manager answers from.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Decide whether `hostname` may be contacted. Called before any
    /// outbound connection attempt; an error must be surfaced to the tool's
    /// caller as a hard failure.
    pub fn check_domain_access(&self, hostname: &str) -> Result<(), PolicyError> {
        if !self.is_enabled() {
            return Ok(());
        }
        domain::check(&self.rules, hostname)
    }

    /// Analyse a fully-read response body before it is handed back to the
    /// invoking caller.
    pub fn analyse_content(&self, content: &str, source: &SourceContext) -> Verdict {
        if !self.is_enabled() {
            debug!(
                content_length = content.len(),
                tool = %source.tool,
                "security disabled, allowing content without analysis"
            );
            return Verdict::allow();
        }

        debug!(
            content_length = content.len(),
            domain = %source.domain,
            tool = %source.tool,
            "analysing content"
        );

        let classification = content::classify(&self.rules, content);
        let verdict = resolver::resolve(&classification, self.rules.settings());

        if !verdict.message.is_empty() {
            debug!(
                action = %verdict.action,
                message = %verdict.message,
                domain = %source.domain,
                "content analysis produced signals"
            );
        }

        verdict
    }
}

/// The process-wide current manager. `None` means no policy is installed and
/// every check answers permissively.
static CURRENT_MANAGER: Lazy<RwLock<Option<Arc<SecurityManager>>>> =
    Lazy::new(|| RwLock::new(None));

/// Install a manager as the process-wide current one, replacing any previous
/// manager in a single swap. In-flight checks keep the snapshot they already
/// cloned.
pub fn install(manager: SecurityManager) -> Arc<SecurityManager> {
    let manager = Arc::new(manager);
    let mut slot = CURRENT_MANAGER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *slot = Some(Arc::clone(&manager));
    manager
}

/// Remove the current manager. Checks revert to permissive answers.
pub fn uninstall() {
    let mut slot = CURRENT_MANAGER
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    *slot = None;
}

/// Snapshot of the current manager, if one is installed.
pub fn current() -> Option<Arc<SecurityManager>> {
    CURRENT_MANAGER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Cheap pre-check: true iff a manager is installed and enabled. Tools may
/// use this to skip building a [`SourceContext`] entirely.
pub fn is_enabled() -> bool {
    current().map(|m| m.is_enabled()).unwrap_or(false)
}

/// Check a hostname against the current manager. Permissive when none is
/// installed.
pub fn check_domain_access(hostname: &str) -> Result<(), PolicyError> {
    match current() {
        Some(manager) => manager.check_domain_access(hostname),
        None => Ok(()),
    }
}

/// Analyse content against the current manager. Permissive when none is
/// installed.
pub fn analyse_content(content: &str, source: &SourceContext) -> Verdict {
    match current() {
        Some(manager) => manager.analyse_content(content, source),
        None => Verdict::allow(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Action;

    fn manager(document: &str) -> SecurityManager {
        SecurityManager::from_toml(document).unwrap()
    }

    #[test]
    fn test_disabled_manager_allows_everything() {
        let manager = manager(
            r#"
            version = "1"
            [settings]
            enabled = false
            [access_control]
            deny_domains = ["*"]
            [rules.everything]
            description = "matches everything"
            action = "block"
            patterns = [{ regex = "." }]
            "#,
        );

        assert!(!manager.is_enabled());
        assert!(manager.check_domain_access("any-domain.example").is_ok());

        let verdict = manager.analyse_content("any content", &SourceContext::default());
        assert!(verdict.safe);
        assert_eq!(verdict.action, Action::Allow);
    }

    #[test]
    fn test_enabled_manager_applies_rules() {
        let manager = manager(
            r#"
            version = "1"
            [access_control]
            deny_domains = ["blocked.example"]
            [rules.marker]
            description = "marker"
            action = "block"
            patterns = [{ contains = "needle" }]
            "#,
        );

        assert!(manager.is_enabled());
        assert!(manager.check_domain_access("blocked.example").is_err());
        assert!(manager.check_domain_access("fine.example").is_ok());

        let verdict = manager.analyse_content("has a needle in it", &SourceContext::default());
        assert!(verdict.is_blocked());
    }

    #[test]
    fn test_invalid_document_never_yields_manager() {
        assert!(SecurityManager::from_toml("version = \"1\"\n[rules.x]\naction = \"bogus\"\ndescription = \"\"\npatterns = [{ contains = \"a\" }]").is_err());
    }

    #[test]
    fn test_determinism_same_input_same_verdict() {
        let manager = manager(
            r#"
            version = "1"
            [rules.beta]
            description = "second marker"
            action = "warn"
            [[rules.beta.patterns]]
            contains = "needle"
            [rules.alpha]
            description = "first marker"
            action = "warn"
            [[rules.alpha.patterns]]
            contains = "needle"
            "#,
        );

        let source = SourceContext::default();
        let first = manager.analyse_content("a needle here", &source);
        for _ in 0..5 {
            let again = manager.analyse_content("a needle here", &source);
            assert_eq!(again.message, first.message);
            assert_eq!(again.action, first.action);
        }
        assert_eq!(
            first.message,
            "content flagged by [alpha, beta]: first marker; second marker"
        );
    }
}
