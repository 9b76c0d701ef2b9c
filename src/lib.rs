//! fetchguard - security policy engine for network-facing tools
//!
//! Every network-facing tool in the surrounding system consults this engine
//! twice per request: once before contacting a remote host, and once after
//! reading a response body, before the content is handed back to the caller.
//!
//! # Features
//!
//! - **Domain gate**: deny lists and trusted lists with `*.suffix` wildcard
//!   matching, deny always winning over trust
//! - **Content classification**: literal and regex rules over a size-capped
//!   prefix, plus a Shannon-entropy heuristic for obfuscated payloads
//! - **Tiered verdicts**: block overrides warn overrides allow, with
//!   deterministic messages
//! - **Hot-swappable rules**: an immutable rule snapshot behind a single
//!   process-wide slot, replaced atomically on reconfiguration
//! - **Fetch allowlist**: an environment-driven allowlist for the URL-fetch
//!   tool with identical matching semantics
//!
//! # Example
//!
//! ```
//! use fetchguard::{SecurityManager, SourceContext};
//!
//! let manager = SecurityManager::from_toml(r#"
//!     version = "1.0"
//!
//!     trusted_domains = ["api.search.brave.com"]
//!
//!     [access_control]
//!     deny_domains = ["malicious-site.example"]
//!
//!     [rules.malicious_content]
//!     description = "Known dangerous download content"
//!     action = "block"
//!     patterns = [{ contains = "dangerous malware download" }]
//! "#).unwrap();
//!
//! assert!(manager.check_domain_access("malicious-site.example").is_err());
//! assert!(manager.check_domain_access("api.search.brave.com").is_ok());
//!
//! let verdict = manager.analyse_content(
//!     "... dangerous malware download ...",
//!     &SourceContext::default(),
//! );
//! assert!(!verdict.safe);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod rules;
pub mod verdict;

// Re-exports for convenience
pub use config::{RuleSetConfig, DEFAULT_RULES_TOML};
pub use engine::SecurityManager;
pub use error::{ConfigError, PolicyError};
pub use rules::allowlist::FetchAllowlist;
pub use rules::{Action, RuleSet};
pub use verdict::{SourceContext, Verdict};

/// Validate a TOML rules document without building a manager.
pub fn validate_rules(document: &str) -> Result<(), ConfigError> {
    RuleSet::compile(RuleSetConfig::from_toml(document)?).map(|_| ())
}
