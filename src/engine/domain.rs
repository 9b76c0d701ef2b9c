//! Domain gate
//!
//! Decides whether a hostname may be contacted at all. Deny patterns always
//! win over trusted patterns for the same hostname; a non-empty trusted list
//! restricts everything else to its entries; with neither configured the
//! default is permissive.

use tracing::warn;

use crate::error::PolicyError;
use crate::rules::domains::normalise_host;
use crate::rules::RuleSet;

/// Check one hostname against the installed rule snapshot.
///
/// Pure in (hostname, rules); the only side effect is tracing.
pub fn check(rules: &RuleSet, hostname: &str) -> Result<(), PolicyError> {
    let host = normalise_host(hostname);

    if let Some(pattern) = rules.deny_domains().find_match(&host) {
        warn!(domain = %host, pattern = %pattern, "domain access denied");
        return Err(PolicyError::AccessDenied {
            domain: host,
            pattern: pattern.as_str().to_string(),
        });
    }

    let trusted = rules.trusted_domains();
    if !trusted.is_empty() && !trusted.matches(&host) {
        warn!(domain = %host, "domain outside trusted list");
        return Err(PolicyError::UntrustedDomain { domain: host });
    }

    Ok(())
}
