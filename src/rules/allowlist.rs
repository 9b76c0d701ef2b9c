//! Deployment-level fetch allowlist
//!
//! A lighter-weight gate used by the URL-fetch tool directly, driven by a
//! single comma-separated environment value instead of a full rule set. It
//! is built on the same [`DomainList`] as the domain gate, so the two
//! mechanisms cannot diverge: the same wildcard, trimming and case rules
//! apply.

use crate::rules::domains::{normalise_host, DomainList};

/// Environment variable holding the comma-separated allowlist.
pub const ALLOWLIST_ENV: &str = "FETCHGUARD_DOMAIN_ALLOWLIST";

/// Compiled allowlist. An empty list allows every domain.
#[derive(Debug, Clone, Default)]
pub struct FetchAllowlist {
    patterns: DomainList,
}

impl FetchAllowlist {
    /// Build from a comma-separated pattern list.
    pub fn from_list(list: &str) -> Self {
        Self {
            patterns: DomainList::parse(list),
        }
    }

    /// Build from [`ALLOWLIST_ENV`]. Unset means unrestricted.
    pub fn from_env() -> Self {
        match std::env::var(ALLOWLIST_ENV) {
            Ok(list) => Self::from_list(&list),
            Err(_) => Self::default(),
        }
    }

    /// True when no patterns are configured, i.e. every domain is allowed.
    pub fn is_unrestricted(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `hostname` may be fetched.
    pub fn is_allowed(&self, hostname: &str) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        self.patterns.matches(&normalise_host(hostname))
    }
}
