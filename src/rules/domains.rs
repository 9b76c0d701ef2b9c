//! Domain pattern matching
//!
//! One matching contract shared by the deny list, the trusted list and the
//! fetch allowlist: patterns are compared case-insensitively, and a
//! `*.example.com` wildcard matches `example.com` itself as well as any
//! subdomain at any depth.

use std::fmt;

/// Normalise a hostname for matching: trim surrounding whitespace and
/// ASCII-lowercase.
pub fn normalise_host(hostname: &str) -> String {
    hostname.trim().to_ascii_lowercase()
}

/// Split a comma-separated pattern list, trimming whitespace and dropping
/// empty entries.
pub fn split_patterns(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|p| !p.is_empty())
}

/// A single domain pattern, either exact (`docs.rs`) or a wildcard over a
/// base domain (`*.example.com`).
#[derive(Debug, Clone)]
pub struct DomainPattern {
    pattern: String,
    base: String,
    wildcard: bool,
}

impl DomainPattern {
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.trim();
        let wildcard = pattern.starts_with("*.");
        let base = if wildcard {
            pattern[2..].to_ascii_lowercase()
        } else {
            pattern.to_ascii_lowercase()
        };

        Self {
            pattern: pattern.to_string(),
            base,
            wildcard,
        }
    }

    /// Match an already-normalised hostname (see [`normalise_host`]).
    ///
    /// `*.example.com` matches `example.com`, `api.example.com` and
    /// `api.v1.example.com`, but never `example.org`.
    pub fn matches(&self, host: &str) -> bool {
        if self.wildcard {
            host == self.base || host.ends_with(&format!(".{}", self.base))
        } else {
            host == self.base
        }
    }

    /// The pattern as originally written.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl fmt::Display for DomainPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// An ordered list of domain patterns.
#[derive(Debug, Clone, Default)]
pub struct DomainList {
    patterns: Vec<DomainPattern>,
}

impl DomainList {
    /// Parse a comma-separated pattern list.
    pub fn parse(list: &str) -> Self {
        Self {
            patterns: split_patterns(list).map(DomainPattern::new).collect(),
        }
    }

    /// Build from individual entries. Each entry still goes through the
    /// comma/trim normalisation so that configured arrays and comma-joined
    /// strings behave identically.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: entries
                .into_iter()
                .flat_map(|entry| {
                    split_patterns(entry.as_ref())
                        .map(DomainPattern::new)
                        .collect::<Vec<_>>()
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// First pattern matching the normalised hostname, if any.
    pub fn find_match(&self, host: &str) -> Option<&DomainPattern> {
        self.patterns.iter().find(|p| p.matches(host))
    }

    pub fn matches(&self, host: &str) -> bool {
        self.find_match(host).is_some()
    }
}
