//! Entropy heuristic for likely-obfuscated content
//!
//! Detects packed or encoded payloads (base64 blobs, packed binaries) that no
//! literal pattern would catch. The measure is windowed Shannon entropy:
//! content is split into whitespace-delimited tokens and into trimmed lines,
//! and any token longer than [`MIN_TOKEN_LEN`] or line longer than
//! [`MIN_LINE_LEN`] whose per-character entropy (base 2, so 0.0-8.0 bits for
//! byte-like alphabets) reaches the configured threshold flags the content.
//! Short spans are skipped: entropy over a handful of characters is noise.

use std::collections::BTreeMap;

/// Minimum token length considered by the heuristic.
pub const MIN_TOKEN_LEN: usize = 20;

/// Minimum trimmed-line length considered by the heuristic.
pub const MIN_LINE_LEN: usize = 40;

/// Per-character Shannon entropy of a string, in bits.
pub fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    // BTreeMap keeps the summation order fixed, so the result is identical
    // across runs.
    let mut freq: BTreeMap<char, u32> = BTreeMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    let length = s.chars().count() as f64;
    let mut entropy = 0.0;
    for count in freq.values() {
        let probability = f64::from(*count) / length;
        entropy -= probability * probability.log2();
    }

    entropy
}

/// True if any sufficiently long token or line in `content` reaches the
/// entropy threshold.
pub fn has_high_entropy_span(content: &str, threshold: f64) -> bool {
    for token in content.split_whitespace() {
        if token.len() > MIN_TOKEN_LEN && shannon_entropy(token) >= threshold {
            return true;
        }
    }

    for line in content.lines() {
        let line = line.trim();
        if line.len() > MIN_LINE_LEN && shannon_entropy(line) >= threshold {
            return true;
        }
    }

    false
}
