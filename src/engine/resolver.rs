//! Verdict resolution
//!
//! Merges all signals from one scan into a single verdict. Severity is fixed:
//! block overrides warn overrides allow. Contributing rule names are sorted
//! before the message is assembled, so identical inputs always produce the
//! identical message.

use crate::engine::content::Classification;
use crate::rules::{Action, Settings};
use crate::verdict::Verdict;

/// Name and description attached to the entropy signal when it fires.
const ENTROPY_SIGNAL_NAME: &str = "high_entropy";
const ENTROPY_SIGNAL_DESCRIPTION: &str =
    "high-entropy content, possible obfuscated or encoded payload";

pub fn resolve(classification: &Classification<'_>, settings: &Settings) -> Verdict {
    let mut signals: Vec<(&str, &str, Action)> = classification
        .matches
        .iter()
        .map(|m| (m.name, m.description, m.action))
        .collect();

    if classification.high_entropy {
        signals.push((
            ENTROPY_SIGNAL_NAME,
            ENTROPY_SIGNAL_DESCRIPTION,
            settings.entropy_action,
        ));
    }

    let Some(action) = signals.iter().map(|s| s.2).max() else {
        return Verdict::allow();
    };

    let mut contributors: Vec<(&str, &str)> = signals
        .iter()
        .filter(|s| s.2 == action)
        .map(|s| (s.0, s.1))
        .collect();
    contributors.sort_unstable_by_key(|c| c.0);

    let names: Vec<&str> = contributors.iter().map(|c| c.0).collect();
    let descriptions: Vec<&str> = contributors.iter().map(|c| c.1).collect();

    let verb = match action {
        Action::Block => "blocked",
        Action::Warn => "flagged",
        Action::Allow => "allowed",
    };
    let message = format!(
        "content {} by [{}]: {}",
        verb,
        names.join(", "),
        descriptions.join("; ")
    );

    Verdict {
        safe: action != Action::Block,
        action,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::content::RuleMatch;

    fn settings() -> Settings {
        Settings {
            enabled: true,
            max_content_size: 1_048_576,
            max_entropy_size: 65_536,
            case_sensitive: false,
            enable_notifications: false,
            entropy_threshold: 4.8,
            entropy_action: Action::Warn,
        }
    }

    fn matched(name: &'static str, description: &'static str, action: Action) -> RuleMatch<'static> {
        RuleMatch {
            name,
            description,
            action,
        }
    }

    #[test]
    fn test_no_signals_is_allow() {
        let verdict = resolve(&Classification::default(), &settings());
        assert!(verdict.safe);
        assert_eq!(verdict.action, Action::Allow);
    }

    #[test]
    fn test_block_overrides_warn() {
        let classification = Classification {
            matches: vec![
                matched("credentials", "credential material", Action::Warn),
                matched("malware", "malware marker", Action::Block),
            ],
            high_entropy: false,
        };
        let verdict = resolve(&classification, &settings());
        assert!(!verdict.safe);
        assert_eq!(verdict.action, Action::Block);
        // Only the winning severity contributes to the message.
        assert!(verdict.message.contains("malware"));
        assert!(!verdict.message.contains("credentials"));
    }

    #[test]
    fn test_tied_contributors_sorted_by_name() {
        let classification = Classification {
            matches: vec![
                matched("zeta", "last description", Action::Warn),
                matched("alpha", "first description", Action::Warn),
            ],
            high_entropy: false,
        };
        let verdict = resolve(&classification, &settings());
        assert_eq!(
            verdict.message,
            "content flagged by [alpha, zeta]: first description; last description"
        );
    }

    #[test]
    fn test_resolution_is_order_independent() {
        let forward = Classification {
            matches: vec![
                matched("alpha", "first", Action::Warn),
                matched("zeta", "last", Action::Warn),
            ],
            high_entropy: false,
        };
        let reversed = Classification {
            matches: vec![
                matched("zeta", "last", Action::Warn),
                matched("alpha", "first", Action::Warn),
            ],
            high_entropy: false,
        };
        assert_eq!(
            resolve(&forward, &settings()).message,
            resolve(&reversed, &settings()).message
        );
    }

    #[test]
    fn test_entropy_defaults_to_warn() {
        let classification = Classification {
            matches: Vec::new(),
            high_entropy: true,
        };
        let verdict = resolve(&classification, &settings());
        assert!(verdict.safe);
        assert_eq!(verdict.action, Action::Warn);
        assert!(verdict.message.contains("high_entropy"));
    }

    #[test]
    fn test_entropy_escalated_to_block() {
        let mut escalated = settings();
        escalated.entropy_action = Action::Block;

        let classification = Classification {
            matches: Vec::new(),
            high_entropy: true,
        };
        let verdict = resolve(&classification, &escalated);
        assert!(!verdict.safe);
        assert_eq!(verdict.action, Action::Block);
    }

    #[test]
    fn test_allow_rule_match_stays_safe() {
        let classification = Classification {
            matches: vec![matched("known_good", "known good marker", Action::Allow)],
            high_entropy: false,
        };
        let verdict = resolve(&classification, &settings());
        assert!(verdict.safe);
        assert_eq!(verdict.action, Action::Allow);
        assert!(verdict.message.contains("known_good"));
    }
}
