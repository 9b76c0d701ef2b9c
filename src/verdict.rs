//! Verdicts returned by content analysis
//!
//! A [`Verdict`] is the per-call outcome handed back to the tool that fetched
//! the content. It is plain data: blocking and warning behaviour is decided
//! by the caller via [`Verdict::ensure_allowed`].

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::rules::Action;

/// Where the analysed content came from. Created per call and discarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    pub url: String,
    pub domain: String,
    pub content_type: String,
    /// Name of the tool that retrieved the content.
    pub tool: String,
}

/// The outcome of a content analysis.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    /// False only when `action` is block.
    pub safe: bool,
    pub action: Action,
    pub message: String,
}

impl Verdict {
    /// The verdict for clean content and for every disabled-engine path.
    pub fn allow() -> Self {
        Self {
            safe: true,
            action: Action::Allow,
            message: String::new(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.action == Action::Block
    }

    pub fn is_warning(&self) -> bool {
        self.action == Action::Warn
    }

    /// Convert into the caller-facing contract: blocked content becomes a
    /// hard error, warnings become an annotation string, clean content
    /// passes through.
    pub fn ensure_allowed(self) -> Result<Option<String>, PolicyError> {
        match self.action {
            Action::Block => Err(PolicyError::ContentBlocked {
                message: self.message,
            }),
            Action::Warn => Ok(Some(self.message)),
            Action::Allow => Ok(None),
        }
    }
}

/// Standard one-line annotation for a warn verdict, for tools that return
/// the content anyway.
pub fn format_warning_notice(verdict: &Verdict) -> Option<String> {
    if verdict.is_warning() {
        Some(format!("security warning: {}", verdict.message))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_is_safe_and_empty() {
        let verdict = Verdict::allow();
        assert!(verdict.safe);
        assert_eq!(verdict.action, Action::Allow);
        assert!(verdict.message.is_empty());
        assert_eq!(verdict.ensure_allowed().unwrap(), None);
    }

    #[test]
    fn test_warn_passes_with_annotation() {
        let verdict = Verdict {
            safe: true,
            action: Action::Warn,
            message: "credential material".to_string(),
        };
        assert!(format_warning_notice(&verdict)
            .unwrap()
            .contains("credential material"));
        assert_eq!(
            verdict.ensure_allowed().unwrap(),
            Some("credential material".to_string())
        );
    }

    #[test]
    fn test_block_becomes_hard_error() {
        let verdict = Verdict {
            safe: false,
            action: Action::Block,
            message: "malware marker".to_string(),
        };
        assert!(format_warning_notice(&verdict).is_none());
        let err = verdict.ensure_allowed().unwrap_err();
        assert!(err.to_string().contains("malware marker"));
    }

    #[test]
    fn test_verdict_serializes_lowercase_action() {
        let json = serde_json::to_string(&Verdict::allow()).unwrap();
        assert!(json.contains("\"action\":\"allow\""));
    }
}
