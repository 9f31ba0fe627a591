//! Document lifecycle status state machine.
//!
//! `rendered -> sent -> signed`, each state entered exactly once, strictly
//! forward. The database stores the status as text; repositories enforce
//! transitions with guarded UPDATEs, and this module is the single place
//! that defines which transitions are legal.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Lifecycle status of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Rendered,
    Sent,
    Signed,
}

impl DocumentStatus {
    /// The column value stored in `documents.status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Rendered => "rendered",
            DocumentStatus::Sent => "sent",
            DocumentStatus::Signed => "signed",
        }
    }

    /// Parse a stored column value.
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "rendered" => Ok(DocumentStatus::Rendered),
            "sent" => Ok(DocumentStatus::Sent),
            "signed" => Ok(DocumentStatus::Signed),
            other => Err(CoreError::Internal(format!(
                "unknown document status: {other}"
            ))),
        }
    }

    /// Whether a transition to `next` is legal. Only the two forward edges
    /// exist; there is no path back.
    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (DocumentStatus::Rendered, DocumentStatus::Sent)
                | (DocumentStatus::Sent, DocumentStatus::Signed)
        )
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a transition, producing the caller-facing Conflict error on
/// violation.
pub fn check_transition(current: DocumentStatus, next: DocumentStatus) -> CoreResult<()> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Document cannot move from \"{current}\" to \"{next}\""
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentStatus::*;
    use super::*;

    #[test]
    fn forward_edges_are_legal() {
        assert!(check_transition(Rendered, Sent).is_ok());
        assert!(check_transition(Sent, Signed).is_ok());
    }

    #[test]
    fn no_regression_from_signed() {
        assert!(check_transition(Signed, Sent).is_err());
        assert!(check_transition(Signed, Rendered).is_err());
    }

    #[test]
    fn no_skipping_states() {
        assert!(check_transition(Rendered, Signed).is_err());
    }

    #[test]
    fn no_self_transitions() {
        assert!(check_transition(Rendered, Rendered).is_err());
        assert!(check_transition(Sent, Sent).is_err());
        assert!(check_transition(Signed, Signed).is_err());
    }

    #[test]
    fn parse_and_display_round_trip() {
        for status in [Rendered, Sent, Signed] {
            assert_eq!(DocumentStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(DocumentStatus::parse("draft").is_err());
    }
}
