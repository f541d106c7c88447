//! Support dialogue module holding the per-chat conversation state.

use serde::{Deserialize, Serialize};

/// Represents the conversation state of one chat
///
/// Intake runs `Idle → WaitingForName → WaitingForPhone → Idle`; lookup runs
/// `Idle → WaitingForSearch → Idle`. Data collected along the way lives in the
/// variant that needs it, so a half-finished flow cannot leak fields into
/// another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportDialogueState {
    #[default]
    Idle,
    WaitingForName {
        issue_type: String,
    },
    WaitingForPhone {
        issue_type: String,
        full_name: String,
    },
    WaitingForSearch {
        category: String,
    },
}

impl SupportDialogueState {
    /// Whether an intake flow is in progress
    pub fn is_intake(&self) -> bool {
        matches!(
            self,
            SupportDialogueState::WaitingForName { .. } | SupportDialogueState::WaitingForPhone { .. }
        )
    }

    /// Whether a lookup flow is in progress
    pub fn is_lookup(&self) -> bool {
        matches!(self, SupportDialogueState::WaitingForSearch { .. })
    }
}

/// Accept a customer name for a report
///
/// The text is kept verbatim; only input without any visible character is
/// refused.
pub fn accept_full_name(name: &str) -> Result<String, &'static str> {
    if name.trim().is_empty() {
        return Err("empty");
    }

    Ok(name.to_string())
}
