//! Timestamped log of reviewer actions.

use chrono::{DateTime, Utc};
use clausewise_core::{ChangeType, ClauseId, RiskLevel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ReviewAction {
    SuggestionApplied { from: RiskLevel, to: RiskLevel },
    SuggestionAttached,
    ChangeFlagged { change_type: ChangeType },
    ChangeAccepted { change_type: ChangeType },
    ChangeRejected { change_type: ChangeType },
    Edited,
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuggestionApplied { .. } => "suggestion-applied",
            Self::SuggestionAttached => "suggestion-attached",
            Self::ChangeFlagged { .. } => "change-flagged",
            Self::ChangeAccepted { .. } => "change-accepted",
            Self::ChangeRejected { .. } => "change-rejected",
            Self::Edited => "edited",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEvent {
    pub clause_id: ClauseId,
    #[serde(flatten)]
    pub action: ReviewAction,
    /// Score after the action.
    pub score: u8,
    pub at: DateTime<Utc>,
}
