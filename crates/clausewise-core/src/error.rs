use thiserror::Error;

use crate::clause::ClauseId;

/// Recoverable review failures. A failed operation never leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("clause {0} not found")]
    NotFound(ClauseId),

    #[error("no suggestion available for clause {0}")]
    NoSuggestionAvailable(ClauseId),

    #[error("clause {0} has no pending change")]
    NoChangePending(ClauseId),

    #[error("no firm template for clause {clause} (category: {})", .category.as_deref().unwrap_or("none"))]
    TemplateNotFound {
        clause: ClauseId,
        category: Option<String>,
    },

    #[error("no industry standard for clause {clause} (category: {})", .category.as_deref().unwrap_or("none"))]
    IndustryStandardNotFound {
        clause: ClauseId,
        category: Option<String>,
    },

    #[error("invalid {kind}: {value:?}")]
    InvalidMode { kind: &'static str, value: String },

    #[error("invalid clause {id}: {reason}")]
    InvalidClause { id: ClauseId, reason: &'static str },

    #[error("invalid score policy: {0}")]
    InvalidPolicy(String),
}

impl ReviewError {
    pub(crate) fn invalid_mode(kind: &'static str, value: &str) -> Self {
        Self::InvalidMode {
            kind,
            value: value.to_string(),
        }
    }
}
