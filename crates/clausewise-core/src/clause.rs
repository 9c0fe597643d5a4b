//! Clause data model.
//!
//! A contract is an ordered sequence of clauses. Each clause carries its
//! current text, a risk level, an optional pending suggestion, and an
//! optional pending change record.
//!
//! The wire form uses the camelCase field names of the review UI
//! (`riskLevel`, `suggested`, `reasoning`, `hasChanges`, `changeType`,
//! `aiNote`). Invariants that the wire form can violate are checked on
//! deserialisation and rejected as [`ReviewError::InvalidClause`]:
//!
//! - `reasoning` requires `suggested` (not vice versa)
//! - `changeType` is set iff `hasChanges` is true

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ReviewError;

/// Stable clause identifier. Never changes across edits.
pub type ClauseId = u32;

/// Coarse severity classification. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// One level lower, floored at `Low`.
    pub fn downgrade(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ReviewError::invalid_mode("risk level", s)),
        }
    }
}

/// Kind of a pending change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "added" => Ok(Self::Added),
            "modified" => Ok(Self::Modified),
            "deleted" => Ok(Self::Deleted),
            _ => Err(ReviewError::invalid_mode("change type", s)),
        }
    }
}

/// Alternate clause text proposed by the suggestion engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub reasoning: Option<String>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reasoning: None,
        }
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

/// One numbered section of a contract with independent risk and edit state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClauseRecord", into = "ClauseRecord")]
pub struct Clause {
    pub id: ClauseId,
    /// Display label only, e.g. "4".
    pub section: String,
    pub title: String,
    pub content: String,
    pub risk_level: RiskLevel,
    /// Caller-supplied classification used as the comparison corpus key.
    pub category: Option<String>,
    pub suggestion: Option<Suggestion>,
    /// Pending change record. `Some` means the clause is in the pending state.
    pub change: Option<ChangeType>,
    pub ai_note: Option<String>,
}

impl Clause {
    pub fn new(
        id: ClauseId,
        section: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            id,
            section: section.into(),
            title: title.into(),
            content: content.into(),
            risk_level,
            category: None,
            suggestion: None,
            change: None,
            ai_note: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn with_change(mut self, change: ChangeType) -> Self {
        self.change = Some(change);
        self
    }

    pub fn with_ai_note(mut self, note: impl Into<String>) -> Self {
        self.ai_note = Some(note.into());
        self
    }

    pub fn suggested(&self) -> Option<&str> {
        self.suggestion.as_ref().map(|s| s.text.as_str())
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.suggestion
            .as_ref()
            .and_then(|s| s.reasoning.as_deref())
    }

    pub fn has_changes(&self) -> bool {
        self.change.is_some()
    }

    /// Neither a suggestion nor a change is waiting on the reviewer.
    pub fn is_resolved(&self) -> bool {
        self.suggestion.is_none() && self.change.is_none()
    }
}

// ── Wire form ──

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClauseRecord {
    id: ClauseId,
    section: String,
    title: String,
    content: String,
    risk_level: RiskLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggested: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reasoning: Option<String>,
    #[serde(default)]
    has_changes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    change_type: Option<ChangeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ai_note: Option<String>,
}

impl TryFrom<ClauseRecord> for Clause {
    type Error = ReviewError;

    fn try_from(r: ClauseRecord) -> Result<Self, Self::Error> {
        let suggestion = match (r.suggested, r.reasoning) {
            (Some(text), reasoning) => Some(Suggestion { text, reasoning }),
            (None, Some(_)) => {
                return Err(ReviewError::InvalidClause {
                    id: r.id,
                    reason: "reasoning present without suggested text",
                });
            }
            (None, None) => None,
        };

        let change = match (r.has_changes, r.change_type) {
            (true, Some(ct)) => Some(ct),
            (false, None) => None,
            (true, None) => {
                return Err(ReviewError::InvalidClause {
                    id: r.id,
                    reason: "hasChanges is set without a changeType",
                });
            }
            (false, Some(_)) => {
                return Err(ReviewError::InvalidClause {
                    id: r.id,
                    reason: "changeType is set on a clause without changes",
                });
            }
        };

        Ok(Self {
            id: r.id,
            section: r.section,
            title: r.title,
            content: r.content,
            risk_level: r.risk_level,
            category: r.category,
            suggestion,
            change,
            ai_note: r.ai_note,
        })
    }
}

impl From<Clause> for ClauseRecord {
    fn from(c: Clause) -> Self {
        let (suggested, reasoning) = match c.suggestion {
            Some(s) => (Some(s.text), s.reasoning),
            None => (None, None),
        };
        Self {
            id: c.id,
            section: c.section,
            title: c.title,
            content: c.content,
            risk_level: c.risk_level,
            category: c.category,
            suggested,
            reasoning,
            has_changes: c.change.is_some(),
            change_type: c.change,
            ai_note: c.ai_note,
        }
    }
}
