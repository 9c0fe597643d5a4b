//! Presentation toggles.
//!
//! [`ViewState`] only gates what the presentation shows. It never owns or
//! mutates clause data: a pending change stays recorded on the clause while
//! `track_changes` is off, it just isn't surfaced.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ChangeType, Clause, ClauseId, ComparisonMode, ReviewError, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Tree,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::List => "list",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "tree" => Ok(Self::Tree),
            "list" => Ok(Self::List),
            _ => Err(ReviewError::invalid_mode("view mode", s)),
        }
    }
}

/// Document toolbar mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentMode {
    #[default]
    View,
    Suggest,
    Compare,
}

impl DocumentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Suggest => "suggest",
            Self::Compare => "compare",
        }
    }
}

impl fmt::Display for DocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentMode {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "view" => Ok(Self::View),
            "suggest" => Ok(Self::Suggest),
            "compare" => Ok(Self::Compare),
            _ => Err(ReviewError::invalid_mode("document mode", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewState {
    show_highlights: bool,
    track_changes: bool,
    comparison_mode: ComparisonMode,
    view_mode: ViewMode,
    document_mode: DocumentMode,
    selected_clause: Option<ClauseId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            show_highlights: true,
            track_changes: true,
            comparison_mode: ComparisonMode::default(),
            view_mode: ViewMode::default(),
            document_mode: DocumentMode::default(),
            selected_clause: None,
        }
    }
}

impl ViewState {
    pub fn show_highlights(&self) -> bool {
        self.show_highlights
    }

    pub fn track_changes(&self) -> bool {
        self.track_changes
    }

    pub fn comparison_mode(&self) -> ComparisonMode {
        self.comparison_mode
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn document_mode(&self) -> DocumentMode {
        self.document_mode
    }

    pub fn selected_clause(&self) -> Option<ClauseId> {
        self.selected_clause
    }

    pub fn set_show_highlights(&mut self, on: bool) {
        self.show_highlights = on;
    }

    pub fn set_track_changes(&mut self, on: bool) {
        self.track_changes = on;
    }

    pub fn set_comparison_mode(&mut self, mode: ComparisonMode) {
        self.comparison_mode = mode;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub fn set_document_mode(&mut self, mode: DocumentMode) {
        self.document_mode = mode;
    }

    pub fn select(&mut self, clause: Option<ClauseId>) {
        self.selected_clause = clause;
    }

    /// Parse and set the comparison mode. `InvalidMode` leaves the state unchanged.
    pub fn set_comparison_mode_str(&mut self, mode: &str) -> Result<(), ReviewError> {
        self.comparison_mode = mode.parse()?;
        Ok(())
    }

    pub fn set_view_mode_str(&mut self, mode: &str) -> Result<(), ReviewError> {
        self.view_mode = mode.parse()?;
        Ok(())
    }

    pub fn set_document_mode_str(&mut self, mode: &str) -> Result<(), ReviewError> {
        self.document_mode = mode.parse()?;
        Ok(())
    }

    // ── Display gates ──

    /// Risk level to highlight, or `None` while highlights are off.
    pub fn risk_highlight(&self, clause: &Clause) -> Option<RiskLevel> {
        self.show_highlights.then_some(clause.risk_level)
    }

    /// Pending change to surface, or `None` while track changes is off.
    pub fn visible_change(&self, clause: &Clause) -> Option<ChangeType> {
        if self.track_changes { clause.change } else { None }
    }

    /// Suggestions are offered in suggest mode or when the clause is selected.
    pub fn offers_suggestion(&self, clause: &Clause) -> bool {
        clause.suggestion.is_some()
            && (self.document_mode == DocumentMode::Suggest
                || self.selected_clause == Some(clause.id))
    }
}
