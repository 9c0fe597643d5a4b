//! In-memory clause store for one contract.
//!
//! Clauses keep insertion order (document order) and their ids through every
//! mutation. Each clause has a revision counter that every mutation touching it
//! increments; suggestion results computed against an older revision are
//! discarded instead of applied.
//!
//! The risk summary is recomputed eagerly after each successful mutation, so a
//! reader can never observe a score older than the last write.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use clausewise_core::{
    AppliedSuggestion, ChangeType, Clause, ClauseId, Comparison, ComparisonMode, Corpora,
    DowngradeOneLevel, Resolution, ReviewError, RiskAssessor, RiskSummary, ScorePolicy,
    Suggestion, change, review,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::event::{ReviewAction, ReviewEvent};

/// Serialised contract: an optional title and the clauses in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub clauses: Vec<Clause>,
}

/// Clause content pinned to the revision it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseSnapshot {
    pub id: ClauseId,
    pub revision: u64,
    pub content: String,
}

/// What happened to a suggestion result offered to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Attached as the clause's pending suggestion.
    Attached,
    /// The clause changed after the request was made.
    Stale,
    /// The clause no longer exists.
    Missing,
    /// The source produced nothing.
    Empty,
}

impl Delivery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Stale => "stale",
            Self::Missing => "missing",
            Self::Empty => "empty",
        }
    }
}

pub struct ContractStore {
    title: Option<String>,
    clauses: Vec<Clause>,
    revisions: HashMap<ClauseId, u64>,
    policy: ScorePolicy,
    assessor: Box<dyn RiskAssessor>,
    summary: RiskSummary,
    events: Vec<ReviewEvent>,
}

impl ContractStore {
    /// Build a store with the default score policy and risk assessor.
    ///
    /// Fails with `InvalidClause` if two clauses share an id.
    pub fn new(clauses: Vec<Clause>) -> Result<Self, ReviewError> {
        let mut seen = HashSet::with_capacity(clauses.len());
        for clause in &clauses {
            if !seen.insert(clause.id) {
                return Err(ReviewError::InvalidClause {
                    id: clause.id,
                    reason: "duplicate clause id",
                });
            }
        }

        let policy = ScorePolicy::default();
        let summary = policy.aggregate(&clauses);
        let revisions = clauses.iter().map(|c| (c.id, 0)).collect();
        debug!(clauses = clauses.len(), score = summary.score, "opened contract store");

        Ok(Self {
            title: None,
            clauses,
            revisions,
            policy,
            assessor: Box::new(DowngradeOneLevel),
            summary,
            events: Vec::new(),
        })
    }

    pub fn from_document(doc: ContractDocument) -> Result<Self, ReviewError> {
        let mut store = Self::new(doc.clauses)?;
        store.title = doc.title;
        Ok(store)
    }

    pub fn to_document(&self) -> ContractDocument {
        ContractDocument {
            title: self.title.clone(),
            clauses: self.clauses.clone(),
        }
    }

    /// Replace the score policy. The summary is recomputed immediately.
    pub fn with_policy(mut self, policy: ScorePolicy) -> Result<Self, ReviewError> {
        policy.validate()?;
        self.policy = policy;
        self.recompute();
        Ok(self)
    }

    pub fn with_assessor(mut self, assessor: Box<dyn RiskAssessor>) -> Self {
        self.assessor = assessor;
        self
    }

    // ── Reads ──

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Clauses in document order.
    pub fn list_clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn get_clause(&self, id: ClauseId) -> Result<&Clause, ReviewError> {
        self.clauses
            .iter()
            .find(|c| c.id == id)
            .ok_or(ReviewError::NotFound(id))
    }

    pub fn summary(&self) -> RiskSummary {
        self.summary
    }

    pub fn score(&self) -> u8 {
        self.summary.score
    }

    pub fn policy(&self) -> &ScorePolicy {
        &self.policy
    }

    pub fn revision(&self, id: ClauseId) -> Option<u64> {
        self.revisions.get(&id).copied()
    }

    pub fn events(&self) -> &[ReviewEvent] {
        &self.events
    }

    /// Resolve a clause against the comparison corpora. Read-only.
    pub fn compare(
        &self,
        id: ClauseId,
        mode: ComparisonMode,
        corpora: &Corpora,
    ) -> Result<Comparison, ReviewError> {
        corpora.resolve(self.get_clause(id)?, mode)
    }

    pub fn snapshot(&self, id: ClauseId) -> Result<ClauseSnapshot, ReviewError> {
        let clause = self.get_clause(id)?;
        Ok(ClauseSnapshot {
            id,
            revision: self.revision(id).unwrap_or(0),
            content: clause.content.clone(),
        })
    }

    // ── Mutations ──

    /// Commit a clause's pending suggestion into its content.
    pub fn apply_suggestion(&mut self, id: ClauseId) -> Result<AppliedSuggestion, ReviewError> {
        let idx = self.index_of(id)?;
        let applied = review::apply_suggestion(&mut self.clauses[idx], self.assessor.as_ref())?;
        self.commit(
            id,
            ReviewAction::SuggestionApplied {
                from: applied.previous_risk,
                to: applied.risk_level,
            },
        );
        Ok(applied)
    }

    /// Accept or reject a clause's pending change.
    pub fn resolve_change(&mut self, id: ClauseId, accept: bool) -> Result<Resolution, ReviewError> {
        let idx = self.index_of(id)?;
        let resolution =
            review::resolve_change(&mut self.clauses[idx], accept, self.assessor.as_ref())?;
        let action = match &resolution {
            Resolution::Applied(applied) => ReviewAction::SuggestionApplied {
                from: applied.previous_risk,
                to: applied.risk_level,
            },
            Resolution::Accepted(change_type) => ReviewAction::ChangeAccepted {
                change_type: *change_type,
            },
            Resolution::Rejected(change_type) => ReviewAction::ChangeRejected {
                change_type: *change_type,
            },
        };
        self.commit(id, action);
        Ok(resolution)
    }

    /// Record a pending change. Re-flagging replaces the change type and
    /// returns the one it replaced.
    pub fn flag_change(
        &mut self,
        id: ClauseId,
        change_type: ChangeType,
    ) -> Result<Option<ChangeType>, ReviewError> {
        let idx = self.index_of(id)?;
        let previous = change::flag_change(&mut self.clauses[idx], change_type);
        self.commit(id, ReviewAction::ChangeFlagged { change_type });
        Ok(previous)
    }

    /// Replace a clause's content by hand.
    ///
    /// Drops any pending suggestion, since it was produced for the old text.
    /// Risk level and change record are left as they are. Returns the previous
    /// content.
    pub fn edit_clause(
        &mut self,
        id: ClauseId,
        content: impl Into<String>,
    ) -> Result<String, ReviewError> {
        let idx = self.index_of(id)?;
        let clause = &mut self.clauses[idx];
        let previous = std::mem::replace(&mut clause.content, content.into());
        clause.suggestion = None;
        self.commit(id, ReviewAction::Edited);
        Ok(previous)
    }

    /// Replace a clause's content with its firm template, prior version, or
    /// industry-standard text.
    pub fn adopt_comparison(
        &mut self,
        id: ClauseId,
        mode: ComparisonMode,
        corpora: &Corpora,
    ) -> Result<Comparison, ReviewError> {
        let comparison = self.compare(id, mode, corpora)?;
        self.edit_clause(id, comparison.comparison_text.clone())?;
        Ok(comparison)
    }

    /// Offer a suggestion computed from `snapshot`.
    ///
    /// Attached only if the clause still exists at the snapshot's revision.
    pub fn offer_suggestion(
        &mut self,
        snapshot: &ClauseSnapshot,
        suggestion: Option<Suggestion>,
    ) -> Delivery {
        let Ok(idx) = self.index_of(snapshot.id) else {
            warn!(clause = snapshot.id, "discarding suggestion for missing clause");
            return Delivery::Missing;
        };
        let current = self.revision(snapshot.id).unwrap_or(0);
        if current != snapshot.revision {
            warn!(
                clause = snapshot.id,
                requested_at = snapshot.revision,
                current,
                "discarding stale suggestion"
            );
            return Delivery::Stale;
        }
        let Some(suggestion) = suggestion else {
            debug!(clause = snapshot.id, "suggestion source returned nothing");
            return Delivery::Empty;
        };

        self.clauses[idx].suggestion = Some(suggestion);
        self.commit(snapshot.id, ReviewAction::SuggestionAttached);
        Delivery::Attached
    }

    // ── Internals ──

    fn index_of(&self, id: ClauseId) -> Result<usize, ReviewError> {
        self.clauses
            .iter()
            .position(|c| c.id == id)
            .ok_or(ReviewError::NotFound(id))
    }

    fn recompute(&mut self) {
        self.summary = self.policy.aggregate(&self.clauses);
        debug!(score = self.summary.score, "recomputed risk summary");
    }

    /// Bookkeeping after a successful mutation of clause `id`.
    fn commit(&mut self, id: ClauseId, action: ReviewAction) {
        *self.revisions.entry(id).or_insert(0) += 1;
        self.recompute();
        info!(
            clause = id,
            action = action.as_str(),
            score = self.summary.score,
            "review action committed"
        );
        self.events.push(ReviewEvent {
            clause_id: id,
            action,
            score: self.summary.score,
            at: Utc::now(),
        });
    }
}
