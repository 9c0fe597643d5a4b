//! Reviewer actions on a single clause: accept a suggestion, accept or reject a change.
//!
//! Every action validates before it writes, so an `Err` leaves the clause exactly
//! as it was.

use crate::change::clear_change;
use crate::{ChangeType, Clause, ReviewError, RiskAssessor, RiskLevel};

/// What [`apply_suggestion`] replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedSuggestion {
    pub previous_content: String,
    pub previous_risk: RiskLevel,
    pub risk_level: RiskLevel,
    /// Change record cleared as part of the commit, if one was pending.
    pub cleared_change: Option<ChangeType>,
}

/// Outcome of [`resolve_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Accepted with a suggestion present: the suggestion was committed.
    Applied(AppliedSuggestion),
    /// Accepted without a suggestion: the flag was cleared, content untouched.
    Accepted(ChangeType),
    /// Rejected: the flag was cleared, content and risk untouched.
    Rejected(ChangeType),
}

impl Resolution {
    pub fn change_type(&self) -> Option<ChangeType> {
        match self {
            Self::Applied(applied) => applied.cleared_change,
            Self::Accepted(ct) | Self::Rejected(ct) => Some(*ct),
        }
    }
}

/// Commit `suggested` into `content`, clear suggestion and change record,
/// and let `assessor` recompute the risk level.
pub fn apply_suggestion(
    clause: &mut Clause,
    assessor: &dyn RiskAssessor,
) -> Result<AppliedSuggestion, ReviewError> {
    let suggestion = clause
        .suggestion
        .take()
        .ok_or(ReviewError::NoSuggestionAvailable(clause.id))?;

    let previous_content = std::mem::replace(&mut clause.content, suggestion.text);
    let previous_risk = clause.risk_level;
    clause.risk_level = assessor.reassess(clause, previous_risk);
    let cleared_change = clause.change.take();

    Ok(AppliedSuggestion {
        previous_content,
        previous_risk,
        risk_level: clause.risk_level,
        cleared_change,
    })
}

/// Resolve a pending change. Always leaves the clause clean on success.
pub fn resolve_change(
    clause: &mut Clause,
    accept: bool,
    assessor: &dyn RiskAssessor,
) -> Result<Resolution, ReviewError> {
    if !clause.has_changes() {
        return Err(ReviewError::NoChangePending(clause.id));
    }

    if !accept {
        return clear_change(clause).map(Resolution::Rejected);
    }

    if clause.suggestion.is_some() {
        apply_suggestion(clause, assessor).map(Resolution::Applied)
    } else {
        clear_change(clause).map(Resolution::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DowngradeOneLevel, Suggestion};

    fn ip_clause() -> Clause {
        Clause::new(
            4,
            "4",
            "INTELLECTUAL PROPERTY",
            "All work product shall remain the exclusive property of Contractor.",
            RiskLevel::High,
        )
        .with_suggestion(Suggestion::new("X").with_reasoning("Y"))
    }

    #[test]
    fn accepting_suggestion_commits_text_and_lowers_risk() {
        let mut clause = ip_clause();
        let applied = apply_suggestion(&mut clause, &DowngradeOneLevel).unwrap();

        assert_eq!(clause.content, "X");
        assert!(clause.suggested().is_none());
        assert!(clause.reasoning().is_none());
        assert!(clause.risk_level <= RiskLevel::Medium);
        assert_eq!(applied.previous_risk, RiskLevel::High);
        assert_eq!(applied.risk_level, RiskLevel::Medium);
        assert_eq!(
            applied.previous_content,
            "All work product shall remain the exclusive property of Contractor."
        );
    }

    #[test]
    fn accepting_suggestion_clears_pending_change() {
        let mut clause = ip_clause().with_change(ChangeType::Modified);
        let applied = apply_suggestion(&mut clause, &DowngradeOneLevel).unwrap();
        assert_eq!(applied.cleared_change, Some(ChangeType::Modified));
        assert!(!clause.has_changes());
    }

    #[test]
    fn accepting_missing_suggestion_fails_without_mutation() {
        let mut clause = Clause::new(1, "1", "PARTIES", "ABC and XYZ.", RiskLevel::Low);
        let before = clause.clone();
        assert_eq!(
            apply_suggestion(&mut clause, &DowngradeOneLevel),
            Err(ReviewError::NoSuggestionAvailable(1))
        );
        assert_eq!(clause, before);
    }

    #[test]
    fn accepting_cosmetic_change_keeps_content() {
        let mut clause = Clause::new(3, "3", "PAYMENT TERMS", "Net 45.", RiskLevel::Medium)
            .with_change(ChangeType::Modified);
        let resolution = resolve_change(&mut clause, true, &DowngradeOneLevel).unwrap();

        assert_eq!(resolution, Resolution::Accepted(ChangeType::Modified));
        assert!(!clause.has_changes());
        assert!(clause.change.is_none());
        assert_eq!(clause.content, "Net 45.");
        assert_eq!(clause.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn accepting_change_with_suggestion_applies_it() {
        let mut clause = ip_clause().with_change(ChangeType::Added);
        let resolution = resolve_change(&mut clause, true, &DowngradeOneLevel).unwrap();

        assert!(matches!(resolution, Resolution::Applied(_)));
        assert_eq!(resolution.change_type(), Some(ChangeType::Added));
        assert_eq!(clause.content, "X");
        assert!(clause.suggestion.is_none());
        assert!(!clause.has_changes());
    }

    #[test]
    fn rejecting_change_keeps_content_risk_and_suggestion() {
        let mut clause = ip_clause().with_change(ChangeType::Deleted);
        let before = clause.clone();
        let resolution = resolve_change(&mut clause, false, &DowngradeOneLevel).unwrap();

        assert_eq!(resolution, Resolution::Rejected(ChangeType::Deleted));
        assert!(!clause.has_changes());
        assert_eq!(clause.content, before.content);
        assert_eq!(clause.risk_level, before.risk_level);
        assert_eq!(clause.suggestion, before.suggestion);
    }

    #[test]
    fn resolving_clean_clause_fails_either_way() {
        for accept in [true, false] {
            let mut clause = ip_clause();
            let before = clause.clone();
            assert_eq!(
                resolve_change(&mut clause, accept, &DowngradeOneLevel),
                Err(ReviewError::NoChangePending(4))
            );
            assert_eq!(clause, before);
        }
    }
}
