//! Document-level risk aggregation.
//!
//! Partitions clauses by risk level and derives a 0–100 completion score.
//! A clause contributes its level's weight to the score once it is
//! resolved (no pending suggestion, no pending change). The score is a
//! pure function of the current clause set: same clauses, same score.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Clause, Corpora, ReviewError, RiskLevel};

/// Aggregated counts and score for one contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub score: u8,
}

impl RiskSummary {
    pub fn total(&self) -> usize {
        self.high_count + self.medium_count + self.low_count
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::High => self.high_count,
            RiskLevel::Medium => self.medium_count,
            RiskLevel::Low => self.low_count,
        }
    }
}

/// Scoring constants.
///
/// `score = clamp(baseline + Σ weight(level) over resolved clauses, 0, 100)`.
/// Weights are unsigned, so resolving a clause can never lower the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScorePolicy {
    pub baseline: u8,
    pub high_weight: u8,
    pub medium_weight: u8,
    pub low_weight: u8,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            baseline: 50,
            high_weight: 3,
            medium_weight: 2,
            low_weight: 1,
        }
    }
}

impl ScorePolicy {
    pub fn validate(&self) -> Result<(), ReviewError> {
        if self.baseline > 100 {
            return Err(ReviewError::InvalidPolicy(format!(
                "baseline {} exceeds 100",
                self.baseline
            )));
        }
        Ok(())
    }

    pub fn weight(&self, level: RiskLevel) -> u8 {
        match level {
            RiskLevel::High => self.high_weight,
            RiskLevel::Medium => self.medium_weight,
            RiskLevel::Low => self.low_weight,
        }
    }

    pub fn score(&self, clauses: &[Clause]) -> u8 {
        let earned: u32 = clauses
            .iter()
            .filter(|c| c.is_resolved())
            .map(|c| u32::from(self.weight(c.risk_level)))
            .sum();
        (u32::from(self.baseline) + earned).min(100) as u8
    }

    pub fn aggregate(&self, clauses: &[Clause]) -> RiskSummary {
        let mut summary = RiskSummary {
            high_count: 0,
            medium_count: 0,
            low_count: 0,
            score: self.score(clauses),
        };
        for clause in clauses {
            match clause.risk_level {
                RiskLevel::High => summary.high_count += 1,
                RiskLevel::Medium => summary.medium_count += 1,
                RiskLevel::Low => summary.low_count += 1,
            }
        }
        summary
    }
}

/// Aggregate with the default [`ScorePolicy`].
pub fn aggregate(clauses: &[Clause]) -> RiskSummary {
    ScorePolicy::default().aggregate(clauses)
}

/// Highest risk level per category, for the summary panel.
///
/// Clauses without a category are skipped.
pub fn category_breakdown(clauses: &[Clause]) -> BTreeMap<String, RiskLevel> {
    let mut out: BTreeMap<String, RiskLevel> = BTreeMap::new();
    for clause in clauses {
        let Some(category) = &clause.category else {
            continue;
        };
        out.entry(category.clone())
            .and_modify(|level| *level = (*level).max(clause.risk_level))
            .or_insert(clause.risk_level);
    }
    out
}

/// Template categories that no clause in the contract covers.
pub fn missing_categories(clauses: &[Clause], corpora: &Corpora) -> BTreeSet<String> {
    let present: BTreeSet<&str> = clauses.iter().filter_map(|c| c.category.as_deref()).collect();
    corpora
        .templates
        .keys()
        .filter(|category| !present.contains(category.as_str()))
        .cloned()
        .collect()
}

/// Recomputes a clause's risk after its content was replaced.
pub trait RiskAssessor: Send + Sync {
    fn reassess(&self, clause: &Clause, previous: RiskLevel) -> RiskLevel;
}

/// Lowers risk by one level per accepted suggestion, floored at `Low`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DowngradeOneLevel;

impl RiskAssessor for DowngradeOneLevel {
    fn reassess(&self, _clause: &Clause, previous: RiskLevel) -> RiskLevel {
        previous.downgrade()
    }
}
