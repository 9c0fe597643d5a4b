//! Contract review core: clause model, risk aggregation, change tracking,
//! comparison against reference corpora, and presentation toggles.

pub mod change;
pub mod clause;
pub mod comparison;
pub mod error;
pub mod review;
pub mod risk;
pub mod view;

pub use change::{ChangeState, clear_change, flag_change};
pub use clause::{ChangeType, Clause, ClauseId, RiskLevel, Suggestion};
pub use comparison::{
    Comparison, ComparisonMode, Corpora, NoHistory, VersionHistory, deviation_score, resolve,
    resolve_with_history,
};
pub use error::ReviewError;
pub use review::{AppliedSuggestion, Resolution, apply_suggestion, resolve_change};
pub use risk::{
    DowngradeOneLevel, RiskAssessor, RiskSummary, ScorePolicy, aggregate, category_breakdown,
    missing_categories,
};
pub use view::{DocumentMode, ViewMode, ViewState};
