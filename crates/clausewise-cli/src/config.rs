//! Score policy configuration from flags and environment.

use clap::Args;
use clausewise_core::ScorePolicy;

/// Each value falls back to its environment variable, then to the default policy.
#[derive(Args, Debug, Clone, Default)]
pub struct ScoreArgs {
    /// Score of a contract with no resolved clauses (0-100).
    #[arg(long, env = "CLAUSEWISE_SCORE_BASELINE", global = true)]
    pub baseline: Option<u8>,

    /// Points per resolved high-risk clause.
    #[arg(long, env = "CLAUSEWISE_HIGH_WEIGHT", global = true)]
    pub high_weight: Option<u8>,

    /// Points per resolved medium-risk clause.
    #[arg(long, env = "CLAUSEWISE_MEDIUM_WEIGHT", global = true)]
    pub medium_weight: Option<u8>,

    /// Points per resolved low-risk clause.
    #[arg(long, env = "CLAUSEWISE_LOW_WEIGHT", global = true)]
    pub low_weight: Option<u8>,
}

impl ScoreArgs {
    pub fn policy(&self) -> anyhow::Result<ScorePolicy> {
        let defaults = ScorePolicy::default();
        let policy = ScorePolicy {
            baseline: self.baseline.unwrap_or(defaults.baseline),
            high_weight: self.high_weight.unwrap_or(defaults.high_weight),
            medium_weight: self.medium_weight.unwrap_or(defaults.medium_weight),
            low_weight: self.low_weight.unwrap_or(defaults.low_weight),
        };
        policy.validate()?;
        Ok(policy)
    }
}
