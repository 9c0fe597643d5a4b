//! Per-contract serialised access.
//!
//! Several sessions may review the same contract. Mutations go through one
//! async mutex per contract so no update is lost; reads take the same lock
//! briefly and copy out what they need.

use std::sync::Arc;

use clausewise_core::{
    AppliedSuggestion, ChangeType, Clause, ClauseId, Comparison, ComparisonMode, Corpora,
    Resolution, ReviewError, RiskSummary, Suggestion,
};
use tokio::sync::{Mutex, MutexGuard};

use crate::{ClauseSnapshot, ContractStore, Delivery};

#[derive(Clone)]
pub struct SharedContract {
    inner: Arc<Mutex<ContractStore>>,
}

impl SharedContract {
    pub fn new(store: ContractStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Hold the contract for a sequence of operations.
    pub async fn lock(&self) -> MutexGuard<'_, ContractStore> {
        self.inner.lock().await
    }

    pub async fn list_clauses(&self) -> Vec<Clause> {
        self.inner.lock().await.list_clauses().to_vec()
    }

    pub async fn get_clause(&self, id: ClauseId) -> Result<Clause, ReviewError> {
        self.inner.lock().await.get_clause(id).cloned()
    }

    pub async fn summary(&self) -> RiskSummary {
        self.inner.lock().await.summary()
    }

    pub async fn snapshot(&self, id: ClauseId) -> Result<ClauseSnapshot, ReviewError> {
        self.inner.lock().await.snapshot(id)
    }

    pub async fn apply_suggestion(&self, id: ClauseId) -> Result<AppliedSuggestion, ReviewError> {
        self.inner.lock().await.apply_suggestion(id)
    }

    pub async fn resolve_change(&self, id: ClauseId, accept: bool) -> Result<Resolution, ReviewError> {
        self.inner.lock().await.resolve_change(id, accept)
    }

    pub async fn flag_change(
        &self,
        id: ClauseId,
        change_type: ChangeType,
    ) -> Result<Option<ChangeType>, ReviewError> {
        self.inner.lock().await.flag_change(id, change_type)
    }

    pub async fn edit_clause(&self, id: ClauseId, content: String) -> Result<String, ReviewError> {
        self.inner.lock().await.edit_clause(id, content)
    }

    pub async fn compare(
        &self,
        id: ClauseId,
        mode: ComparisonMode,
        corpora: &Corpora,
    ) -> Result<Comparison, ReviewError> {
        self.inner.lock().await.compare(id, mode, corpora)
    }

    pub async fn adopt_comparison(
        &self,
        id: ClauseId,
        mode: ComparisonMode,
        corpora: &Corpora,
    ) -> Result<Comparison, ReviewError> {
        self.inner.lock().await.adopt_comparison(id, mode, corpora)
    }

    pub async fn offer_suggestion(
        &self,
        snapshot: &ClauseSnapshot,
        suggestion: Option<Suggestion>,
    ) -> Delivery {
        self.inner.lock().await.offer_suggestion(snapshot, suggestion)
    }
}
