//! Asynchronous suggestion requests.
//!
//! The broker snapshots a clause (id, revision, content), releases the
//! contract lock, and asks the source for a revision on a spawned task. The
//! result is offered back to the store, which attaches it only if the clause
//! is still at the snapshotted revision. A result that arrives after the
//! reviewer accepted, rejected, or edited the clause is discarded.

use std::sync::Arc;

use async_trait::async_trait;
use clausewise_core::{ClauseId, ReviewError, Suggestion};
use clausewise_store::{Delivery, SharedContract};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SuggestionError {
    #[error("suggestion source failed: {0}")]
    Source(String),
    #[error("suggestion task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Review(#[from] ReviewError),
}

/// What the suggestion source is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub clause_id: ClauseId,
    pub content: String,
}

/// Opaque producer of suggested clause revisions.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// `Ok(None)` means the source has nothing to suggest for this clause.
    async fn suggest(&self, request: &SuggestionRequest)
    -> Result<Option<Suggestion>, SuggestionError>;
}

pub struct SuggestionBroker {
    source: Arc<dyn SuggestionSource>,
    contract: SharedContract,
}

impl SuggestionBroker {
    pub fn new(source: Arc<dyn SuggestionSource>, contract: SharedContract) -> Self {
        Self { source, contract }
    }

    /// Submit a request for clause `id`.
    ///
    /// Fails with `NotFound` up front if the clause does not exist. The
    /// returned handle resolves to the delivery outcome.
    pub async fn submit(
        &self,
        id: ClauseId,
    ) -> Result<JoinHandle<Result<Delivery, SuggestionError>>, ReviewError> {
        let snapshot = self.contract.snapshot(id).await?;
        let source = Arc::clone(&self.source);
        let contract = self.contract.clone();
        debug!(clause = id, revision = snapshot.revision, "submitting suggestion request");

        Ok(tokio::spawn(async move {
            let request = SuggestionRequest {
                clause_id: snapshot.id,
                content: snapshot.content.clone(),
            };
            let suggestion = source.suggest(&request).await?;
            let delivery = contract.offer_suggestion(&snapshot, suggestion).await;
            info!(clause = snapshot.id, ?delivery, "suggestion delivered");
            Ok(delivery)
        }))
    }

    /// Submit and wait for the outcome.
    pub async fn request(&self, id: ClauseId) -> Result<Delivery, SuggestionError> {
        let handle = self.submit(id).await?;
        handle.await?
    }

    /// Request suggestions for several clauses concurrently. Outcomes are
    /// returned in the order of `ids`.
    pub async fn request_all(&self, ids: &[ClauseId]) -> Vec<Result<Delivery, SuggestionError>> {
        futures::future::join_all(ids.iter().map(|&id| self.request(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausewise_core::{ChangeType, Clause, RiskLevel};
    use clausewise_store::ContractStore;
    use tokio::sync::Notify;

    /// Answers every request with a fixed suggestion once released.
    struct GatedSource {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl SuggestionSource for GatedSource {
        async fn suggest(
            &self,
            request: &SuggestionRequest,
        ) -> Result<Option<Suggestion>, SuggestionError> {
            self.gate.notified().await;
            Ok(Some(Suggestion::new(format!("{} (revised)", request.content))))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl SuggestionSource for FailingSource {
        async fn suggest(
            &self,
            _request: &SuggestionRequest,
        ) -> Result<Option<Suggestion>, SuggestionError> {
            Err(SuggestionError::Source("model unavailable".into()))
        }
    }

    fn contract() -> SharedContract {
        SharedContract::new(
            ContractStore::new(vec![
                Clause::new(3, "3", "PAYMENT TERMS", "Net 45.", RiskLevel::Medium)
                    .with_change(ChangeType::Modified),
                Clause::new(5, "5", "CONFIDENTIALITY", "Two years.", RiskLevel::Medium),
            ])
            .unwrap(),
        )
    }

    fn gated() -> (Arc<Notify>, Arc<dyn SuggestionSource>) {
        let gate = Arc::new(Notify::new());
        let source: Arc<dyn SuggestionSource> = Arc::new(GatedSource {
            gate: Arc::clone(&gate),
        });
        (gate, source)
    }

    #[tokio::test]
    async fn fresh_result_is_attached() {
        let contract = contract();
        let (gate, source) = gated();
        let broker = SuggestionBroker::new(source, contract.clone());

        let handle = broker.submit(5).await.unwrap();
        gate.notify_one();
        assert_eq!(handle.await.unwrap().unwrap(), Delivery::Attached);
        assert_eq!(
            contract.get_clause(5).await.unwrap().suggested(),
            Some("Two years. (revised)")
        );
    }

    #[tokio::test]
    async fn result_after_reject_is_discarded() {
        let contract = contract();
        let (gate, source) = gated();
        let broker = SuggestionBroker::new(source, contract.clone());

        let handle = broker.submit(3).await.unwrap();
        contract.resolve_change(3, false).await.unwrap();
        gate.notify_one();

        assert_eq!(handle.await.unwrap().unwrap(), Delivery::Stale);
        assert!(contract.get_clause(3).await.unwrap().suggestion.is_none());
    }

    #[tokio::test]
    async fn result_after_edit_is_discarded() {
        let contract = contract();
        let (gate, source) = gated();
        let broker = SuggestionBroker::new(source, contract.clone());

        let handle = broker.submit(5).await.unwrap();
        contract.edit_clause(5, "Three years.".into()).await.unwrap();
        gate.notify_one();

        assert_eq!(handle.await.unwrap().unwrap(), Delivery::Stale);
        assert_eq!(contract.get_clause(5).await.unwrap().content, "Three years.");
    }

    #[tokio::test]
    async fn unknown_clause_fails_up_front() {
        let (_gate, source) = gated();
        let broker = SuggestionBroker::new(source, contract());
        assert!(matches!(
            broker.submit(99).await,
            Err(ReviewError::NotFound(99))
        ));
    }

    #[tokio::test]
    async fn source_failure_is_returned() {
        let contract = contract();
        let broker = SuggestionBroker::new(Arc::new(FailingSource), contract.clone());
        let err = broker.request(5).await.unwrap_err();
        assert!(matches!(err, SuggestionError::Source(_)));
        assert!(contract.get_clause(5).await.unwrap().suggestion.is_none());
    }
}
