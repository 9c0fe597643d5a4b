//! Canned suggestion source.
//!
//! Returns a fixed suggestion per clause id after an optional delay. Useful
//! for demos and for driving the review flow without a model behind it.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use clausewise_core::{ClauseId, Suggestion};

use crate::{SuggestionError, SuggestionRequest, SuggestionSource};

#[derive(Debug, Clone, Default)]
pub struct ScriptedSuggestions {
    responses: HashMap<ClauseId, Suggestion>,
    delay: Duration,
}

impl ScriptedSuggestions {
    pub fn new(responses: HashMap<ClauseId, Suggestion>) -> Self {
        Self {
            responses,
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Load responses from JSON: `{"4": {"text": "...", "reasoning": "..."}}`.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading suggestion script {}", path.display()))?;
        let responses: HashMap<ClauseId, Suggestion> =
            serde_json::from_slice(&bytes).context("parsing suggestion script")?;
        Ok(Self::new(responses))
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[async_trait]
impl SuggestionSource for ScriptedSuggestions {
    async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Option<Suggestion>, SuggestionError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.responses.get(&request.clause_id).cloned())
    }
}
