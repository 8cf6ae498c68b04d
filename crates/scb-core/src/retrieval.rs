//! Multi-source retrieval with provider fallback.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    domain::{PassageResult, SearchHit},
    reference::ScriptureReference,
};

/// Search responses are capped to the first hits returned by the serving
/// provider.
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// Outcome of a single provider attempt. `NotFound` and `Transient` both make
/// the engine move on to the next provider; a provider is never retried.
#[derive(Clone, Debug)]
pub enum ProviderOutcome {
    Success(PassageResult),
    NotFound,
    Transient(String),
}

/// A scripture content source.
///
/// Concrete adapters (keyed primary, no-key fallback, third-party search)
/// live in `scb-providers`; the engine depends only on this trait.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_verse(&self, reference: &ScriptureReference) -> ProviderOutcome;

    /// `None` means this provider does not support keyword search.
    async fn search_keyword(&self, _keyword: &str) -> Option<Vec<SearchHit>> {
        None
    }
}

/// Orchestrates an ordered provider list: first success wins, failures fall
/// through, exhaustion yields `None` (distinct from a malformed request,
/// which is rejected earlier by `reference::parse`).
pub struct RetrievalEngine {
    providers: Vec<Arc<dyn ProviderAdapter>>,
}

impl RetrievalEngine {
    pub fn new(providers: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { providers }
    }

    pub async fn get_verse(&self, reference: &ScriptureReference) -> Option<PassageResult> {
        for provider in &self.providers {
            match provider.fetch_verse(reference).await {
                ProviderOutcome::Success(result) => {
                    debug!(provider = provider.name(), reference = %reference, "verse served");
                    return Some(result);
                }
                ProviderOutcome::NotFound => {
                    debug!(provider = provider.name(), reference = %reference, "not found, trying next");
                }
                ProviderOutcome::Transient(reason) => {
                    warn!(provider = provider.name(), %reason, "provider failed, trying next");
                }
            }
        }
        None
    }

    /// First supporting provider with a non-empty result wins; results are
    /// never merged across providers.
    pub async fn search(&self, keyword: &str) -> Vec<SearchHit> {
        for provider in &self.providers {
            let Some(mut hits) = provider.search_keyword(keyword).await else {
                continue;
            };
            if hits.is_empty() {
                debug!(provider = provider.name(), keyword, "no search results");
                continue;
            }
            hits.truncate(SEARCH_RESULT_LIMIT);
            return hits;
        }
        Vec::new()
    }
}
