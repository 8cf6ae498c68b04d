//! Third-party search provider: bolls.life keyword search over the KJV.
//!
//! Search-only: verse fetches fall straight through to the next provider.
//! Hits carry numeric book identifiers, mapped through the canonical book
//! table (out-of-range ids display the "Unknown Book" sentinel).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use scb_core::{
    domain::SearchHit,
    normalize,
    reference::{book_display_name, ScriptureReference},
    retrieval::{ProviderAdapter, ProviderOutcome, SEARCH_RESULT_LIMIT},
};

const BOLLS_SEARCH_URL: &str = "https://bolls.life/find/KJV/";

#[derive(Default)]
pub struct BollsSearchProvider {
    http: reqwest::Client,
}

impl BollsSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Deserialize)]
struct BollsHit {
    book: u32,
    chapter: u32,
    verse: u32,
    text: String,
}

fn hit_from(raw: BollsHit) -> SearchHit {
    SearchHit {
        reference: format!(
            "{} {}:{}",
            book_display_name(raw.book),
            raw.chapter,
            raw.verse
        ),
        text: normalize::clean(&raw.text),
    }
}

#[async_trait]
impl ProviderAdapter for BollsSearchProvider {
    fn name(&self) -> &str {
        "bolls.life"
    }

    async fn fetch_verse(&self, _reference: &ScriptureReference) -> ProviderOutcome {
        ProviderOutcome::NotFound
    }

    async fn search_keyword(&self, keyword: &str) -> Option<Vec<SearchHit>> {
        let resp = match self
            .http
            .get(BOLLS_SEARCH_URL)
            .query(&[("search", keyword)])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "bolls search request failed");
                return Some(Vec::new());
            }
        };

        if !resp.status().is_success() {
            warn!(status = %resp.status(), "bolls search returned an error");
            return Some(Vec::new());
        }

        match resp.json::<Vec<BollsHit>>().await {
            Ok(hits) => Some(
                hits.into_iter()
                    .take(SEARCH_RESULT_LIMIT)
                    .map(hit_from)
                    .collect(),
            ),
            Err(e) => {
                warn!(error = %e, "bolls search payload was unreadable");
                Some(Vec::new())
            }
        }
    }
}
