//! No-key fallback provider: bible-api.com.
//!
//! Takes the human-readable reference directly and serves the World English
//! Bible translation. First in the default fallback order because it needs no
//! credential and is the most reliable.

use async_trait::async_trait;
use serde::Deserialize;

use scb_core::{
    domain::PassageResult,
    normalize,
    reference::ScriptureReference,
    retrieval::{ProviderAdapter, ProviderOutcome},
};

const BIBLE_API_BASE: &str = "https://bible-api.com";

const WEB_ATTRIBUTION: &str = "World English Bible (Public Domain)";

#[derive(Default)]
pub struct BibleApiProvider {
    http: reqwest::Client,
}

impl BibleApiProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Deserialize)]
struct VerseResponse {
    error: Option<String>,
    reference: Option<String>,
    text: Option<String>,
}

fn passage_from(data: VerseResponse) -> Option<PassageResult> {
    if data.error.is_some() {
        return None;
    }
    Some(PassageResult {
        reference: data.reference?,
        content: normalize::clean(&data.text?),
        attribution: Some(WEB_ATTRIBUTION.to_string()),
    })
}

#[async_trait]
impl ProviderAdapter for BibleApiProvider {
    fn name(&self) -> &str {
        "bible-api.com"
    }

    async fn fetch_verse(&self, reference: &ScriptureReference) -> ProviderOutcome {
        // bible-api accepts '+' as the separator in the path.
        let url = format!("{BIBLE_API_BASE}/{}", reference.to_string().replace(' ', "+"));

        let resp = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => return ProviderOutcome::Transient(e.to_string()),
        };

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return ProviderOutcome::NotFound;
        }
        if !resp.status().is_success() {
            return ProviderOutcome::Transient(format!("status {}", resp.status()));
        }

        let data = match resp.json::<VerseResponse>().await {
            Ok(d) => d,
            Err(e) => return ProviderOutcome::Transient(e.to_string()),
        };

        match passage_from(data) {
            Some(passage) => ProviderOutcome::Success(passage),
            None => ProviderOutcome::NotFound,
        }
    }
}
