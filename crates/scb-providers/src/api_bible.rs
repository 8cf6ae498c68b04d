//! Keyed primary provider: API.bible passages endpoint.

use async_trait::async_trait;
use serde::Deserialize;

use scb_core::{
    domain::PassageResult,
    normalize,
    reference::ScriptureReference,
    retrieval::{ProviderAdapter, ProviderOutcome},
};

const API_BIBLE_BASE: &str = "https://api.scripture.api.bible/v1";

pub struct ApiBibleProvider {
    http: reqwest::Client,
    api_key: String,
    bible_id: String,
}

impl ApiBibleProvider {
    pub fn new(api_key: String, bible_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            bible_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PassageEnvelope {
    data: PassageData,
}

#[derive(Debug, Deserialize)]
struct PassageData {
    reference: String,
    content: String,
    copyright: Option<String>,
}

fn passage_from(data: PassageData) -> PassageResult {
    PassageResult {
        reference: data.reference,
        content: normalize::clean(&data.content),
        attribution: data.copyright.map(|c| normalize::clean(&c)),
    }
}

#[async_trait]
impl ProviderAdapter for ApiBibleProvider {
    fn name(&self) -> &str {
        "api.bible"
    }

    async fn fetch_verse(&self, reference: &ScriptureReference) -> ProviderOutcome {
        let url = format!(
            "{API_BIBLE_BASE}/bibles/{}/passages/{}",
            self.bible_id,
            reference.passage_id()
        );

        let resp = match self
            .http
            .get(&url)
            .header("api-key", &self.api_key)
            .query(&[
                ("content-type", "text"),
                ("include-notes", "false"),
                ("include-titles", "true"),
                ("include-chapter-numbers", "false"),
                ("include-verse-numbers", "true"),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ProviderOutcome::Transient(e.to_string()),
        };

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return ProviderOutcome::NotFound;
        }
        if !resp.status().is_success() {
            return ProviderOutcome::Transient(format!("status {}", resp.status()));
        }

        match resp.json::<PassageEnvelope>().await {
            Ok(envelope) => ProviderOutcome::Success(passage_from(envelope.data)),
            Err(e) => ProviderOutcome::Transient(e.to_string()),
        }
    }
}
