//! Posting a verse to the page feed.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use scb_core::{broadcast::random_daily_reference, reference, retrieval::RetrievalEngine};

use crate::graph::GRAPH_API;

pub struct PageService {
    http: reqwest::Client,
    access_token: String,
    engine: Arc<RetrievalEngine>,
}

#[derive(Deserialize)]
struct MeResponse {
    id: String,
}

impl PageService {
    pub fn new(access_token: String, engine: Arc<RetrievalEngine>) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token,
            engine,
        }
    }

    async fn page_id(&self) -> anyhow::Result<String> {
        let resp = self
            .http
            .get(format!("{GRAPH_API}/me"))
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json::<MeResponse>().await?.id)
    }

    /// Post a random curated verse to the page feed.
    pub async fn post_verse(&self) -> anyhow::Result<()> {
        let reference_text = random_daily_reference();
        let parsed = reference::parse(reference_text)
            .map_err(|e| anyhow::anyhow!("curated reference {reference_text}: {e}"))?;

        let verse = self
            .engine
            .get_verse(&parsed)
            .await
            .ok_or_else(|| anyhow::anyhow!("could not fetch verse for page post"))?;

        let message = format_page_post(&verse.reference, &verse.content);
        let page_id = self.page_id().await?;

        self.http
            .post(format!("{GRAPH_API}/{page_id}/feed"))
            .query(&[("access_token", self.access_token.as_str())])
            .form(&[("message", message.as_str())])
            .send()
            .await?
            .error_for_status()?;

        info!(reference = %verse.reference, "posted verse to page feed");
        Ok(())
    }
}

fn format_page_post(reference: &str, content: &str) -> String {
    format!("📖 {reference}\n\n{content}\n\n#DailyVerse #ScriptureBot #Bible")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_post_carries_reference_and_hashtags() {
        let post = format_page_post("John 3:16", "For God so loved the world");
        assert!(post.starts_with("📖 John 3:16"));
        assert!(post.contains("For God so loved the world"));
        assert!(post.ends_with("#DailyVerse #ScriptureBot #Bible"));
    }
}
