//! Graph API send client.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use scb_core::{chunker, domain::RecipientId, transport::SendPort};

pub(crate) const GRAPH_API: &str = "https://graph.facebook.com/v18.0";

/// Outbound Messenger client. Splits long texts at the safe limit before
/// sending; a failed chunk fails the whole send.
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    access_token: String,
    safe_limit: usize,
    messaging_type: &'static str,
    tag: Option<&'static str>,
}

impl GraphClient {
    pub fn new(access_token: String, safe_limit: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token,
            safe_limit,
            messaging_type: "RESPONSE",
            tag: None,
        }
    }

    /// Variant for subscription broadcasts, which fall outside the standard
    /// 24-hour messaging window and need a message tag.
    pub fn for_broadcast(&self) -> Self {
        Self {
            messaging_type: "MESSAGE_TAG",
            tag: Some("CONFIRMED_EVENT_UPDATE"),
            ..self.clone()
        }
    }

    async fn post_chunk(&self, recipient: &RecipientId, text: &str) -> anyhow::Result<()> {
        let payload = SendRequest {
            recipient: Recipient { id: &recipient.0 },
            message: MessageBody { text },
            messaging_type: self.messaging_type,
            tag: self.tag,
        };

        let resp = self
            .http
            .post(format!("{GRAPH_API}/me/messages"))
            .query(&[("access_token", self.access_token.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("graph api status {}", resp.status());
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    recipient: Recipient<'a>,
    message: MessageBody<'a>,
    messaging_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
}

#[derive(Serialize)]
struct Recipient<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct MessageBody<'a> {
    text: &'a str,
}

#[async_trait]
impl SendPort for GraphClient {
    async fn send(&self, recipient: &RecipientId, text: &str) -> bool {
        for chunk in chunker::split(text, self.safe_limit) {
            if let Err(e) = self.post_chunk(recipient, &chunk).await {
                warn!(recipient = %recipient, error = %e, "messenger send failed");
                return false;
            }
        }
        true
    }
}
