//! Webhook surface: verification handshake, event intake, and the admin
//! page-post trigger.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use scb_core::{
    broadcast::BroadcastScheduler, config::Config, domain::RecipientId,
    retrieval::RetrievalEngine, subscription::SubscriptionRegistry, transport::SendPort,
};

use crate::{handlers, page::PageService};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub engine: Arc<RetrievalEngine>,
    pub registry: Arc<SubscriptionRegistry>,
    pub scheduler: Arc<BroadcastScheduler>,
    pub transport: Arc<dyn SendPort>,
    pub page: Arc<PageService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/webhook", get(verify).post(receive))
        .route("/admin/post-verse", post(post_verse))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", state.cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "webhook server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "🙏 ScriptureBot is running!"
}

#[derive(Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

async fn verify(State(state): State<AppState>, Query(params): Query<VerifyParams>) -> Response {
    if verification_passes(
        params.mode.as_deref(),
        params.verify_token.as_deref(),
        &state.cfg.verify_token,
    ) {
        info!("webhook verified");
        params.challenge.unwrap_or_default().into_response()
    } else {
        warn!("webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

fn verification_passes(mode: Option<&str>, token: Option<&str>, expected: &str) -> bool {
    mode == Some("subscribe") && token == Some(expected)
}

#[derive(Deserialize)]
struct WebhookBody {
    object: String,
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Deserialize)]
struct Entry {
    #[serde(default)]
    messaging: Vec<MessagingEvent>,
}

#[derive(Deserialize)]
struct MessagingEvent {
    sender: Sender,
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Sender {
    id: String,
}

#[derive(Deserialize)]
struct Message {
    text: Option<String>,
}

async fn receive(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<WebhookBody>,
) -> Response {
    if body.object != "page" {
        return StatusCode::NOT_FOUND.into_response();
    }

    for entry in body.entry {
        for event in entry.messaging {
            let Some(text) = event.message.and_then(|m| m.text) else {
                continue;
            };
            let sender = RecipientId(event.sender.id);
            handlers::handle_message(&state, sender, &text).await;
        }
    }

    "EVENT_RECEIVED".into_response()
}

async fn post_verse(State(state): State<AppState>) -> Response {
    match state.page.post_verse().await {
        Ok(()) => "POSTED".into_response(),
        Err(e) => {
            warn!(error = %e, "page post failed");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_requires_subscribe_mode_and_matching_token() {
        assert!(verification_passes(Some("subscribe"), Some("secret"), "secret"));
        assert!(!verification_passes(Some("subscribe"), Some("wrong"), "secret"));
        assert!(!verification_passes(Some("unsubscribe"), Some("secret"), "secret"));
        assert!(!verification_passes(None, Some("secret"), "secret"));
        assert!(!verification_passes(Some("subscribe"), None, "secret"));
    }

    #[test]
    fn webhook_body_extracts_sender_and_text() {
        let body: WebhookBody = serde_json::from_str(
            r#"{
                "object": "page",
                "entry": [{
                    "messaging": [{
                        "sender": {"id": "42"},
                        "message": {"text": "/bible John 3:16"}
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(body.object, "page");
        let event = &body.entry[0].messaging[0];
        assert_eq!(event.sender.id, "42");
        assert_eq!(
            event.message.as_ref().unwrap().text.as_deref(),
            Some("/bible John 3:16")
        );
    }

    #[test]
    fn webhook_body_tolerates_non_text_events() {
        let body: WebhookBody = serde_json::from_str(
            r#"{
                "object": "page",
                "entry": [{
                    "messaging": [{
                        "sender": {"id": "42"},
                        "message": {"attachments": []}
                    }]
                }]
            }"#,
        )
        .unwrap();

        assert!(body.entry[0].messaging[0]
            .message
            .as_ref()
            .unwrap()
            .text
            .is_none());
    }
}
