//! Inbound message handling: command dispatch over the core.

use tracing::{info, warn};

use scb_core::{
    commands::{self, Command},
    domain::{RecipientId, SearchHit},
    reference,
};

use crate::webhook::AppState;

/// Dispatch one inbound text message. Unrecognized input is ignored.
pub async fn handle_message(state: &AppState, sender: RecipientId, text: &str) {
    info!(sender = %sender, "incoming message");

    let Some(command) = commands::parse_command(text) else {
        return;
    };

    let response = match command {
        Command::Bible(raw) => bible_response(state, &raw).await,
        Command::Search(keyword) => search_response(state, &keyword).await,
        Command::Help => commands::help_message().to_string(),
        Command::Subscribe => subscribe_response(state, &sender).await,
        Command::Unsubscribe => unsubscribe_response(state, &sender).await,
    };

    if !state.transport.send(&sender, &response).await {
        warn!(sender = %sender, "failed to deliver reply");
    }
}

async fn bible_response(state: &AppState, raw: &str) -> String {
    let parsed = match reference::parse(raw) {
        Ok(r) => r,
        Err(e) => return format!("❌ {e}"),
    };

    match state.engine.get_verse(&parsed).await {
        Some(verse) => format_verse_reply(&verse.reference, &verse.content),
        None => format!("❌ Could not find \"{raw}\". Try: /bible John 3:16"),
    }
}

async fn search_response(state: &AppState, keyword: &str) -> String {
    let hits = state.engine.search(keyword).await;
    format_search_results(keyword, &hits)
}

async fn subscribe_response(state: &AppState, sender: &RecipientId) -> String {
    // The insert result decides the reply, so a duplicate /subscribe can
    // never schedule a second welcome.
    if !state.registry.subscribe(sender.clone()).await {
        return "📬 You are already subscribed to the daily verse.".to_string();
    }

    state
        .scheduler
        .schedule_one_shot(
            state.cfg.welcome_delay,
            sender.clone(),
            welcome_message().to_string(),
        )
        .await;

    "📬 Subscribed! You will receive a daily verse every morning and evening. \
     Send /unsubscribe to stop."
        .to_string()
}

async fn unsubscribe_response(state: &AppState, sender: &RecipientId) -> String {
    state.registry.unsubscribe(sender).await;
    "📭 Unsubscribed. You will no longer receive the daily verse.".to_string()
}

fn welcome_message() -> &'static str {
    "🙏 Welcome to the daily verse! Send /help to see everything ScriptureBot can do."
}

fn format_verse_reply(reference: &str, content: &str) -> String {
    format!("📖 {reference}\n\n{content}")
}

fn format_search_results(keyword: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("🔍 No results found for \"{keyword}\"");
    }

    let mut response = format!("🔍 Search results for \"{keyword}\":\n\n");
    for hit in hits {
        response.push_str(&format!("📖 {}\n{}\n\n", hit.reference, hit.text));
    }
    response.trim_end().to_string()
}
