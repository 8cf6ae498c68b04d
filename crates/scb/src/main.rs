//! ScriptureBot entrypoint: wire providers, scheduler, and the webhook server.

use std::sync::Arc;

use tracing::{debug, info};

use scb_core::{
    broadcast::BroadcastScheduler,
    config::Config,
    logging,
    retrieval::{ProviderAdapter, RetrievalEngine},
    subscription::SubscriptionRegistry,
    transport::SendPort,
};
use scb_messenger::{
    graph::GraphClient,
    page::PageService,
    webhook::{self, AppState},
};
use scb_providers::{ApiBibleProvider, BibleApiProvider, BollsSearchProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("scb")?;

    let cfg = Arc::new(Config::load()?);

    // Provider order is the fallback order.
    let mut providers: Vec<Arc<dyn ProviderAdapter>> = vec![Arc::new(BibleApiProvider::new())];
    match &cfg.api_bible_key {
        Some(key) => providers.push(Arc::new(ApiBibleProvider::new(
            key.clone(),
            cfg.api_bible_id.clone(),
        ))),
        None => debug!("API_BIBLE_KEY not set, skipping keyed provider"),
    }
    providers.push(Arc::new(BollsSearchProvider::new()));

    let engine = Arc::new(RetrievalEngine::new(providers));
    let registry = Arc::new(SubscriptionRegistry::new());

    let client = GraphClient::new(cfg.page_access_token.clone(), cfg.safe_message_limit);
    let transport: Arc<dyn SendPort> = Arc::new(client.clone());
    let broadcast_transport: Arc<dyn SendPort> = Arc::new(client.for_broadcast());

    let scheduler = Arc::new(BroadcastScheduler::new(
        cfg.broadcast(),
        engine.clone(),
        registry.clone(),
        broadcast_transport,
    ));
    scheduler.start().await;

    let page = Arc::new(PageService::new(
        cfg.page_access_token.clone(),
        engine.clone(),
    ));

    info!(port = cfg.port, "starting ScriptureBot");
    webhook::serve(AppState {
        cfg,
        engine,
        registry,
        scheduler,
        transport,
        page,
    })
    .await
}
