//! Scheduled daily verse broadcasts.
//!
//! Two timer jobs (morning and evening in a fixed UTC offset) each fire one
//! broadcast cycle: pick a curated reference, resolve it through the
//! retrieval engine, fan the formatted message out to every subscriber with a
//! pacing delay between sends. One-shot delayed sends (the post-subscribe
//! welcome) run through the same scheduler so every time-based effect is
//! centrally owned.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};
use rand::{rng, Rng};
use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{
    domain::{PassageResult, RecipientId},
    reference,
    retrieval::RetrievalEngine,
    subscription::SubscriptionRegistry,
    transport::SendPort,
};

/// Curated well-known verses for broadcast content quality; deliberately not
/// the full 66-book space.
pub static DAILY_VERSES: [&str; 30] = [
    "John 3:16",
    "Psalm 23:1",
    "Philippians 4:13",
    "Romans 8:28",
    "Jeremiah 29:11",
    "Proverbs 3:5",
    "Isaiah 41:10",
    "Matthew 11:28",
    "Psalm 46:1",
    "Romans 12:2",
    "2 Timothy 1:7",
    "Psalm 119:105",
    "Galatians 5:22",
    "Hebrews 11:1",
    "1 Corinthians 13:4",
    "Ephesians 2:8",
    "James 1:5",
    "Psalm 37:4",
    "Proverbs 16:3",
    "Matthew 6:33",
    "Joshua 1:9",
    "Psalm 91:1",
    "1 Peter 5:7",
    "Colossians 3:23",
    "Micah 6:8",
    "Psalm 27:1",
    "Romans 15:13",
    "2 Corinthians 5:17",
    "Psalm 139:14",
    "Matthew 5:16",
];

/// Pick one curated reference uniformly at random.
pub fn random_daily_reference() -> &'static str {
    DAILY_VERSES[rng().random_range(0..DAILY_VERSES.len())]
}

pub fn format_daily_verse(verse: &PassageResult) -> String {
    format!(
        "🌅 Daily Verse\n\n📖 {}\n\n{}\n\n🙏 Have a blessed day!",
        verse.reference, verse.content
    )
}

#[derive(Clone, Debug)]
pub struct BroadcastConfig {
    /// Times of day (in `utc_offset`) at which a broadcast fires.
    pub fire_times: Vec<NaiveTime>,
    pub utc_offset: FixedOffset,
    /// Fixed delay between per-recipient sends during fan-out.
    pub pacing_delay: Duration,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            fire_times: vec![
                NaiveTime::from_hms_opt(6, 0, 0).expect("valid time"),
                NaiveTime::from_hms_opt(18, 0, 0).expect("valid time"),
            ],
            // Philippine Time, no DST.
            utc_offset: FixedOffset::east_opt(8 * 3600).expect("valid offset"),
            pacing_delay: Duration::from_millis(100),
        }
    }
}

#[derive(Clone)]
pub struct BroadcastScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    cfg: BroadcastConfig,
    engine: Arc<RetrievalEngine>,
    registry: Arc<SubscriptionRegistry>,
    transport: Arc<dyn SendPort>,
    state: Mutex<SchedulerState>,
}

#[derive(Default)]
struct SchedulerState {
    jobs: Vec<JobEntry>,
}

struct JobEntry {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl BroadcastScheduler {
    pub fn new(
        cfg: BroadcastConfig,
        engine: Arc<RetrievalEngine>,
        registry: Arc<SubscriptionRegistry>,
        transport: Arc<dyn SendPort>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                cfg,
                engine,
                registry,
                transport,
                state: Mutex::new(SchedulerState::default()),
            }),
        }
    }

    /// Spawn one timer job per configured fire time.
    pub async fn start(&self) {
        let mut st = self.inner.state.lock().await;
        for &fire_at in &self.inner.cfg.fire_times {
            let cancel = CancellationToken::new();
            let scheduler = self.clone();
            let cancel_clone = cancel.clone();
            let handle = tokio::spawn(async move {
                scheduler.job_loop(fire_at, cancel_clone).await;
            });
            st.jobs.push(JobEntry { cancel, handle });
        }
        info!(
            times = ?self.inner.cfg.fire_times,
            offset = %self.inner.cfg.utc_offset,
            "daily verse scheduler initialized"
        );
    }

    pub async fn stop(&self) {
        let mut st = self.inner.state.lock().await;
        for job in st.jobs.drain(..) {
            job.cancel.cancel();
            job.handle.abort(); // best-effort
        }
    }

    /// Schedule a single delayed send (e.g. the post-subscribe welcome).
    pub async fn schedule_one_shot(&self, delay: Duration, recipient: RecipientId, text: String) {
        let cancel = CancellationToken::new();
        let inner = self.inner.clone();
        let cancel_clone = cancel.clone();
        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = cancel_clone.cancelled() => {}
                _ = sleep(delay) => {
                    if !inner.transport.send(&recipient, &text).await {
                        warn!(recipient = %recipient, "failed to deliver scheduled message");
                    }
                }
            }
        });
        let mut st = self.inner.state.lock().await;
        // Reap completed one-shots so the job list stays bounded across the
        // process lifetime.
        st.jobs.retain(|job| !job.handle.is_finished());
        st.jobs.push(JobEntry { cancel, handle });
    }

    async fn job_loop(&self, fire_at: NaiveTime, cancel: CancellationToken) {
        loop {
            let now = Utc::now().with_timezone(&self.inner.cfg.utc_offset);
            let wait = duration_until(now, fire_at);
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(wait) => {
                    info!(time = %fire_at, "broadcast timer fired");
                    self.trigger_broadcast().await;
                }
            }
        }
    }

    /// One broadcast cycle. Failures degrade: a retrieval miss aborts the
    /// cycle, a per-recipient send failure is logged and fan-out continues.
    pub async fn trigger_broadcast(&self) {
        let inner = &self.inner;

        if inner.registry.count().await == 0 {
            info!("no subscribers for daily verse");
            return;
        }

        let reference_text = random_daily_reference();
        let reference = match reference::parse(reference_text) {
            Ok(r) => r,
            Err(e) => {
                warn!(reference = reference_text, error = %e, "curated reference failed to parse");
                return;
            }
        };

        let Some(verse) = inner.engine.get_verse(&reference).await else {
            warn!(reference = reference_text, "could not fetch verse, aborting broadcast");
            return;
        };

        let message = format_daily_verse(&verse);
        let recipients = inner.registry.snapshot().await;
        info!(
            reference = %verse.reference,
            subscribers = recipients.len(),
            "sending daily verse"
        );

        for recipient in &recipients {
            if !inner.transport.send(recipient, &message).await {
                warn!(recipient = %recipient, "failed to deliver daily verse");
            }
            sleep(inner.cfg.pacing_delay).await;
        }

        info!("daily verse broadcast complete");
    }
}

fn duration_until(now: DateTime<FixedOffset>, fire_at: NaiveTime) -> Duration {
    let tz = now.timezone();
    let mut next = match now.date_naive().and_time(fire_at).and_local_timezone(tz) {
        chrono::LocalResult::Single(dt) => dt,
        // Unreachable for fixed offsets.
        _ => return Duration::from_secs(60),
    };
    if next <= now {
        next += chrono::Duration::days(1);
    }
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::time::Instant;

    use super::*;
    use crate::retrieval::{ProviderAdapter, ProviderOutcome};

    struct StubProvider {
        outcome: ProviderOutcome,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn new(outcome: ProviderOutcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ProviderAdapter for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch_verse(
            &self,
            _reference: &crate::reference::ScriptureReference,
        ) -> ProviderOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<(RecipientId, String, Instant)>>,
        fail: bool,
    }

    #[async_trait]
    impl SendPort for RecordingTransport {
        async fn send(&self, recipient: &RecipientId, text: &str) -> bool {
            self.sent
                .lock()
                .await
                .push((recipient.clone(), text.to_string(), Instant::now()));
            !self.fail
        }
    }

    fn fixed_passage() -> PassageResult {
        PassageResult {
            reference: "John 3:16".to_string(),
            content: "For God so loved the world".to_string(),
            attribution: None,
        }
    }

    fn scheduler_with(
        provider: Arc<StubProvider>,
        transport: Arc<RecordingTransport>,
        registry: Arc<SubscriptionRegistry>,
        pacing: Duration,
    ) -> BroadcastScheduler {
        let engine = Arc::new(RetrievalEngine::new(vec![provider]));
        let cfg = BroadcastConfig {
            pacing_delay: pacing,
            ..BroadcastConfig::default()
        };
        BroadcastScheduler::new(cfg, engine, registry, transport)
    }

    #[tokio::test]
    async fn broadcast_fans_out_in_order_with_pacing() {
        let provider = StubProvider::new(ProviderOutcome::Success(fixed_passage()));
        let transport = Arc::new(RecordingTransport::default());
        let registry = Arc::new(SubscriptionRegistry::new());
        registry.subscribe(RecipientId("a".to_string())).await;
        registry.subscribe(RecipientId("b".to_string())).await;

        let pacing = Duration::from_millis(20);
        let scheduler = scheduler_with(provider, transport.clone(), registry, pacing);
        scheduler.trigger_broadcast().await;

        let sent = transport.sent.lock().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, RecipientId("a".to_string()));
        assert_eq!(sent[1].0, RecipientId("b".to_string()));
        assert!(sent[0].1.contains("Daily Verse"));
        assert!(sent[0].1.contains("John 3:16"));
        assert!(sent[1].2.duration_since(sent[0].2) >= pacing);
    }

    #[tokio::test]
    async fn zero_subscribers_means_zero_calls() {
        let provider = StubProvider::new(ProviderOutcome::Success(fixed_passage()));
        let transport = Arc::new(RecordingTransport::default());
        let registry = Arc::new(SubscriptionRegistry::new());

        let scheduler = scheduler_with(
            provider.clone(),
            transport.clone(),
            registry,
            Duration::from_millis(1),
        );
        scheduler.trigger_broadcast().await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(transport.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn retrieval_miss_aborts_the_cycle() {
        let provider = StubProvider::new(ProviderOutcome::NotFound);
        let transport = Arc::new(RecordingTransport::default());
        let registry = Arc::new(SubscriptionRegistry::new());
        registry.subscribe(RecipientId("a".to_string())).await;

        let scheduler = scheduler_with(
            provider,
            transport.clone(),
            registry,
            Duration::from_millis(1),
        );
        scheduler.trigger_broadcast().await;

        assert!(transport.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn send_failure_does_not_abort_fan_out() {
        let provider = StubProvider::new(ProviderOutcome::Success(fixed_passage()));
        let transport = Arc::new(RecordingTransport {
            fail: true,
            ..RecordingTransport::default()
        });
        let registry = Arc::new(SubscriptionRegistry::new());
        registry.subscribe(RecipientId("a".to_string())).await;
        registry.subscribe(RecipientId("b".to_string())).await;

        let scheduler = scheduler_with(
            provider,
            transport.clone(),
            registry,
            Duration::from_millis(1),
        );
        scheduler.trigger_broadcast().await;

        assert_eq!(transport.sent.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn one_shot_fires_after_delay() {
        let provider = StubProvider::new(ProviderOutcome::NotFound);
        let transport = Arc::new(RecordingTransport::default());
        let registry = Arc::new(SubscriptionRegistry::new());

        let scheduler = scheduler_with(
            provider,
            transport.clone(),
            registry,
            Duration::from_millis(1),
        );
        scheduler
            .schedule_one_shot(
                Duration::from_millis(10),
                RecipientId("a".to_string()),
                "welcome".to_string(),
            )
            .await;

        assert!(transport.sent.lock().await.is_empty());
        sleep(Duration::from_millis(60)).await;
        let sent = transport.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "welcome");
    }

    #[tokio::test]
    async fn completed_one_shots_are_reaped() {
        let provider = StubProvider::new(ProviderOutcome::NotFound);
        let transport = Arc::new(RecordingTransport::default());
        let registry = Arc::new(SubscriptionRegistry::new());

        let scheduler = scheduler_with(
            provider,
            transport.clone(),
            registry,
            Duration::from_millis(1),
        );
        for i in 0..100 {
            scheduler
                .schedule_one_shot(
                    Duration::from_millis(1),
                    RecipientId(format!("r{i}")),
                    "welcome".to_string(),
                )
                .await;
        }
        sleep(Duration::from_millis(100)).await;
        scheduler
            .schedule_one_shot(
                Duration::from_millis(1),
                RecipientId("last".to_string()),
                "welcome".to_string(),
            )
            .await;

        let st = scheduler.inner.state.lock().await;
        assert!(
            st.jobs.len() <= 2,
            "completed one-shot jobs still retained: {}",
            st.jobs.len()
        );
    }

    #[test]
    fn every_curated_reference_parses() {
        for text in DAILY_VERSES {
            assert!(reference::parse(text).is_ok(), "reference: {text}");
        }
    }

    #[test]
    fn duration_until_wraps_to_next_day() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let fire_at = NaiveTime::from_hms_opt(6, 0, 0).unwrap();

        let before = DateTime::parse_from_rfc3339("2026-08-27T05:00:00+08:00").unwrap();
        assert_eq!(duration_until(before, fire_at), Duration::from_secs(3600));

        let after = DateTime::parse_from_rfc3339("2026-08-27T07:00:00+08:00").unwrap();
        assert_eq!(
            duration_until(after, fire_at),
            Duration::from_secs(23 * 3600)
        );
    }
}
