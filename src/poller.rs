// Telemetry poller: one refresh round per tick, every device fetched concurrently.
// The scheduler task is owned by a PollerHandle; dropping or shutting down the handle
// stops further ticks. Rounds already running are left to finish.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::join_all;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval, interval_at};
use tracing::{Instrument, debug, info, warn};

use crate::models::Device;
use crate::status_client::StatusSource;
use crate::store::StatusStore;

/// Time between scheduled refresh rounds.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// What a single `refresh_device` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated,
    Failed,
    /// A request for the device was already in flight; nothing was sent.
    Skipped,
}

/// Fetches device status from a [`StatusSource`] and records it in the store.
pub struct Poller<S> {
    source: Arc<S>,
    store: Arc<StatusStore>,
}

impl<S> Clone for Poller<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: StatusSource> Poller<S> {
    pub fn new(source: S, store: Arc<StatusStore>) -> Self {
        Self {
            source: Arc::new(source),
            store,
        }
    }

    pub fn store(&self) -> &Arc<StatusStore> {
        &self.store
    }

    /// One bounded request for `device`. At most one request per device is in flight;
    /// a call that finds one outstanding returns [`RefreshOutcome::Skipped`].
    pub async fn refresh_device(&self, device: Device) -> RefreshOutcome {
        let Some(_loading) = self.store.begin_refresh(device) else {
            debug!(device = %device, operation = "refresh_device", "request already in flight; skipped");
            return RefreshOutcome::Skipped;
        };

        match self.source.fetch_status(device).await {
            Ok(status) => {
                debug!(
                    device = %device,
                    operation = "refresh_device",
                    power_state = status.power_state.as_deref().unwrap_or("unknown"),
                    "device status updated"
                );
                self.store.record_success(device, status);
                RefreshOutcome::Updated
            }
            Err(e) => {
                warn!(
                    device = %device,
                    error = %e,
                    operation = "refresh_device",
                    "device status fetch failed"
                );
                self.store.record_failure(device, e.user_message());
                RefreshOutcome::Failed
            }
        }
    }

    /// Refreshes every device concurrently and returns once all of them have settled.
    /// One device's failure or slowness does not affect the others.
    pub async fn refresh_all(&self) {
        let outcomes = join_all(Device::ALL.map(|d| self.refresh_device(d))).await;
        let count = |o: RefreshOutcome| outcomes.iter().filter(|x| **x == o).count();
        debug!(
            operation = "refresh_all",
            updated = count(RefreshOutcome::Updated),
            failed = count(RefreshOutcome::Failed),
            skipped = count(RefreshOutcome::Skipped),
            "refresh round settled"
        );
    }
}

/// Scheduler timing and logging config.
pub struct PollerConfig {
    /// How often to log fleet stats at INFO (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Requests an out-of-schedule refresh round. Cheap to clone.
#[derive(Clone)]
pub struct RefreshTrigger(mpsc::Sender<()>);

impl RefreshTrigger {
    /// Queues a round. A request made while another is still queued is folded into it.
    /// Returns false once the scheduler has stopped.
    pub fn trigger(&self) -> bool {
        match self.0.try_send(()) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(())) => true,
            Err(mpsc::error::TrySendError::Closed(())) => false,
        }
    }
}

/// Owns the scheduler task. Dropping it without `shutdown` also stops the schedule.
pub struct PollerHandle {
    refresh: RefreshTrigger,
    shutdown_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl PollerHandle {
    pub fn refresh_trigger(&self) -> RefreshTrigger {
        self.refresh.clone()
    }

    /// Stops the schedule and waits for the scheduler task to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.join.await {
            warn!(error = %e, operation = "poller_shutdown", "poller task ended abnormally");
        }
    }
}

/// Starts the scheduler: a round immediately, then every [`POLL_INTERVAL`], plus one per
/// manual trigger, until the handle is shut down or dropped.
pub fn spawn<S: StatusSource>(
    poller: Poller<S>,
    config: PollerConfig,
    ws_clients: Arc<AtomicUsize>,
) -> PollerHandle {
    let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(1);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let stats_log_interval = Duration::from_secs(config.stats_log_interval_secs);

    let poller_span = tracing::span!(
        tracing::Level::DEBUG,
        "poller",
        interval_secs = POLL_INTERVAL.as_secs()
    );

    let join = tokio::spawn(
        async move {
            let mut tick = interval(POLL_INTERVAL);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut stats_log_tick =
                interval_at(tokio::time::Instant::now() + stats_log_interval, stats_log_interval);
            stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let mut rounds_started: u64 = 0;

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => {
                        debug!("Poller shutting down");
                        break;
                    }
                    _ = tick.tick() => {
                        start_round(&poller, "scheduled");
                        rounds_started += 1;
                    }
                    Some(()) = refresh_rx.recv() => {
                        start_round(&poller, "manual");
                        rounds_started += 1;
                    }
                    _ = stats_log_tick.tick() => {
                        let summary = poller.store().snapshot().summary;
                        info!(
                            rounds_started,
                            ws_clients = ws_clients.load(Ordering::Relaxed),
                            online = summary.online,
                            offline = summary.offline,
                            warning = summary.warning,
                            "fleet stats"
                        );
                    }
                }
            }
        }
        .instrument(poller_span),
    );

    PollerHandle {
        refresh: RefreshTrigger(refresh_tx),
        shutdown_tx,
        join,
    }
}

/// Fire-and-forget: the round runs in its own task so the scheduler never waits on I/O.
fn start_round<S: StatusSource>(poller: &Poller<S>, trigger: &'static str) {
    debug!(trigger, "starting refresh round");
    let poller = poller.clone();
    tokio::spawn(async move { poller.refresh_all().await });
}
