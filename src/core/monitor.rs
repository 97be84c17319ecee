use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::{Mutex as AsyncMutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};
use url::Url;

use crate::config::MonitorConfig;
use crate::core::fetch::Spider;
use crate::core::health::{ClusterState, aggregate};
use crate::core::reader::{ClusterHealthReader, HealthSource};
use crate::error::ConfigError;

const EVENT_CAPACITY: usize = 64;

fn utc_now_ms() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

/// Emitted when the aggregate cluster state changes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StateChanged {
    pub previous: ClusterState,
    pub next: ClusterState,
    /// Web console of the monitored server.
    pub console_url: Url,
    pub at_ms: i128,
}

impl StateChanged {
    pub fn summary(&self) -> String {
        format!("The state is now: {}", self.next)
    }

    /// A healthy cluster makes earlier alerts obsolete.
    pub fn clears_alerts(&self) -> bool {
        self.next == ClusterState::Good
    }
}

/// Whether moving from `previous` to `next` is worth telling anyone about. Steady
/// state is silent, and so is the first poll of a healthy cluster.
pub fn should_notify(previous: ClusterState, next: ClusterState) -> bool {
    if next == previous {
        return false;
    }
    !(previous == ClusterState::Uninitialised && next == ClusterState::Good)
}

struct Poller<S> {
    source: S,
    previous: ClusterState,
}

struct Task {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Task {
    fn is_live(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }
}

#[derive(Default)]
struct Control {
    started: bool,
    subscribers: usize,
    task: Option<Task>,
    // cancelled tasks that may still be finishing a tick
    retired: Vec<JoinHandle<()>>,
}

impl Control {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.token.cancel();
            self.retired.retain(|h| !h.is_finished());
            self.retired.push(task.handle);
        }
    }

    fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(Task::is_live)
    }
}

struct Shared<S> {
    poller: AsyncMutex<Poller<S>>,
    control: Mutex<Control>,
    snapshot: watch::Sender<ClusterState>,
    events: broadcast::Sender<StateChanged>,
    console_url: Url,
    poll_interval: Duration,
}

impl<S> Shared<S> {
    fn control(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn detach(&self) {
        let mut control = self.control();
        control.subscribers = control.subscribers.saturating_sub(1);
        debug!(subscribers = control.subscribers, "subscriber detached");
        if control.subscribers == 0 && control.is_polling() {
            control.cancel();
            info!("no subscribers left, polling paused");
        }
    }
}

impl<S: HealthSource> Shared<S> {
    /// Scheduled poll. Returns `None` if the tick was cancelled before it started
    /// reading.
    async fn tick(&self, token: &CancellationToken) -> Option<ClusterState> {
        let mut poller = self.poller.lock().await;
        if token.is_cancelled() {
            return None;
        }
        Some(self.observe(&mut poller).await)
    }

    /// Read, aggregate, compare, publish.
    async fn observe(&self, poller: &mut Poller<S>) -> ClusterState {
        let next = match poller.source.get_states().await {
            Ok(states) => aggregate(&states),
            Err(e) => {
                warn!(error = %e, "failed to read cluster health");
                ClusterState::NetworkError
            }
        };

        let previous = poller.previous;
        if next != previous {
            self.snapshot.send_replace(next);

            if should_notify(previous, next) {
                let event = StateChanged {
                    previous,
                    next,
                    console_url: self.console_url.clone(),
                    at_ms: utc_now_ms(),
                };
                match next {
                    ClusterState::Good => info!(%previous, %next, "cluster state changed"),
                    _ => warn!(%previous, %next, "cluster state changed"),
                }
                // nobody listening is fine
                let _ = self.events.send(event);
            } else {
                info!(state = %next, "cluster state initialised");
            }
        }
        poller.previous = next;

        next
    }
}

async fn poll_loop<S: HealthSource>(shared: Arc<Shared<S>>, token: CancellationToken) {
    loop {
        if token.is_cancelled() {
            break;
        }

        let span = tracing::info_span!("tick");
        if shared.tick(&token).instrument(span).await.is_none() {
            break;
        }

        // Interval runs from the end of the tick.
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(shared.poll_interval) => {}
        }
    }

    debug!("polling stopped");
}

/// Periodically polls a [`HealthSource`] and reports changes of the aggregate state.
///
/// `start` begins polling with an immediate tick. Polling continues until `stop` or
/// until the last [`Subscription`] is detached; attaching again resumes with an
/// immediate tick and keeps the last observed state.
pub struct Monitor<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for Monitor<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Monitor<ClusterHealthReader> {
    /// Monitor the cluster described by `config` over HTTP.
    pub fn connect(config: &MonitorConfig) -> anyhow::Result<Self> {
        let bootstrap_url = config.bootstrap_url()?;
        let spider = Spider::with_timeout(config.http_timeout)?;
        let reader = ClusterHealthReader::new(spider, bootstrap_url, config.pool_name.clone());
        Ok(Self::new(config, reader)?)
    }
}

impl<S: HealthSource> Monitor<S> {
    /// Fails if no bootstrap url can be built from `config`.
    pub fn new(config: &MonitorConfig, source: S) -> Result<Self, ConfigError> {
        config.bootstrap_url()?;
        let console_url = config.console_url()?;

        let (snapshot, _) = watch::channel(ClusterState::Uninitialised);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let shared = Shared {
            poller: AsyncMutex::new(Poller {
                source,
                previous: ClusterState::Uninitialised,
            }),
            control: Mutex::new(Control::default()),
            snapshot,
            events,
            console_url,
            poll_interval: config.poll_interval,
        };

        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// Begin polling with an immediate tick.
    pub fn start(&self) {
        let mut control = self.shared.control();
        control.started = true;
        self.spawn_if_idle(&mut control);
    }

    /// Register a listener for state changes. Resumes polling if the monitor was
    /// started and polling had been paused by the last listener leaving.
    pub fn attach(&self) -> Subscription<S> {
        let events = self.shared.events.subscribe();
        let mut control = self.shared.control();
        control.subscribers += 1;
        debug!(subscribers = control.subscribers, "subscriber attached");
        if control.started {
            self.spawn_if_idle(&mut control);
        }

        Subscription {
            shared: Arc::downgrade(&self.shared),
            events,
        }
    }

    /// Run a single tick right now, outside the schedule.
    pub async fn poll_once(&self) -> ClusterState {
        let span = tracing::info_span!("poll_once");
        async {
            let mut poller = self.shared.poller.lock().await;
            self.shared.observe(&mut poller).await
        }
        .instrument(span)
        .await
    }

    fn spawn_if_idle(&self, control: &mut Control) {
        if control.is_polling() {
            return;
        }
        control.cancel();

        let token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(Arc::clone(&self.shared), token.clone()));
        control.task = Some(Task { token, handle });
        info!(interval = ?self.shared.poll_interval, "polling started");
    }
}

impl<S> Monitor<S> {
    /// Cancel any scheduled tick. A tick already reading from the source finishes and
    /// its state is recorded.
    pub fn stop(&self) {
        let mut control = self.shared.control();
        control.started = false;
        control.cancel();
        info!("polling stopped by request");
    }

    /// `stop`, then wait for any in-flight tick to complete.
    pub async fn shutdown(&self) {
        let handles = {
            let mut control = self.shared.control();
            control.started = false;
            control.cancel();
            std::mem::take(&mut control.retired)
        };
        for handle in handles {
            let _ = handle.await;
        }
    }

    pub fn subscribers(&self) -> usize {
        self.shared.control().subscribers
    }

    pub fn is_polling(&self) -> bool {
        self.shared.control().is_polling()
    }

    /// Last published aggregate state. Never blocks on a tick in progress.
    pub fn current_state(&self) -> ClusterState {
        *self.shared.snapshot.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ClusterState> {
        self.shared.snapshot.subscribe()
    }

}

/// A listener attached to a [`Monitor`]. Dropping it detaches.
pub struct Subscription<S> {
    shared: Weak<Shared<S>>,
    events: broadcast::Receiver<StateChanged>,
}

impl<S> Subscription<S> {
    /// Next state change, or `None` once every [`Monitor`] handle and the polling task
    /// are gone.
    pub async fn recv(&mut self) -> Option<StateChanged> {
        loop {
            match self.events.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "subscriber lagged behind state changes");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<StateChanged> {
        loop {
            match self.events.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    warn!(missed, "subscriber lagged behind state changes");
                }
                Err(_) => return None,
            }
        }
    }

    pub fn detach(self) {
        drop(self);
    }
}

impl<S> Drop for Subscription<S> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.detach();
        }
    }
}
