//! Alert synchronization engine: periodic fetch, id-keyed merge, optimistic
//! read-state, toast dispatch.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

use logipilot_model::{Alert, AlertId, Page, PageInfo, PageRequest};

use crate::api::ApiService;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::events::{AlertEvent, EventBus, Toast};
use crate::optimistic;

/// Default delay between alert poll ticks.
pub const DEFAULT_ALERT_POLL_INTERVAL: Duration = Duration::from_millis(15_000);

/// Locally cached view of the server-owned alert collection.
#[derive(Debug, Default)]
struct AlertCache {
    /// Sorted by timestamp descending.
    alerts: Vec<Alert>,
    page_info: Option<PageInfo>,
    /// Every alert id this engine has ever observed. An id toasts at most
    /// once for the lifetime of the engine, whichever path fetched it first.
    seen: HashSet<AlertId>,
    last_error: Option<String>,
}

impl AlertCache {
    /// Wholesale replacement for explicit fetches: no merge, no toasts,
    /// every fetched id recorded as observed. Returns (total, unread).
    fn replace_page(&mut self, page: Page<Alert>) -> (usize, usize) {
        self.alerts = page.items;
        self.alerts
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.seen
            .extend(self.alerts.iter().map(|alert| alert.id.clone()));
        self.page_info = Some(page.info);
        self.last_error = None;

        let unread = self.alerts.iter().filter(|a| a.is_unread()).count();
        (self.alerts.len(), unread)
    }

    /// Id-keyed merge for poll ticks: update in place, append if new, then
    /// re-sort newest first. Latest write per id wins. Returns the alerts
    /// observed for the first time, plus how many cached entries were
    /// pruned (only non-zero when `prune` is set).
    fn merge_page(&mut self, page: Page<Alert>, prune: bool) -> (Vec<Alert>, usize) {
        let mut fresh = Vec::new();
        let mut fetched_ids = HashSet::new();

        for alert in page.items {
            if prune {
                fetched_ids.insert(alert.id.clone());
            }
            if self.seen.insert(alert.id.clone()) {
                fresh.push(alert.clone());
            }
            match self
                .alerts
                .iter_mut()
                .find(|existing| existing.id == alert.id)
            {
                Some(existing) => *existing = alert,
                None => self.alerts.push(alert),
            }
        }

        let removed = if prune {
            let before = self.alerts.len();
            self.alerts.retain(|alert| fetched_ids.contains(&alert.id));
            before - self.alerts.len()
        } else {
            0
        };

        self.alerts
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.page_info = Some(page.info);
        self.last_error = None;
        (fresh, removed)
    }

    /// Flips one alert's read flag. Returns whether anything changed.
    fn set_read(&mut self, id: &AlertId, read: bool) -> bool {
        match self.alerts.iter_mut().find(|alert| &alert.id == id) {
            Some(alert) if alert.read != read => {
                alert.read = read;
                true
            }
            _ => false,
        }
    }

    /// Marks everything read, returning the ids that were unread before.
    fn mark_all_read(&mut self) -> Vec<AlertId> {
        let mut flipped = Vec::new();
        for alert in &mut self.alerts {
            if alert.is_unread() {
                alert.read = true;
                flipped.push(alert.id.clone());
            }
        }
        flipped
    }

    /// Reverts `read` for exactly the given ids; alerts that became read
    /// through other means are left untouched.
    fn set_unread(&mut self, ids: &[AlertId]) {
        for alert in &mut self.alerts {
            if ids.contains(&alert.id) {
                alert.read = false;
            }
        }
    }
}

/// Shared state the poll task and the engine handle both reach.
struct AlertSyncCore {
    api: Arc<dyn ApiService>,
    bus: EventBus,
    page_request: PageRequest,
    cache: RwLock<AlertCache>,
    /// Bumped on every start/stop; in-flight work compares its spawn-time
    /// value before committing results.
    epoch: AtomicU64,
}

impl AlertSyncCore {
    /// One poll tick: fetch the latest page, merge it under the cache lock,
    /// then toast each newly observed unread alert. The merge completes
    /// before any toast goes out, so a consumer reacting to a toast can
    /// already query the alert. Returns the newly observed ids.
    async fn poll_tick(
        &self,
        expected_epoch: Option<u64>,
        prune: bool,
    ) -> ApiResult<Vec<AlertId>> {
        let page = self.api.fetch_alerts(self.page_request).await?;

        let (fresh, removed) = {
            let mut cache = self.cache.write().expect("lock poisoned");
            if let Some(expected) = expected_epoch {
                if self.epoch.load(Ordering::SeqCst) != expected {
                    debug!("Discarding poll result from a stopped loop");
                    return Ok(Vec::new());
                }
            }
            cache.merge_page(page, prune)
        };

        if removed > 0 {
            debug!("Reconcile dropped {} alerts no longer on the server", removed);
        }

        let mut new_ids = Vec::with_capacity(fresh.len());
        for alert in &fresh {
            new_ids.push(alert.id.clone());
            if alert.is_unread() {
                self.bus.publish_toast(Toast::for_alert(alert));
            }
        }
        if !new_ids.is_empty() {
            self.bus.publish_alert(AlertEvent::NewAlerts {
                ids: new_ids.clone(),
            });
        }

        Ok(new_ids)
    }
}

/// Keeps a deduplicated local view of the remote alert stream and surfaces
/// changes as toasts and events.
///
/// The engine is handed out as a single owner; dropping it stops the poll
/// loop. Snapshots (`alerts`, `unread_count`, `page_info`) are cheap clones
/// taken under a short-lived lock.
pub struct AlertSyncEngine {
    core: Arc<AlertSyncCore>,
    poll_interval: RwLock<Duration>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for AlertSyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.core.cache.read().expect("lock poisoned");
        f.debug_struct("AlertSyncEngine")
            .field("cached_alerts", &cache.alerts.len())
            .field("seen", &cache.seen.len())
            .field("running", &self.is_running())
            .finish()
    }
}

impl AlertSyncEngine {
    pub fn new(api: Arc<dyn ApiService>, bus: EventBus) -> Self {
        Self::with_settings(
            api,
            bus,
            DEFAULT_ALERT_POLL_INTERVAL,
            PageRequest::default(),
        )
    }

    pub fn with_settings(
        api: Arc<dyn ApiService>,
        bus: EventBus,
        poll_interval: Duration,
        page_request: PageRequest,
    ) -> Self {
        Self {
            core: Arc::new(AlertSyncCore {
                api,
                bus,
                page_request,
                cache: RwLock::new(AlertCache::default()),
                epoch: AtomicU64::new(0),
            }),
            poll_interval: RwLock::new(poll_interval),
            poll_task: Mutex::new(None),
        }
    }

    pub fn from_config(
        api: Arc<dyn ApiService>,
        bus: EventBus,
        config: &ClientConfig,
    ) -> Self {
        Self::with_settings(
            api,
            bus,
            config.alert_poll_interval(),
            PageRequest::first(config.page_size),
        )
    }

    /// Fetch the latest page and replace the cache wholesale. Silent: no
    /// toasts, but every fetched id is recorded as observed so a later poll
    /// will not re-announce it. Failures land in [`Self::last_error`].
    pub async fn refresh(&self) -> ApiResult<()> {
        match self.core.api.fetch_alerts(self.core.page_request).await {
            Ok(page) => {
                let (total, unread) = {
                    let mut cache =
                        self.core.cache.write().expect("lock poisoned");
                    cache.replace_page(page)
                };
                debug!("Refreshed alerts: {} cached, {} unread", total, unread);
                self.core
                    .bus
                    .publish_alert(AlertEvent::Refreshed { total, unread });
                Ok(())
            }
            Err(error) => {
                warn!("Failed to refresh alerts: {}", error);
                self.core
                    .cache
                    .write()
                    .expect("lock poisoned")
                    .last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// One manual poll tick; the background loop runs exactly this. Returns
    /// the ids observed for the first time.
    pub async fn poll_once(&self) -> ApiResult<Vec<AlertId>> {
        self.core.poll_tick(None, false).await
    }

    /// Like a poll tick, but also drops cached alerts absent from the
    /// fetched page, so deleted or expired alerts do not accumulate
    /// forever. The fetched page is treated as the authoritative window.
    pub async fn reconcile(&self) -> ApiResult<Vec<AlertId>> {
        self.core.poll_tick(None, true).await
    }

    /// Optimistically mark one alert read and confirm with the server; on
    /// rejection the flag is restored and a failure toast is published.
    /// Identity-keyed: concurrent calls for different ids do not interfere.
    pub async fn mark_read(&self, id: &AlertId) -> ApiResult<()> {
        optimistic::commit(
            &self.core.cache,
            &self.core.bus,
            Toast::error("Update failed", "Could not mark notification as read"),
            |cache| cache.set_read(id, true),
            self.core.api.mark_alert_read(id),
            |cache, changed| {
                if changed {
                    cache.set_read(id, false);
                }
            },
        )
        .await?;

        self.core
            .bus
            .publish_alert(AlertEvent::MarkedRead { id: id.clone() });
        Ok(())
    }

    /// Optimistically mark everything read with one server call. On
    /// rejection, only the alerts that were unread at call time are
    /// restored; anything marked read through other means while the call
    /// was in flight is left alone.
    pub async fn mark_all_read(&self) -> ApiResult<usize> {
        let flipped = optimistic::commit(
            &self.core.cache,
            &self.core.bus,
            Toast::error(
                "Update failed",
                "Could not mark all notifications as read",
            ),
            |cache| cache.mark_all_read(),
            self.core.api.mark_all_alerts_read(),
            |cache, snapshot| cache.set_unread(&snapshot),
        )
        .await?;

        let count = flipped.len();
        self.core
            .bus
            .publish_alert(AlertEvent::MarkedAllRead { count });
        Ok(count)
    }

    /// Start the background poll loop. The first tick fires immediately,
    /// then every poll interval. Calling `start` while running restarts the
    /// loop.
    pub fn start(&self) {
        let epoch = self.core.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let poll_interval = *self.poll_interval.read().expect("lock poisoned");
        info!("Starting alert sync loop (every {:?})", poll_interval);

        let core = self.core.clone();
        let handle = tokio::spawn(async move {
            let mut interval = interval(poll_interval);
            loop {
                interval.tick().await;
                if core.epoch.load(Ordering::SeqCst) != epoch {
                    break;
                }
                match core.poll_tick(Some(epoch), false).await {
                    Ok(new_ids) if !new_ids.is_empty() => {
                        debug!("Poll merged {} new alerts", new_ids.len());
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Failed to poll alerts: {}", e);
                    }
                }
            }
        });

        let mut slot = self.poll_task.lock().expect("lock poisoned");
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    /// Stop the background poll loop. An in-flight fetch may complete but
    /// its result is discarded.
    pub fn stop(&self) {
        self.core.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.poll_task.lock().expect("lock poisoned").take()
        {
            task.abort();
            debug!("Stopped alert sync loop");
        }
    }

    /// Change the poll cadence. If the loop is running it is torn down and
    /// recreated with the new interval.
    pub fn set_poll_interval(&self, poll_interval: Duration) {
        *self.poll_interval.write().expect("lock poisoned") = poll_interval;
        let running = self.poll_task.lock().expect("lock poisoned").is_some();
        if running {
            debug!("Restarting alert sync loop every {:?}", poll_interval);
            self.stop();
            self.start();
        }
    }

    pub fn poll_interval(&self) -> Duration {
        *self.poll_interval.read().expect("lock poisoned")
    }

    pub fn is_running(&self) -> bool {
        self.poll_task
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Current cache snapshot, newest first.
    pub fn alerts(&self) -> Vec<Alert> {
        self.core
            .cache
            .read()
            .expect("lock poisoned")
            .alerts
            .clone()
    }

    pub fn unread_count(&self) -> usize {
        self.core
            .cache
            .read()
            .expect("lock poisoned")
            .alerts
            .iter()
            .filter(|alert| alert.is_unread())
            .count()
    }

    pub fn page_info(&self) -> Option<PageInfo> {
        self.core.cache.read().expect("lock poisoned").page_info
    }

    /// Error from the last explicit refresh, if it failed. Poll-loop
    /// failures are logged and swallowed instead of landing here.
    pub fn last_error(&self) -> Option<String> {
        self.core
            .cache
            .read()
            .expect("lock poisoned")
            .last_error
            .clone()
    }
}

impl Drop for AlertSyncEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
