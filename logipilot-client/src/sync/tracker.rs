//! Shipment tracking engine: follows one shipment at a time, polling its
//! tracking record until it reaches a terminal status.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

use logipilot_model::{ShipmentId, ShipmentStatus, TrackingInfo};

use crate::api::ApiService;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::events::{EventBus, Toast, TrackingEvent};

/// Default delay between tracking poll ticks.
pub const DEFAULT_TRACKING_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// Shown in place of the delivery estimate while a shipment is delayed.
const DELAYED_ETA_NOTICE: &str = "Delayed - Recalculating ETA";

#[derive(Debug, Default)]
struct TrackerState {
    shipment_id: Option<ShipmentId>,
    tracking: Option<TrackingInfo>,
    last_error: Option<String>,
}

/// What one applied fetch changed, computed inside the state lock and
/// published after it is released.
struct Applied {
    info: TrackingInfo,
    changed: bool,
    delayed: bool,
    completed: bool,
}

impl TrackerState {
    /// Merge a fetched record into the held snapshot: union the movement
    /// histories (deduplicated by timestamp, status and location), re-sort
    /// newest first, and detect status transitions. An unchanged record
    /// leaves the prior snapshot in place.
    fn absorb(&mut self, mut fetched: TrackingInfo) -> Applied {
        let previous_status = self.tracking.as_ref().map(|t| t.current_status);

        if let Some(previous) = &self.tracking {
            for update in &previous.updates {
                let duplicate = fetched.updates.iter().any(|candidate| {
                    candidate.timestamp == update.timestamp
                        && candidate.status == update.status
                        && candidate.location == update.location
                });
                if !duplicate {
                    fetched.updates.push(update.clone());
                }
            }
        }
        fetched
            .updates
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        if self.tracking.as_ref() == Some(&fetched) {
            return Applied {
                info: fetched,
                changed: false,
                delayed: false,
                completed: false,
            };
        }

        let delayed = previous_status
            .is_some_and(|status| status != ShipmentStatus::Delayed)
            && fetched.current_status == ShipmentStatus::Delayed;
        if delayed {
            fetched.estimated_delivery = DELAYED_ETA_NOTICE.to_string();
        }

        let applied = Applied {
            info: fetched.clone(),
            changed: true,
            delayed,
            completed: fetched.current_status.is_terminal(),
        };
        self.tracking = Some(fetched);
        self.last_error = None;
        applied
    }
}

struct TrackerCore {
    api: Arc<dyn ApiService>,
    bus: EventBus,
    state: RwLock<TrackerState>,
    /// Bumped by every `track`/`stop`; stale fetches compare against it
    /// before touching state, so no update from a previous shipment lands
    /// after a switch.
    epoch: AtomicU64,
}

impl TrackerCore {
    /// Fetch the tracking record and fold it into the held snapshot.
    /// Returns the post-merge record plus whether it was actually applied
    /// (a superseded epoch discards the result).
    async fn fetch_and_apply(
        &self,
        shipment_id: &ShipmentId,
        epoch: u64,
    ) -> ApiResult<(TrackingInfo, bool)> {
        let fetched = self.api.fetch_tracking(shipment_id).await?;

        let applied = {
            let mut state = self.state.write().expect("lock poisoned");
            if self.epoch.load(Ordering::SeqCst) != epoch {
                debug!(
                    "Discarding tracking result for {} from a superseded loop",
                    shipment_id
                );
                return Ok((fetched, false));
            }
            state.absorb(fetched)
        };

        if applied.changed {
            if applied.delayed {
                self.bus.publish_toast(Toast::warning(
                    format!("Shipment {} Delayed", shipment_id),
                    format!(
                        "New ETA might be affected. Current location: {}",
                        applied.info.current_location
                    ),
                ));
                self.bus.publish_tracking(TrackingEvent::Delayed {
                    shipment_id: shipment_id.clone(),
                });
            }
            self.bus.publish_tracking(TrackingEvent::Updated {
                info: applied.info.clone(),
            });
            if applied.completed {
                info!(
                    "Shipment {} reached {}, tracking finished",
                    shipment_id, applied.info.current_status
                );
                self.bus.publish_tracking(TrackingEvent::Completed {
                    shipment_id: shipment_id.clone(),
                    status: applied.info.current_status,
                });
            }
        }

        Ok((applied.info, true))
    }
}

/// Follows a single shipment's tracking record.
///
/// `track` fetches once and, while the status is non-terminal, keeps a poll
/// loop re-fetching in the background. Changed snapshots are republished as
/// [`TrackingEvent`]s; a transition into `Delayed` additionally raises one
/// warning toast. Reaching `Delivered` or `Cancelled` ends the loop.
pub struct ShipmentTracker {
    core: Arc<TrackerCore>,
    poll_interval: RwLock<Duration>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for ShipmentTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.core.state.read().expect("lock poisoned");
        f.debug_struct("ShipmentTracker")
            .field("shipment_id", &state.shipment_id)
            .field("active", &self.is_active())
            .finish()
    }
}

impl ShipmentTracker {
    pub fn new(api: Arc<dyn ApiService>, bus: EventBus) -> Self {
        Self::with_interval(api, bus, DEFAULT_TRACKING_POLL_INTERVAL)
    }

    pub fn with_interval(
        api: Arc<dyn ApiService>,
        bus: EventBus,
        poll_interval: Duration,
    ) -> Self {
        Self {
            core: Arc::new(TrackerCore {
                api,
                bus,
                state: RwLock::new(TrackerState::default()),
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
        Self::with_interval(api, bus, config.tracking_poll_interval())
    }

    /// Start following a shipment. Any previous loop is aborted before the
    /// new fetch, so no update from the old shipment lands after the
    /// switch. A missing tracking record surfaces as an error state, and no
    /// loop is started for a shipment already in a terminal status.
    pub async fn track(&self, shipment_id: ShipmentId) -> ApiResult<TrackingInfo> {
        let epoch = self.core.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = self.poll_task.lock().expect("lock poisoned").take() {
            previous.abort();
        }
        {
            let mut state = self.core.state.write().expect("lock poisoned");
            *state = TrackerState {
                shipment_id: Some(shipment_id.clone()),
                ..TrackerState::default()
            };
        }
        info!("Tracking shipment {}", shipment_id);

        match self.core.fetch_and_apply(&shipment_id, epoch).await {
            Ok((info, applied)) => {
                if applied && !info.is_terminal() {
                    self.spawn_loop(shipment_id, epoch);
                }
                Ok(info)
            }
            Err(error) => {
                warn!(
                    "Failed to fetch tracking for {}: {}",
                    shipment_id, error
                );
                let mut state = self.core.state.write().expect("lock poisoned");
                if self.core.epoch.load(Ordering::SeqCst) == epoch {
                    state.last_error = Some(error.to_string());
                }
                Err(error)
            }
        }
    }

    /// One manual fetch-and-merge for the tracked shipment; the background
    /// loop runs exactly this. Returns `None` when nothing is tracked.
    pub async fn poll_once(&self) -> ApiResult<Option<TrackingInfo>> {
        let Some(shipment_id) = self.shipment_id() else {
            return Ok(None);
        };
        let epoch = self.core.epoch.load(Ordering::SeqCst);
        let (info, _) = self.core.fetch_and_apply(&shipment_id, epoch).await?;
        Ok(Some(info))
    }

    fn spawn_loop(&self, shipment_id: ShipmentId, epoch: u64) {
        let poll_interval = *self.poll_interval.read().expect("lock poisoned");
        let core = self.core.clone();
        let handle = tokio::spawn(async move {
            let mut interval = interval(poll_interval);
            // The first tick completes immediately and the initial fetch
            // already covered it.
            interval.tick().await;
            loop {
                interval.tick().await;
                if core.epoch.load(Ordering::SeqCst) != epoch {
                    break;
                }
                match core.fetch_and_apply(&shipment_id, epoch).await {
                    Ok((_, false)) => break,
                    Ok((info, true)) => {
                        if info.is_terminal() {
                            break;
                        }
                    }
                    Err(error) => {
                        warn!(
                            "Failed to poll tracking for {}: {}",
                            shipment_id, error
                        );
                    }
                }
            }
        });

        let mut slot = self.poll_task.lock().expect("lock poisoned");
        if let Some(old) = slot.replace(handle) {
            old.abort();
        }
    }

    /// Stop polling but keep the last snapshot readable.
    pub fn stop(&self) {
        self.core.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(task) = self.poll_task.lock().expect("lock poisoned").take() {
            task.abort();
            debug!("Stopped tracking loop");
        }
    }

    /// Stop polling and forget the tracked shipment.
    pub fn clear(&self) {
        self.stop();
        let mut state = self.core.state.write().expect("lock poisoned");
        *state = TrackerState::default();
    }

    /// Change the poll cadence; a running loop is restarted with the new
    /// interval.
    pub fn set_poll_interval(&self, poll_interval: Duration) {
        *self.poll_interval.write().expect("lock poisoned") = poll_interval;
        if !self.is_active() {
            return;
        }
        let Some(shipment_id) = self.shipment_id() else {
            return;
        };
        debug!("Restarting tracking loop every {:?}", poll_interval);
        let epoch = self.core.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.spawn_loop(shipment_id, epoch);
    }

    pub fn poll_interval(&self) -> Duration {
        *self.poll_interval.read().expect("lock poisoned")
    }

    pub fn is_active(&self) -> bool {
        self.poll_task
            .lock()
            .expect("lock poisoned")
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Latest merged tracking snapshot, if a shipment is being followed.
    pub fn tracking(&self) -> Option<TrackingInfo> {
        self.core
            .state
            .read()
            .expect("lock poisoned")
            .tracking
            .clone()
    }

    pub fn shipment_id(&self) -> Option<ShipmentId> {
        self.core
            .state
            .read()
            .expect("lock poisoned")
            .shipment_id
            .clone()
    }

    /// Error from the last `track` call, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.core
            .state
            .read()
            .expect("lock poisoned")
            .last_error
            .clone()
    }
}

impl Drop for ShipmentTracker {
    fn drop(&mut self) {
        self.stop();
    }
}
