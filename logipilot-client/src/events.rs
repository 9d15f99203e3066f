use std::fmt;

use tokio::sync::broadcast;

use logipilot_model::{Alert, AlertId, AlertSeverity, ShipmentId, ShipmentStatus, TrackingInfo};

/// Default broadcast capacity; slow subscribers past this lag and skip.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Visual weight of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient notification for the consumer to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub body: String,
    /// Optional in-app destination the toast should navigate to.
    pub link: Option<String>,
}

impl Toast {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Info,
            title: title.into(),
            body: body.into(),
            link: None,
        }
    }

    pub fn success(title: impl Into<String>, body: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            ..Toast::info(title, body)
        }
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Warning,
            ..Toast::info(title, body)
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            ..Toast::info(title, body)
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Toast presentation of a newly observed alert, severity mapped onto
    /// the matching toast kind and the alert link carried through.
    pub fn for_alert(alert: &Alert) -> Self {
        let kind = match alert.severity {
            AlertSeverity::Critical | AlertSeverity::High | AlertSeverity::Error => {
                ToastKind::Error
            }
            AlertSeverity::Medium => ToastKind::Warning,
            AlertSeverity::Success => ToastKind::Success,
            AlertSeverity::Low | AlertSeverity::Info => ToastKind::Info,
        };
        Toast {
            kind,
            title: alert.title.clone(),
            body: alert.description.clone(),
            link: alert.link.clone(),
        }
    }
}

/// State-change notifications from the alert engine.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertEvent {
    /// The cache was replaced by an explicit fetch.
    Refreshed { total: usize, unread: usize },
    /// A poll tick merged alerts that were not cached before.
    NewAlerts { ids: Vec<AlertId> },
    MarkedRead { id: AlertId },
    MarkedAllRead { count: usize },
}

/// State-change notifications from the tracking engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingEvent {
    /// A fetch produced a changed snapshot.
    Updated { info: TrackingInfo },
    /// The followed shipment transitioned into `Delayed`.
    Delayed { shipment_id: ShipmentId },
    /// The followed shipment reached a terminal status; polling stopped.
    Completed {
        shipment_id: ShipmentId,
        status: ShipmentStatus,
    },
}

/// Lightweight in-process event bus that fans engine notifications out to
/// whatever front end is attached. Consumers subscribe to receivers instead
/// of registering callbacks, which keeps the wiring flexible if a push
/// transport ever replaces polling.
#[derive(Clone)]
pub struct EventBus {
    toast_sender: broadcast::Sender<Toast>,
    alert_sender: broadcast::Sender<AlertEvent>,
    tracking_sender: broadcast::Sender<TrackingEvent>,
    capacity: usize,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.capacity)
            .field("toast_subscribers", &self.toast_sender.receiver_count())
            .field("alert_subscribers", &self.alert_sender.receiver_count())
            .field(
                "tracking_subscribers",
                &self.tracking_sender.receiver_count(),
            )
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (toast_sender, _) = broadcast::channel(capacity);
        let (alert_sender, _) = broadcast::channel(capacity);
        let (tracking_sender, _) = broadcast::channel(capacity);
        Self {
            toast_sender,
            alert_sender,
            tracking_sender,
            capacity,
        }
    }

    pub fn from_config(config: &crate::config::ClientConfig) -> Self {
        Self::new(config.toast_channel_capacity)
    }

    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Toast> {
        self.toast_sender.subscribe()
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<AlertEvent> {
        self.alert_sender.subscribe()
    }

    pub fn subscribe_tracking(&self) -> broadcast::Receiver<TrackingEvent> {
        self.tracking_sender.subscribe()
    }

    /// Publishing never blocks; events with no subscribers are dropped.
    pub fn publish_toast(&self, toast: Toast) {
        let _ = self.toast_sender.send(toast);
    }

    pub fn publish_alert(&self, event: AlertEvent) {
        let _ = self.alert_sender.send(event);
    }

    pub fn publish_tracking(&self, event: TrackingEvent) {
        let _ = self.tracking_sender.send(event);
    }
}
