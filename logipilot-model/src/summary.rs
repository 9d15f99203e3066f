use serde::{Deserialize, Serialize};

use crate::alert::Alert;
use crate::shipment::Shipment;

/// Headline counters for the dashboard landing screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_shipments: u64,
    pub in_transit: u64,
    pub delayed: u64,
    pub total_clients: u64,
    pub unread_alerts: u64,
}

/// One-call dashboard snapshot: counters plus short previews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub metrics: DashboardMetrics,
    pub recent_shipments: Vec<Shipment>,
    pub active_alerts: Vec<Alert>,
}
