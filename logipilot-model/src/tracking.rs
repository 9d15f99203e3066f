use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ShipmentId;
use crate::shipment::ShipmentStatus;

/// One entry in a shipment's movement history, newest first on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingUpdate {
    pub timestamp: DateTime<Utc>,
    pub status: ShipmentStatus,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Point-in-time tracking record for a single shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfo {
    pub shipment_id: ShipmentId,
    pub origin: String,
    pub destination: String,
    pub current_status: ShipmentStatus,
    pub current_location: String,
    /// Free text: a date estimate, or a recalculation notice while the
    /// shipment is delayed.
    pub estimated_delivery: String,
    pub updates: Vec<TrackingUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl TrackingInfo {
    pub fn is_terminal(&self) -> bool {
        self.current_status.is_terminal()
    }

    /// Most recent movement entry, if any. Updates are kept newest first.
    pub fn latest_update(&self) -> Option<&TrackingUpdate> {
        self.updates.first()
    }
}
