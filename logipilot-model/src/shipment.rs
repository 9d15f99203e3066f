use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::ShipmentId;

/// Lifecycle status of a shipment.
///
/// `Delivered` and `Cancelled` are terminal: the server never moves a
/// shipment out of them, and tracking loops stop once they are reached.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum ShipmentStatus {
    Pending,
    Processing,
    #[serde(rename = "In Transit")]
    InTransit,
    Delivered,
    Delayed,
    Cancelled,
}

impl ShipmentStatus {
    pub fn all() -> [ShipmentStatus; 6] {
        [
            ShipmentStatus::Pending,
            ShipmentStatus::Processing,
            ShipmentStatus::InTransit,
            ShipmentStatus::Delivered,
            ShipmentStatus::Delayed,
            ShipmentStatus::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "Pending",
            ShipmentStatus::Processing => "Processing",
            ShipmentStatus::InTransit => "In Transit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Delayed => "Delayed",
            ShipmentStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ShipmentStatus::Delivered | ShipmentStatus::Cancelled)
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ShipmentStatus::Pending),
            "Processing" => Ok(ShipmentStatus::Processing),
            "In Transit" => Ok(ShipmentStatus::InTransit),
            "Delivered" => Ok(ShipmentStatus::Delivered),
            "Delayed" => Ok(ShipmentStatus::Delayed),
            "Cancelled" => Ok(ShipmentStatus::Cancelled),
            other => Err(ModelError::InvalidValue(format!(
                "unknown shipment status: {other}"
            ))),
        }
    }
}

/// A shipment record as served by the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    pub id: ShipmentId,
    /// Display name of the owning client.
    pub client: String,
    pub status: ShipmentStatus,
    pub origin: String,
    pub destination: String,
    pub carrier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions_cm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shipment {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Create/update payload for a shipment; the server assigns id and
/// timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentDraft {
    pub client: String,
    pub status: ShipmentStatus,
    pub origin: String,
    pub destination: String,
    pub carrier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions_cm: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<NaiveDate>,
}

impl ShipmentDraft {
    /// Materializes the draft into a full record with server-side fields
    /// filled in. Used by in-memory sources; a real backend does this on its
    /// side.
    pub fn into_shipment(self, id: ShipmentId, now: DateTime<Utc>) -> Shipment {
        Shipment {
            id,
            client: self.client,
            status: self.status,
            origin: self.origin,
            destination: self.destination,
            carrier: self.carrier,
            tracking_number: self.tracking_number,
            weight_kg: self.weight_kg,
            dimensions_cm: self.dimensions_cm,
            contents: self.contents,
            notes: self.notes,
            eta: self.eta,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the draft over an existing record, preserving identity and
    /// creation time.
    pub fn apply_to(self, existing: &Shipment, now: DateTime<Utc>) -> Shipment {
        Shipment {
            id: existing.id.clone(),
            client: self.client,
            status: self.status,
            origin: self.origin,
            destination: self.destination,
            carrier: self.carrier,
            tracking_number: self.tracking_number,
            weight_kg: self.weight_kg,
            dimensions_cm: self.dimensions_cm,
            contents: self.contents,
            notes: self.notes,
            eta: self.eta,
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

impl From<&Shipment> for ShipmentDraft {
    fn from(shipment: &Shipment) -> Self {
        ShipmentDraft {
            client: shipment.client.clone(),
            status: shipment.status,
            origin: shipment.origin.clone(),
            destination: shipment.destination.clone(),
            carrier: shipment.carrier.clone(),
            tracking_number: shipment.tracking_number.clone(),
            weight_kg: shipment.weight_kg,
            dimensions_cm: shipment.dimensions_cm.clone(),
            contents: shipment.contents.clone(),
            notes: shipment.notes.clone(),
            eta: shipment.eta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_transit_wire_spelling() {
        let json = serde_json::to_string(&ShipmentStatus::InTransit).unwrap();
        assert_eq!(json, "\"In Transit\"");

        let parsed: ShipmentStatus =
            serde_json::from_str("\"In Transit\"").unwrap();
        assert_eq!(parsed, ShipmentStatus::InTransit);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ShipmentStatus::Delivered.is_terminal());
        assert!(ShipmentStatus::Cancelled.is_terminal());
        assert!(!ShipmentStatus::Delayed.is_terminal());
        assert!(!ShipmentStatus::InTransit.is_terminal());
    }

    #[test]
    fn test_status_round_trips_as_str() {
        for status in ShipmentStatus::all() {
            let parsed: ShipmentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
