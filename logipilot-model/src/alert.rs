use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::AlertId;

/// Severity carried by every alert; drives toast styling downstream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
    Info,
    Success,
    Error,
}

impl AlertSeverity {
    pub fn all() -> [AlertSeverity; 7] {
        [
            AlertSeverity::Low,
            AlertSeverity::Medium,
            AlertSeverity::High,
            AlertSeverity::Critical,
            AlertSeverity::Info,
            AlertSeverity::Success,
            AlertSeverity::Error,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "Low",
            AlertSeverity::Medium => "Medium",
            AlertSeverity::High => "High",
            AlertSeverity::Critical => "Critical",
            AlertSeverity::Info => "Info",
            AlertSeverity::Success => "Success",
            AlertSeverity::Error => "Error",
        }
    }

    /// High-urgency severities warrant attention-grabbing presentation.
    pub fn is_urgent(&self) -> bool {
        matches!(
            self,
            AlertSeverity::High | AlertSeverity::Critical | AlertSeverity::Error
        )
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AlertSeverity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(AlertSeverity::Low),
            "Medium" => Ok(AlertSeverity::Medium),
            "High" => Ok(AlertSeverity::High),
            "Critical" => Ok(AlertSeverity::Critical),
            "Info" => Ok(AlertSeverity::Info),
            "Success" => Ok(AlertSeverity::Success),
            "Error" => Ok(AlertSeverity::Error),
            other => Err(ModelError::InvalidValue(format!(
                "unknown alert severity: {other}"
            ))),
        }
    }
}

/// Platform area an alert originates from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum AlertCategory {
    Shipment,
    Client,
    Fleet,
    Report,
    System,
}

impl AlertCategory {
    pub fn all() -> [AlertCategory; 5] {
        [
            AlertCategory::Shipment,
            AlertCategory::Client,
            AlertCategory::Fleet,
            AlertCategory::Report,
            AlertCategory::System,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::Shipment => "Shipment",
            AlertCategory::Client => "Client",
            AlertCategory::Fleet => "Fleet",
            AlertCategory::Report => "Report",
            AlertCategory::System => "System",
        }
    }
}

impl std::fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification alert as served by the platform.
///
/// Alerts are server-owned: the client never creates one, it only toggles
/// the `read` flag (optimistically, until the server confirms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    pub title: String,
    pub description: String,
    pub severity: AlertSeverity,
    pub category: AlertCategory,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// Optional in-app destination, e.g. `/shipments/SH001`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Alert {
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}
