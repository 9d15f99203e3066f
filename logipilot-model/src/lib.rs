//! Core data model definitions shared across LogiPilot crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod alert;
pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod page;
pub mod prelude;
pub mod search;
pub mod shipment;
pub mod summary;
pub mod tracking;

// Intentionally curated re-exports for downstream consumers.
pub use alert::{Alert, AlertCategory, AlertSeverity};
pub use auth::{AuthSession, AuthToken, Credentials, SessionUser};
pub use client::{Client, ClientDraft, ClientStatus};
pub use envelope::ApiEnvelope;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{AlertId, ClientId, ShipmentId};
pub use page::{DEFAULT_PAGE_SIZE, Page, PageInfo, PageRequest};
pub use search::{SearchKind, SearchResult};
pub use shipment::{Shipment, ShipmentDraft, ShipmentStatus};
pub use summary::{DashboardMetrics, DashboardSummary};
pub use tracking::{TrackingInfo, TrackingUpdate};
