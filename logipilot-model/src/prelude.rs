//! Consumer-focused snapshot of the types surface.
//! Prefer importing from this module instead of individual tree nodes when
//! working in logipilot-client or other presentation layers.

pub use super::alert::{Alert, AlertCategory, AlertSeverity};
pub use super::auth::{AuthSession, AuthToken, Credentials, SessionUser};
pub use super::client::{Client, ClientDraft, ClientStatus};
pub use super::envelope::ApiEnvelope;
pub use super::error::{ModelError, Result as ModelResult};
pub use super::ids::{AlertId, ClientId, ShipmentId};
pub use super::page::{DEFAULT_PAGE_SIZE, Page, PageInfo, PageRequest};
pub use super::search::{SearchKind, SearchResult};
pub use super::shipment::{Shipment, ShipmentDraft, ShipmentStatus};
pub use super::summary::{DashboardMetrics, DashboardSummary};
pub use super::tracking::{TrackingInfo, TrackingUpdate};
