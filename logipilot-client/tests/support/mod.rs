//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::broadcast;

use logipilot_client::api::{ApiService, ClientFilter, ShipmentFilter};
use logipilot_client::error::{ApiError, ApiResult};
use logipilot_client::mock::InMemoryApi;
use logipilot_model::{
    Alert, AlertCategory, AlertId, AlertSeverity, AuthSession, Client, ClientDraft,
    ClientId, ClientStatus, Credentials, DashboardSummary, Page, PageRequest,
    SearchResult, Shipment, ShipmentDraft, ShipmentId, ShipmentStatus,
    TrackingInfo,
};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per binary; `RUST_LOG` filters.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Pulls everything currently queued on a broadcast receiver without
/// waiting for more.
pub fn drain<T: Clone>(receiver: &mut broadcast::Receiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(item) = receiver.try_recv() {
        out.push(item);
    }
    out
}

pub fn make_alert(id: &str, minutes_ago: i64, read: bool) -> Alert {
    Alert {
        id: AlertId::new(id),
        title: format!("Alert {id}"),
        description: "Synthetic alert".to_string(),
        severity: AlertSeverity::Info,
        category: AlertCategory::System,
        timestamp: Utc::now() - Duration::minutes(minutes_ago),
        read,
        link: None,
    }
}

pub fn shipment_draft(client: &str) -> ShipmentDraft {
    ShipmentDraft {
        client: client.to_string(),
        status: ShipmentStatus::Pending,
        origin: "Warehouse 12".to_string(),
        destination: "Portland, OR".to_string(),
        carrier: "LogiFast Express".to_string(),
        tracking_number: None,
        weight_kg: Some(12.5),
        dimensions_cm: None,
        contents: Some("Replacement parts".to_string()),
        notes: None,
        eta: None,
    }
}

pub fn client_draft(name: &str) -> ClientDraft {
    ClientDraft {
        name: name.to_string(),
        email: format!(
            "contact@{}.test",
            name.to_lowercase().replace(' ', "-")
        ),
        phone: None,
        address: None,
        status: ClientStatus::Active,
        company_name: Some(format!("{name} Ltd.")),
        contact_person: None,
        industry: None,
        notes: None,
        satisfaction_score: None,
    }
}

/// Wraps an [`InMemoryApi`] and fails every call while tripped, so read
/// paths can be driven into their error branches.
#[derive(Debug)]
pub struct FlakyApi {
    inner: InMemoryApi,
    broken: AtomicBool,
}

impl FlakyApi {
    pub fn new(inner: InMemoryApi) -> Self {
        FlakyApi {
            inner,
            broken: AtomicBool::new(false),
        }
    }

    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &InMemoryApi {
        &self.inner
    }

    fn gate(&self) -> ApiResult<()> {
        if self.broken.load(Ordering::SeqCst) {
            Err(ApiError::http(500, "Internal server error"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ApiService for FlakyApi {
    async fn fetch_alerts(&self, page: PageRequest) -> ApiResult<Page<Alert>> {
        self.gate()?;
        self.inner.fetch_alerts(page).await
    }

    async fn mark_alert_read(&self, id: &AlertId) -> ApiResult<()> {
        self.gate()?;
        self.inner.mark_alert_read(id).await
    }

    async fn mark_all_alerts_read(&self) -> ApiResult<()> {
        self.gate()?;
        self.inner.mark_all_alerts_read().await
    }

    async fn fetch_tracking(
        &self,
        shipment_id: &ShipmentId,
    ) -> ApiResult<TrackingInfo> {
        self.gate()?;
        self.inner.fetch_tracking(shipment_id).await
    }

    async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Shipment>> {
        self.gate()?;
        self.inner.list_shipments(filter, page).await
    }

    async fn get_shipment(&self, id: &ShipmentId) -> ApiResult<Shipment> {
        self.gate()?;
        self.inner.get_shipment(id).await
    }

    async fn create_shipment(&self, draft: &ShipmentDraft) -> ApiResult<Shipment> {
        self.gate()?;
        self.inner.create_shipment(draft).await
    }

    async fn update_shipment(
        &self,
        id: &ShipmentId,
        draft: &ShipmentDraft,
    ) -> ApiResult<Shipment> {
        self.gate()?;
        self.inner.update_shipment(id, draft).await
    }

    async fn delete_shipment(&self, id: &ShipmentId) -> ApiResult<()> {
        self.gate()?;
        self.inner.delete_shipment(id).await
    }

    async fn list_clients(
        &self,
        filter: &ClientFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Client>> {
        self.gate()?;
        self.inner.list_clients(filter, page).await
    }

    async fn get_client(&self, id: &ClientId) -> ApiResult<Client> {
        self.gate()?;
        self.inner.get_client(id).await
    }

    async fn create_client(&self, draft: &ClientDraft) -> ApiResult<Client> {
        self.gate()?;
        self.inner.create_client(draft).await
    }

    async fn update_client(
        &self,
        id: &ClientId,
        draft: &ClientDraft,
    ) -> ApiResult<Client> {
        self.gate()?;
        self.inner.update_client(id, draft).await
    }

    async fn delete_client(&self, id: &ClientId) -> ApiResult<()> {
        self.gate()?;
        self.inner.delete_client(id).await
    }

    async fn search(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        self.gate()?;
        self.inner.search(query).await
    }

    async fn fetch_summary(&self) -> ApiResult<DashboardSummary> {
        self.gate()?;
        self.inner.fetch_summary().await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthSession> {
        self.gate()?;
        self.inner.login(credentials).await
    }
}
