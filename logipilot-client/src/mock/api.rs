//! `ApiService` implementation backed by a [`MockStore`].
//!
//! Behaves like the hosted demo backend: same demo credentials, same
//! response shapes, and server-side tracking simulation. Failure injection
//! (`fail_writes`) makes every mutating endpoint reject so rollback paths
//! can be exercised.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::debug;
use uuid::Uuid;

use logipilot_model::{
    Alert, AlertCategory, AlertId, AlertSeverity, AuthSession, Client, ClientDraft,
    ClientId, Credentials, DashboardMetrics, DashboardSummary, Page, PageInfo,
    PageRequest, SearchKind, SearchResult, SessionUser, Shipment, ShipmentDraft,
    ShipmentId, ShipmentStatus, TrackingInfo, TrackingUpdate,
};

use crate::api::{ApiService, ClientFilter, ShipmentFilter};
use crate::error::{ApiError, ApiResult};

use super::store::MockStore;

/// Email accepted by [`InMemoryApi::login`].
pub const DEMO_EMAIL: &str = "admin@logipilot.com";
/// Password accepted by [`InMemoryApi::login`].
pub const DEMO_PASSWORD: &str = "admin123";

const MOCK_LOCATIONS: [&str; 8] = [
    "City A Sorting Facility",
    "In transit between City A and City B",
    "City B Hub",
    "Out for delivery from City B Hub",
    "Regional Hub C",
    "Crossing State Line X to Y",
    "Customs Checkpoint Alpha",
    "Delayed at Junction Z due to weather",
];

const ALERT_TITLES: [&str; 5] = [
    "New Urgent Shipment",
    "Fleet Update",
    "Client Message Received",
    "Task Overdue",
    "System Alert",
];

const ALERT_DESCRIPTIONS: [&str; 5] = [
    "Requires immediate attention.",
    "Vehicle TRK-101 needs maintenance.",
    "From 'Beta Solutions' regarding order #12345.",
    "Follow up on report REP005.",
    "High CPU usage detected on server EU-WEST-1.",
];

const ALERT_SEVERITIES: [AlertSeverity; 5] = [
    AlertSeverity::High,
    AlertSeverity::Medium,
    AlertSeverity::Info,
    AlertSeverity::Error,
    AlertSeverity::Success,
];

const ALERT_CATEGORIES: [AlertCategory; 5] = [
    AlertCategory::Shipment,
    AlertCategory::Fleet,
    AlertCategory::Client,
    AlertCategory::Report,
    AlertCategory::System,
];

/// How tracking records move between fetches.
#[derive(Debug)]
enum TrackingSimulation {
    /// Records never move on their own.
    Frozen,
    /// Each fetch may append a synthetic movement update.
    Random,
    /// Fetches consume a fixed status sequence; an exhausted script stops
    /// moving. Deterministic, for tests.
    Scripted(VecDeque<ShipmentStatus>),
}

struct SimulationStep {
    status: ShipmentStatus,
    location: &'static str,
}

/// In-memory stand-in for the remote server.
///
/// Constructed per consumer around an explicit [`MockStore`]; two instances
/// never share state. Tracking simulation defaults to [random
/// movement](Self::randomize_tracking); tests usually
/// [freeze](Self::freeze_tracking) or [script](Self::script_tracking) it.
#[derive(Debug)]
pub struct InMemoryApi {
    store: MockStore,
    fail_writes: AtomicBool,
    simulation: Mutex<TrackingSimulation>,
    latency: RwLock<Option<Duration>>,
}

impl InMemoryApi {
    pub fn new(store: MockStore) -> Self {
        Self {
            store,
            fail_writes: AtomicBool::new(false),
            simulation: Mutex::new(TrackingSimulation::Random),
            latency: RwLock::new(None),
        }
    }

    /// No records at all.
    pub fn empty() -> Self {
        Self::new(MockStore::empty())
    }

    /// Pre-populated with the demo data set.
    pub fn with_seed_data() -> Self {
        Self::new(MockStore::with_seed_data())
    }

    pub fn store(&self) -> &MockStore {
        &self.store
    }

    /// When set, every mutating endpoint rejects with an HTTP 503-shaped
    /// error. Reads keep working.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Artificial response delay on every endpoint, for demo realism.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().expect("lock poisoned") = latency;
    }

    /// Stop tracking records from moving between fetches.
    pub fn freeze_tracking(&self) {
        *self.simulation.lock().expect("lock poisoned") = TrackingSimulation::Frozen;
    }

    /// Restore the default random movement.
    pub fn randomize_tracking(&self) {
        *self.simulation.lock().expect("lock poisoned") = TrackingSimulation::Random;
    }

    /// Make the next tracking fetches walk through `statuses` in order,
    /// one status per fetch. After the script runs out, records stop
    /// moving.
    pub fn script_tracking(
        &self,
        statuses: impl IntoIterator<Item = ShipmentStatus>,
    ) {
        *self.simulation.lock().expect("lock poisoned") =
            TrackingSimulation::Scripted(statuses.into_iter().collect());
    }

    /// Add an alert to the store as if the server had raised it.
    pub fn push_alert(&self, alert: Alert) {
        self.store.push_alert(alert);
    }

    /// Raise a randomly composed unread alert and return a copy.
    pub fn generate_alert(&self) -> Alert {
        let mut rng = rand::rng();
        let alert = Alert {
            id: AlertId::new(format!("notif{}", mock_suffix())),
            title: ALERT_TITLES[rng.random_range(0..ALERT_TITLES.len())].to_string(),
            description: ALERT_DESCRIPTIONS
                [rng.random_range(0..ALERT_DESCRIPTIONS.len())]
            .to_string(),
            severity: ALERT_SEVERITIES[rng.random_range(0..ALERT_SEVERITIES.len())],
            category: ALERT_CATEGORIES[rng.random_range(0..ALERT_CATEGORIES.len())],
            timestamp: Utc::now(),
            read: false,
            link: rng.random_bool(0.5).then(|| "/dashboard".to_string()),
        };
        debug!("Mock API raised alert {}", alert.id);
        self.store.push_alert(alert.clone());
        alert
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.read().expect("lock poisoned");
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn write_gate(&self) -> ApiResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(ApiError::http(503, "Service temporarily unavailable"))
        } else {
            Ok(())
        }
    }

    /// Next synthetic movement for a non-terminal record, if the current
    /// simulation mode produces one.
    fn next_step(&self, record: &TrackingInfo) -> Option<SimulationStep> {
        let mut simulation = self.simulation.lock().expect("lock poisoned");
        match &mut *simulation {
            TrackingSimulation::Frozen => None,
            TrackingSimulation::Random => {
                let mut rng = rand::rng();
                let status = if rng.random::<f64>() > 0.8 {
                    ShipmentStatus::Delayed
                } else if record.current_status == ShipmentStatus::Processing {
                    ShipmentStatus::InTransit
                } else {
                    record.current_status
                };
                Some(SimulationStep {
                    status,
                    location: MOCK_LOCATIONS
                        [rng.random_range(0..MOCK_LOCATIONS.len())],
                })
            }
            TrackingSimulation::Scripted(script) => {
                let status = script.pop_front()?;
                Some(SimulationStep {
                    status,
                    location: MOCK_LOCATIONS
                        [record.updates.len() % MOCK_LOCATIONS.len()],
                })
            }
        }
    }
}

#[async_trait]
impl ApiService for InMemoryApi {
    async fn fetch_alerts(&self, page: PageRequest) -> ApiResult<Page<Alert>> {
        self.simulate_latency().await;
        let mut alerts = self.store.alerts();
        alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(paginate(alerts, page))
    }

    async fn mark_alert_read(&self, id: &AlertId) -> ApiResult<()> {
        self.simulate_latency().await;
        self.write_gate()?;
        let mut alerts = self.store.alerts.write().expect("lock poisoned");
        match alerts.iter_mut().find(|alert| &alert.id == id) {
            Some(alert) => {
                alert.read = true;
                Ok(())
            }
            None => Err(ApiError::http(404, "Alert not found")),
        }
    }

    async fn mark_all_alerts_read(&self) -> ApiResult<()> {
        self.simulate_latency().await;
        self.write_gate()?;
        let mut alerts = self.store.alerts.write().expect("lock poisoned");
        for alert in alerts.iter_mut() {
            alert.read = true;
        }
        Ok(())
    }

    async fn fetch_tracking(
        &self,
        shipment_id: &ShipmentId,
    ) -> ApiResult<TrackingInfo> {
        self.simulate_latency().await;
        let shipment = self
            .store
            .shipments
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|shipment| &shipment.id == shipment_id)
            .cloned()
            .ok_or(ApiError::MissingData)?;

        let mut tracking = self.store.tracking.write().expect("lock poisoned");
        let record = tracking
            .entry(shipment_id.clone())
            .or_insert_with(|| initial_tracking(&shipment));

        // Terminal records never move, regardless of simulation mode.
        if !record.is_terminal() {
            if let Some(step) = self.next_step(record) {
                advance(record, step, Utc::now());
            }
        }
        Ok(record.clone())
    }

    async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Shipment>> {
        self.simulate_latency().await;
        let mut rows = self.store.shipments();
        if let Some(query) = filter.query.as_deref().map(str::to_lowercase) {
            rows.retain(|row| {
                row.id.as_str().to_lowercase().contains(&query)
                    || row.client.to_lowercase().contains(&query)
                    || row.destination.to_lowercase().contains(&query)
                    || row.origin.to_lowercase().contains(&query)
            });
        }
        if let Some(status) = filter.status {
            rows.retain(|row| row.status == status);
        }
        if let Some(client) = &filter.client {
            rows.retain(|row| row.client.eq_ignore_ascii_case(client));
        }
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(rows, page))
    }

    async fn get_shipment(&self, id: &ShipmentId) -> ApiResult<Shipment> {
        self.simulate_latency().await;
        self.store
            .shipments
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|row| &row.id == id)
            .cloned()
            .ok_or(ApiError::MissingData)
    }

    async fn create_shipment(&self, draft: &ShipmentDraft) -> ApiResult<Shipment> {
        self.simulate_latency().await;
        self.write_gate()?;
        let id = ShipmentId::new(format!("SH{}", mock_suffix().to_uppercase()));
        let created = draft.clone().into_shipment(id, Utc::now());
        debug!("Mock API created shipment {}", created.id);
        self.store
            .shipments
            .write()
            .expect("lock poisoned")
            .insert(0, created.clone());
        Ok(created)
    }

    async fn update_shipment(
        &self,
        id: &ShipmentId,
        draft: &ShipmentDraft,
    ) -> ApiResult<Shipment> {
        self.simulate_latency().await;
        self.write_gate()?;
        let mut rows = self.store.shipments.write().expect("lock poisoned");
        match rows.iter_mut().find(|row| &row.id == id) {
            Some(row) => {
                *row = draft.clone().apply_to(row, Utc::now());
                Ok(row.clone())
            }
            None => Err(ApiError::http(404, "Shipment not found")),
        }
    }

    async fn delete_shipment(&self, id: &ShipmentId) -> ApiResult<()> {
        self.simulate_latency().await;
        self.write_gate()?;
        let mut rows = self.store.shipments.write().expect("lock poisoned");
        match rows.iter().position(|row| &row.id == id) {
            Some(index) => {
                rows.remove(index);
                self.store
                    .tracking
                    .write()
                    .expect("lock poisoned")
                    .remove(id);
                Ok(())
            }
            None => Err(ApiError::http(404, "Shipment not found")),
        }
    }

    async fn list_clients(
        &self,
        filter: &ClientFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Client>> {
        self.simulate_latency().await;
        let mut rows = self.store.clients();
        if let Some(query) = filter.query.as_deref().map(str::to_lowercase) {
            rows.retain(|row| {
                row.id.as_str().to_lowercase().contains(&query)
                    || row.name.to_lowercase().contains(&query)
                    || row
                        .company_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&query))
                    || row.email.to_lowercase().contains(&query)
            });
        }
        if let Some(status) = filter.status {
            rows.retain(|row| row.status == status);
        }
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(rows, page))
    }

    async fn get_client(&self, id: &ClientId) -> ApiResult<Client> {
        self.simulate_latency().await;
        self.store
            .clients
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|row| &row.id == id)
            .cloned()
            .ok_or(ApiError::MissingData)
    }

    async fn create_client(&self, draft: &ClientDraft) -> ApiResult<Client> {
        self.simulate_latency().await;
        self.write_gate()?;
        let id = ClientId::new(format!("CL{}", mock_suffix().to_uppercase()));
        let mut created = draft.clone().into_client(id, Utc::now());
        if created.satisfaction_score.is_none() {
            // New accounts start with a plausible score.
            created.satisfaction_score =
                Some(rand::rng().random_range(70..100) as f64);
        }
        debug!("Mock API created client {}", created.id);
        self.store
            .clients
            .write()
            .expect("lock poisoned")
            .insert(0, created.clone());
        Ok(created)
    }

    async fn update_client(
        &self,
        id: &ClientId,
        draft: &ClientDraft,
    ) -> ApiResult<Client> {
        self.simulate_latency().await;
        self.write_gate()?;
        let mut rows = self.store.clients.write().expect("lock poisoned");
        match rows.iter_mut().find(|row| &row.id == id) {
            Some(row) => {
                *row = draft.clone().apply_to(row, Utc::now());
                Ok(row.clone())
            }
            None => Err(ApiError::http(404, "Client not found")),
        }
    }

    async fn delete_client(&self, id: &ClientId) -> ApiResult<()> {
        self.simulate_latency().await;
        self.write_gate()?;
        let mut rows = self.store.clients.write().expect("lock poisoned");
        match rows.iter().position(|row| &row.id == id) {
            Some(index) => {
                rows.remove(index);
                Ok(())
            }
            None => Err(ApiError::http(404, "Client not found")),
        }
    }

    async fn search(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.simulate_latency().await;

        let mut results = Vec::new();
        for shipment in self.store.shipments() {
            if shipment.id.as_str().to_lowercase().contains(&query)
                || shipment.client.to_lowercase().contains(&query)
                || shipment.origin.to_lowercase().contains(&query)
                || shipment.destination.to_lowercase().contains(&query)
            {
                results.push(SearchResult {
                    kind: SearchKind::Shipment,
                    id: shipment.id.as_str().to_string(),
                    label: format!("Shipment {}", shipment.id),
                    snippet: Some(format!(
                        "{} to {} ({})",
                        shipment.origin, shipment.destination, shipment.status
                    )),
                });
            }
        }
        for client in self.store.clients() {
            if client.id.as_str().to_lowercase().contains(&query)
                || client.name.to_lowercase().contains(&query)
                || client
                    .company_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&query))
                || client.email.to_lowercase().contains(&query)
            {
                results.push(SearchResult {
                    kind: SearchKind::Client,
                    id: client.id.as_str().to_string(),
                    label: client.name.clone(),
                    snippet: client.company_name.clone(),
                });
            }
        }
        Ok(results)
    }

    async fn fetch_summary(&self) -> ApiResult<DashboardSummary> {
        self.simulate_latency().await;
        let shipments = self.store.shipments();
        let clients = self.store.clients();
        let alerts = self.store.alerts();

        let metrics = DashboardMetrics {
            total_shipments: shipments.len() as u64,
            in_transit: shipments
                .iter()
                .filter(|row| row.status == ShipmentStatus::InTransit)
                .count() as u64,
            delayed: shipments
                .iter()
                .filter(|row| row.status == ShipmentStatus::Delayed)
                .count() as u64,
            total_clients: clients.len() as u64,
            unread_alerts: alerts.iter().filter(|alert| alert.is_unread()).count()
                as u64,
        };

        let mut recent_shipments = shipments;
        recent_shipments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent_shipments.truncate(4);

        let mut active_alerts: Vec<Alert> =
            alerts.into_iter().filter(|alert| alert.is_unread()).collect();
        active_alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        active_alerts.truncate(5);

        Ok(DashboardSummary {
            metrics,
            recent_shipments,
            active_alerts,
        })
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthSession> {
        self.simulate_latency().await;
        if credentials.email != DEMO_EMAIL || credentials.password != DEMO_PASSWORD {
            return Err(ApiError::http(401, "Incorrect email or password"));
        }
        Ok(AuthSession {
            access_token: format!("mock-token-{}", Uuid::new_v4().simple()),
            token_type: "bearer".to_string(),
            user: SessionUser {
                id: 1,
                email: credentials.email.clone(),
                full_name: Some("Admin User".to_string()),
                role: Some("admin".to_string()),
            },
        })
    }
}

/// First tracking record for a shipment, synthesized from the row itself.
fn initial_tracking(shipment: &Shipment) -> TrackingInfo {
    let current_location = match shipment.status {
        ShipmentStatus::Pending | ShipmentStatus::Processing => {
            shipment.origin.clone()
        }
        ShipmentStatus::Delivered | ShipmentStatus::Cancelled => {
            shipment.destination.clone()
        }
        _ => format!(
            "In transit between {} and {}",
            shipment.origin, shipment.destination
        ),
    };
    let estimated_delivery = match (shipment.status, shipment.eta) {
        (ShipmentStatus::Delivered, _) => "Completed".to_string(),
        (ShipmentStatus::Cancelled, _) => "Cancelled".to_string(),
        (_, Some(eta)) => eta.format("%Y-%m-%d").to_string(),
        (_, None) => "Pending ETA".to_string(),
    };
    TrackingInfo {
        shipment_id: shipment.id.clone(),
        origin: shipment.origin.clone(),
        destination: shipment.destination.clone(),
        current_status: shipment.status,
        current_location: current_location.clone(),
        estimated_delivery,
        updates: vec![TrackingUpdate {
            timestamp: shipment.updated_at,
            status: shipment.status,
            location: current_location,
            notes: None,
        }],
        carrier: Some(shipment.carrier.clone()),
        tracking_number: shipment.tracking_number.clone(),
    }
}

/// Append one synthetic movement update and move the record's head state.
fn advance(record: &mut TrackingInfo, step: SimulationStep, now: DateTime<Utc>) {
    let location = if step.status.is_terminal() {
        record.destination.clone()
    } else {
        step.location.to_string()
    };
    let notes = match step.status {
        ShipmentStatus::Delayed => "Unexpected delay encountered.",
        ShipmentStatus::Delivered => "Delivered successfully.",
        ShipmentStatus::Cancelled => "Shipment cancelled.",
        _ => "Shipment moving as expected.",
    };
    record.updates.insert(
        0,
        TrackingUpdate {
            timestamp: now,
            status: step.status,
            location: location.clone(),
            notes: Some(notes.to_string()),
        },
    );
    record.current_status = step.status;
    record.current_location = location;
}

fn paginate<T: Clone>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let start = request.offset().min(items.len());
    let end = (start + request.page_size as usize).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        info: PageInfo::for_total(request, total),
    }
}

fn mock_suffix() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..6].to_string()
}
