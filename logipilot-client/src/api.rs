//! API service trait and the gateway-backed implementation.
//!
//! Engines and resource services consume this trait instead of touching
//! `ApiGateway` directly, so the in-memory source can stand in for the real
//! server per construction site.

use std::fmt::Debug;

use async_trait::async_trait;

use logipilot_model::{
    Alert, AlertId, ApiEnvelope, AuthSession, Client, ClientDraft, ClientId,
    ClientStatus, Credentials, DashboardSummary, Page, PageInfo, PageRequest,
    SearchResult, Shipment, ShipmentDraft, ShipmentId, ShipmentStatus,
    TrackingInfo,
};

use crate::error::{ApiError, ApiResult};
use crate::gateway::ApiGateway;

/// Server-side filters for shipment listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipmentFilter {
    /// Free-text match against id, client, origin and destination.
    pub query: Option<String>,
    pub status: Option<ShipmentStatus>,
    /// Restrict to one client's shipments (matched against the display
    /// name).
    pub client: Option<String>,
}

impl ShipmentFilter {
    fn query_pairs(&self, page: PageRequest) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", page.page.to_string()),
            ("page_size", page.page_size.to_string()),
        ];
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(client) = &self.client {
            pairs.push(("client", client.clone()));
        }
        pairs
    }
}

/// Server-side filters for client listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientFilter {
    /// Free-text match against name, company and email.
    pub query: Option<String>,
    pub status: Option<ClientStatus>,
}

impl ClientFilter {
    fn query_pairs(&self, page: PageRequest) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", page.page.to_string()),
            ("page_size", page.page_size.to_string()),
        ];
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// The REST surface the client core consumes.
#[async_trait]
pub trait ApiService: Send + Sync + Debug {
    // === Alerts ===

    /// One page of alerts, sorted by timestamp descending on the server.
    async fn fetch_alerts(&self, page: PageRequest) -> ApiResult<Page<Alert>>;

    async fn mark_alert_read(&self, id: &AlertId) -> ApiResult<()>;

    async fn mark_all_alerts_read(&self) -> ApiResult<()>;

    // === Tracking ===

    /// Tracking record for one shipment. An unknown id surfaces as
    /// [`ApiError::MissingData`].
    async fn fetch_tracking(
        &self,
        shipment_id: &ShipmentId,
    ) -> ApiResult<TrackingInfo>;

    // === Shipments ===

    async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Shipment>>;

    async fn get_shipment(&self, id: &ShipmentId) -> ApiResult<Shipment>;

    async fn create_shipment(&self, draft: &ShipmentDraft) -> ApiResult<Shipment>;

    async fn update_shipment(
        &self,
        id: &ShipmentId,
        draft: &ShipmentDraft,
    ) -> ApiResult<Shipment>;

    async fn delete_shipment(&self, id: &ShipmentId) -> ApiResult<()>;

    // === Clients ===

    async fn list_clients(
        &self,
        filter: &ClientFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Client>>;

    async fn get_client(&self, id: &ClientId) -> ApiResult<Client>;

    async fn create_client(&self, draft: &ClientDraft) -> ApiResult<Client>;

    async fn update_client(
        &self,
        id: &ClientId,
        draft: &ClientDraft,
    ) -> ApiResult<Client>;

    async fn delete_client(&self, id: &ClientId) -> ApiResult<()>;

    // === Cross-cutting ===

    /// Cross-entity search. Blank queries return empty without a round
    /// trip.
    async fn search(&self, query: &str) -> ApiResult<Vec<SearchResult>>;

    async fn fetch_summary(&self) -> ApiResult<DashboardSummary>;

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthSession>;
}

/// Pair an envelope's data with its pagination block, synthesizing the
/// block when the server omitted it.
fn envelope_page<T>(
    envelope: ApiEnvelope<Vec<T>>,
    request: PageRequest,
) -> ApiResult<Page<T>> {
    let items = envelope.data.ok_or(ApiError::MissingData)?;
    let info = envelope.pagination.unwrap_or_else(|| {
        PageInfo::for_total(request, items.len() as u64)
    });
    Ok(Page { items, info })
}

#[async_trait]
impl ApiService for ApiGateway {
    async fn fetch_alerts(&self, page: PageRequest) -> ApiResult<Page<Alert>> {
        let query = [
            ("page", page.page.to_string()),
            ("page_size", page.page_size.to_string()),
            ("sort_by", "timestamp".to_string()),
            ("order", "desc".to_string()),
        ];
        let envelope = self
            .get_envelope_with_query::<Vec<Alert>, _>("alerts", &query)
            .await?;
        envelope_page(envelope, page)
    }

    async fn mark_alert_read(&self, id: &AlertId) -> ApiResult<()> {
        self.put_no_content(&format!("alerts/{id}/read")).await
    }

    async fn mark_all_alerts_read(&self) -> ApiResult<()> {
        self.post_no_content("alerts/mark-all-read").await
    }

    async fn fetch_tracking(
        &self,
        shipment_id: &ShipmentId,
    ) -> ApiResult<TrackingInfo> {
        self.get(&format!("tracking/{shipment_id}")).await
    }

    async fn list_shipments(
        &self,
        filter: &ShipmentFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Shipment>> {
        let envelope = self
            .get_envelope_with_query::<Vec<Shipment>, _>(
                "shipments",
                &filter.query_pairs(page),
            )
            .await?;
        envelope_page(envelope, page)
    }

    async fn get_shipment(&self, id: &ShipmentId) -> ApiResult<Shipment> {
        self.get(&format!("shipments/{id}")).await
    }

    async fn create_shipment(&self, draft: &ShipmentDraft) -> ApiResult<Shipment> {
        self.post("shipments", draft).await
    }

    async fn update_shipment(
        &self,
        id: &ShipmentId,
        draft: &ShipmentDraft,
    ) -> ApiResult<Shipment> {
        self.put(&format!("shipments/{id}"), draft).await
    }

    async fn delete_shipment(&self, id: &ShipmentId) -> ApiResult<()> {
        self.delete_no_content(&format!("shipments/{id}")).await
    }

    async fn list_clients(
        &self,
        filter: &ClientFilter,
        page: PageRequest,
    ) -> ApiResult<Page<Client>> {
        let envelope = self
            .get_envelope_with_query::<Vec<Client>, _>(
                "clients",
                &filter.query_pairs(page),
            )
            .await?;
        envelope_page(envelope, page)
    }

    async fn get_client(&self, id: &ClientId) -> ApiResult<Client> {
        self.get(&format!("clients/{id}")).await
    }

    async fn create_client(&self, draft: &ClientDraft) -> ApiResult<Client> {
        self.post("clients", draft).await
    }

    async fn update_client(
        &self,
        id: &ClientId,
        draft: &ClientDraft,
    ) -> ApiResult<Client> {
        self.put(&format!("clients/{id}"), draft).await
    }

    async fn delete_client(&self, id: &ClientId) -> ApiResult<()> {
        self.delete_no_content(&format!("clients/{id}")).await
    }

    async fn search(&self, query: &str) -> ApiResult<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.get_with_query("search", &[("q", query)]).await
    }

    async fn fetch_summary(&self) -> ApiResult<DashboardSummary> {
        self.get("summary").await
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<AuthSession> {
        ApiGateway::login(self, credentials).await
    }
}
