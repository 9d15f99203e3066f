//! Collection owner backing the in-memory data source.

use std::collections::HashMap;
use std::sync::RwLock;

use logipilot_model::{Alert, AlertId, Client, Shipment, ShipmentId, TrackingInfo};

use super::seed;

/// Owns the mock collections. Always constructed explicitly, one per
/// consumer, so parallel tests never share state through it.
#[derive(Debug, Default)]
pub struct MockStore {
    pub(super) alerts: RwLock<Vec<Alert>>,
    pub(super) shipments: RwLock<Vec<Shipment>>,
    pub(super) clients: RwLock<Vec<Client>>,
    /// Derived lazily from the shipment row on first fetch, then advanced
    /// by the simulator.
    pub(super) tracking: RwLock<HashMap<ShipmentId, TrackingInfo>>,
}

impl MockStore {
    /// A store with no records at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store pre-populated with the demo data set: shipments
    /// `SH001`..`SH008`, clients `CL001`..`CL005` and notifications
    /// `notif001`..`notif004`.
    pub fn with_seed_data() -> Self {
        let store = Self::empty();
        seed::populate(&store);
        store
    }

    pub fn push_alert(&self, alert: Alert) {
        self.alerts.write().expect("lock poisoned").push(alert);
    }

    /// Drop an alert as if it expired server-side. Returns whether it
    /// existed.
    pub fn remove_alert(&self, id: &AlertId) -> bool {
        let mut alerts = self.alerts.write().expect("lock poisoned");
        let before = alerts.len();
        alerts.retain(|alert| &alert.id != id);
        alerts.len() < before
    }

    pub fn push_shipment(&self, shipment: Shipment) {
        self.shipments
            .write()
            .expect("lock poisoned")
            .push(shipment);
    }

    pub fn push_client(&self, client: Client) {
        self.clients.write().expect("lock poisoned").push(client);
    }

    /// Replace a shipment's tracking record, bypassing lazy derivation.
    pub fn insert_tracking(&self, record: TrackingInfo) {
        self.tracking
            .write()
            .expect("lock poisoned")
            .insert(record.shipment_id.clone(), record);
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().expect("lock poisoned").clone()
    }

    pub fn shipments(&self) -> Vec<Shipment> {
        self.shipments.read().expect("lock poisoned").clone()
    }

    pub fn clients(&self) -> Vec<Client> {
        self.clients.read().expect("lock poisoned").clone()
    }

    pub fn tracking(&self, shipment_id: &ShipmentId) -> Option<TrackingInfo> {
        self.tracking
            .read()
            .expect("lock poisoned")
            .get(shipment_id)
            .cloned()
    }
}
