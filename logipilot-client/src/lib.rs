//! # LogiPilot Client
//!
//! Client-side core for the LogiPilot logistics platform: talks to the REST
//! backend, keeps local snapshots fresh with background polling, and
//! broadcasts state changes so any frontend can subscribe without owning the
//! sync logic.
//!
//! ## Overview
//!
//! - [`ApiGateway`](gateway::ApiGateway): authenticated HTTP transport with
//!   bearer-token handling
//! - [`AlertSyncEngine`](sync::AlertSyncEngine): polls notifications, merges
//!   them into a cache, announces fresh ones exactly once
//! - [`ShipmentTracker`](sync::ShipmentTracker): follows one shipment's
//!   tracking record until it reaches a terminal status
//! - [`ShipmentsService`](resources::ShipmentsService) /
//!   [`ClientsService`](resources::ClientsService): paged CRUD with
//!   optimistic updates and rollback
//! - [`EventBus`]: broadcast channels for toasts and sync events
//! - [`mock::InMemoryApi`]: in-process backend double with seed data and a
//!   tracking simulator
//!
//! Everything that fetches goes through the [`ApiService`](api::ApiService)
//! trait, so the gateway and the mock are interchangeable.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use logipilot_client::mock::InMemoryApi;
//! use logipilot_client::{AlertSyncEngine, EventBus};
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(InMemoryApi::with_seed_data());
//!     let bus = EventBus::new(64);
//!     let mut toasts = bus.subscribe_toasts();
//!
//!     let alerts = AlertSyncEngine::new(api, bus.clone());
//!     alerts.refresh().await?;
//!     alerts.start();
//!
//!     while let Ok(toast) = toasts.recv().await {
//!         println!("{}: {}", toast.title, toast.body);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod mock;
pub mod optimistic;
pub mod resources;
pub mod sync;

pub use api::{ApiService, ClientFilter, ShipmentFilter};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use events::{AlertEvent, EventBus, Toast, ToastKind, TrackingEvent};
pub use gateway::ApiGateway;
pub use resources::{ClientsService, ShipmentsService};
pub use sync::{
    AlertSyncEngine, DEFAULT_ALERT_POLL_INTERVAL, DEFAULT_TRACKING_POLL_INTERVAL,
    ShipmentTracker,
};
