//! Background synchronization engines.
//!
//! Both engines follow the same shape: shared core state behind an `Arc`,
//! a tokio interval task doing the periodic work, and an epoch counter that
//! lets a stopped or restarted loop discard results from fetches it no
//! longer owns.

pub mod alerts;
pub mod tracker;

pub use alerts::{AlertSyncEngine, DEFAULT_ALERT_POLL_INTERVAL};
pub use tracker::{DEFAULT_TRACKING_POLL_INTERVAL, ShipmentTracker};
