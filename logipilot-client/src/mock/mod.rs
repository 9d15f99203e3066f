//! In-memory stand-in for the remote server.
//!
//! [`InMemoryApi`] implements [`ApiService`](crate::api::ApiService) against
//! a process-local [`MockStore`], so the sync engines and resource services
//! run unchanged with no backend. The demo seed data, tracking simulation,
//! and failure injection live here.

mod api;
mod seed;
mod store;

pub use api::{DEMO_EMAIL, DEMO_PASSWORD, InMemoryApi};
pub use store::MockStore;
