//! Paginated shipment listing with optimistic edit and delete.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, info, warn};

use logipilot_model::{PageInfo, PageRequest, Shipment, ShipmentDraft, ShipmentId};

use crate::api::{ApiService, ShipmentFilter};
use crate::error::ApiResult;
use crate::events::{EventBus, Toast};
use crate::optimistic;

#[derive(Debug, Default)]
struct ShipmentsState {
    items: Vec<Shipment>,
    page_info: Option<PageInfo>,
    filter: ShipmentFilter,
    last_request: PageRequest,
    last_error: Option<String>,
}

/// Cached view of one page of shipments, with create/update/delete.
///
/// `load` replaces the page and its [`PageInfo`] wholesale. `update` and
/// `remove` mutate the cached row first and confirm with the server after;
/// a rejection restores the row and raises a failure toast.
#[derive(Debug)]
pub struct ShipmentsService {
    api: Arc<dyn ApiService>,
    bus: EventBus,
    state: RwLock<ShipmentsState>,
}

impl ShipmentsService {
    pub fn new(api: Arc<dyn ApiService>, bus: EventBus) -> Self {
        Self {
            api,
            bus,
            state: RwLock::new(ShipmentsState::default()),
        }
    }

    /// Fetch a page under the current filter and replace the cached one.
    /// On failure the cache is cleared and the error is kept readable.
    pub async fn load(&self, request: PageRequest) -> ApiResult<()> {
        let filter = self.state.read().expect("lock poisoned").filter.clone();
        match self.api.list_shipments(&filter, request).await {
            Ok(page) => {
                debug!(
                    "Loaded {} shipments (page {} of {})",
                    page.items.len(),
                    page.info.page,
                    page.info.page_count()
                );
                let mut state = self.state.write().expect("lock poisoned");
                state.items = page.items;
                state.page_info = Some(page.info);
                state.last_request = request;
                state.last_error = None;
                Ok(())
            }
            Err(error) => {
                warn!("Failed to load shipments: {}", error);
                let mut state = self.state.write().expect("lock poisoned");
                state.items.clear();
                state.page_info = None;
                state.last_request = request;
                state.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Re-fetch the most recently requested page.
    pub async fn reload(&self) -> ApiResult<()> {
        let request = self.state.read().expect("lock poisoned").last_request;
        self.load(request).await
    }

    /// Replace the list filter. Takes effect on the next load.
    pub fn set_filter(&self, filter: ShipmentFilter) {
        self.state.write().expect("lock poisoned").filter = filter;
    }

    pub fn filter(&self) -> ShipmentFilter {
        self.state.read().expect("lock poisoned").filter.clone()
    }

    /// Single fetch straight from the source; the cached page is untouched.
    pub async fn get(&self, id: &ShipmentId) -> ApiResult<Shipment> {
        self.api.get_shipment(id).await
    }

    /// Create a shipment, then re-fetch the current page so the new row
    /// appears where the server sorts it.
    pub async fn create(&self, draft: &ShipmentDraft) -> ApiResult<Shipment> {
        match self.api.create_shipment(draft).await {
            Ok(created) => {
                info!("Created shipment {}", created.id);
                // A failed refresh leaves the error state readable; the
                // create itself still succeeded.
                let _ = self.reload().await;
                Ok(created)
            }
            Err(error) => {
                warn!("Failed to create shipment: {}", error);
                self.state.write().expect("lock poisoned").last_error =
                    Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Optimistically apply `draft` to the cached row, then confirm with
    /// the server. A rejection restores the previous row and raises a
    /// failure toast. Rows outside the cached page are updated
    /// server-side only.
    pub async fn update(
        &self,
        id: &ShipmentId,
        draft: &ShipmentDraft,
    ) -> ApiResult<()> {
        optimistic::commit(
            &self.state,
            &self.bus,
            Toast::error("Update failed", format!("Could not save shipment {}", id)),
            |state| {
                let row = state.items.iter_mut().find(|row| &row.id == id)?;
                let previous = row.clone();
                *row = draft.clone().apply_to(&previous, Utc::now());
                Some(previous)
            },
            async { self.api.update_shipment(id, draft).await.map(|_| ()) },
            |state, previous| {
                if let Some(previous) = previous {
                    if let Some(row) =
                        state.items.iter_mut().find(|row| row.id == previous.id)
                    {
                        *row = previous;
                    }
                }
            },
        )
        .await?;
        Ok(())
    }

    /// Optimistically drop the cached row, then confirm the delete. A
    /// rejection restores the row at its old position and raises a failure
    /// toast.
    pub async fn remove(&self, id: &ShipmentId) -> ApiResult<()> {
        optimistic::commit(
            &self.state,
            &self.bus,
            Toast::error(
                "Delete failed",
                format!("Could not delete shipment {}", id),
            ),
            |state| {
                let index = state.items.iter().position(|row| &row.id == id)?;
                Some((index, state.items.remove(index)))
            },
            async { self.api.delete_shipment(id).await },
            |state, removed| {
                if let Some((index, row)) = removed {
                    let index = index.min(state.items.len());
                    state.items.insert(index, row);
                }
            },
        )
        .await?;
        Ok(())
    }

    /// Cached rows of the current page.
    pub fn items(&self) -> Vec<Shipment> {
        self.state.read().expect("lock poisoned").items.clone()
    }

    pub fn page_info(&self) -> Option<PageInfo> {
        self.state.read().expect("lock poisoned").page_info
    }

    pub fn last_error(&self) -> Option<String> {
        self.state
            .read()
            .expect("lock poisoned")
            .last_error
            .clone()
    }
}
