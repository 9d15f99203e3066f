//! Paginated client-account listing with optimistic edit and delete.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, info, warn};

use logipilot_model::{Client, ClientDraft, ClientId, PageInfo, PageRequest};

use crate::api::{ApiService, ClientFilter};
use crate::error::ApiResult;
use crate::events::{EventBus, Toast};
use crate::optimistic;

#[derive(Debug, Default)]
struct ClientsState {
    items: Vec<Client>,
    page_info: Option<PageInfo>,
    filter: ClientFilter,
    last_request: PageRequest,
    last_error: Option<String>,
}

/// Cached view of one page of client accounts; same contract as
/// [`ShipmentsService`](crate::resources::ShipmentsService).
#[derive(Debug)]
pub struct ClientsService {
    api: Arc<dyn ApiService>,
    bus: EventBus,
    state: RwLock<ClientsState>,
}

impl ClientsService {
    pub fn new(api: Arc<dyn ApiService>, bus: EventBus) -> Self {
        Self {
            api,
            bus,
            state: RwLock::new(ClientsState::default()),
        }
    }

    pub async fn load(&self, request: PageRequest) -> ApiResult<()> {
        let filter = self.state.read().expect("lock poisoned").filter.clone();
        match self.api.list_clients(&filter, request).await {
            Ok(page) => {
                debug!(
                    "Loaded {} clients (page {} of {})",
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
                warn!("Failed to load clients: {}", error);
                let mut state = self.state.write().expect("lock poisoned");
                state.items.clear();
                state.page_info = None;
                state.last_request = request;
                state.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    pub async fn reload(&self) -> ApiResult<()> {
        let request = self.state.read().expect("lock poisoned").last_request;
        self.load(request).await
    }

    /// Replace the list filter. Takes effect on the next load.
    pub fn set_filter(&self, filter: ClientFilter) {
        self.state.write().expect("lock poisoned").filter = filter;
    }

    pub fn filter(&self) -> ClientFilter {
        self.state.read().expect("lock poisoned").filter.clone()
    }

    pub async fn get(&self, id: &ClientId) -> ApiResult<Client> {
        self.api.get_client(id).await
    }

    pub async fn create(&self, draft: &ClientDraft) -> ApiResult<Client> {
        match self.api.create_client(draft).await {
            Ok(created) => {
                info!("Created client {}", created.id);
                let _ = self.reload().await;
                Ok(created)
            }
            Err(error) => {
                warn!("Failed to create client: {}", error);
                self.state.write().expect("lock poisoned").last_error =
                    Some(error.to_string());
                Err(error)
            }
        }
    }

    pub async fn update(&self, id: &ClientId, draft: &ClientDraft) -> ApiResult<()> {
        optimistic::commit(
            &self.state,
            &self.bus,
            Toast::error("Update failed", format!("Could not save client {}", id)),
            |state| {
                let row = state.items.iter_mut().find(|row| &row.id == id)?;
                let previous = row.clone();
                *row = draft.clone().apply_to(&previous, Utc::now());
                Some(previous)
            },
            async { self.api.update_client(id, draft).await.map(|_| ()) },
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

    pub async fn remove(&self, id: &ClientId) -> ApiResult<()> {
        optimistic::commit(
            &self.state,
            &self.bus,
            Toast::error("Delete failed", format!("Could not delete client {}", id)),
            |state| {
                let index = state.items.iter().position(|row| &row.id == id)?;
                Some((index, state.items.remove(index)))
            },
            async { self.api.delete_client(id).await },
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

    pub fn items(&self) -> Vec<Client> {
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
