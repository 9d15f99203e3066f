//! Validates the paged shipment and client services: server-side filtering,
//! optimistic update/delete with rollback, and error-state handling.

use std::sync::Arc;

use anyhow::Result;

use logipilot_client::mock::InMemoryApi;
use logipilot_client::{
    ApiError, ClientFilter, ClientsService, EventBus, ShipmentFilter,
    ShipmentsService, ToastKind,
};
use logipilot_model::{ClientId, PageRequest, ShipmentId, ShipmentStatus};

#[path = "support/mod.rs"]
mod support;

use support::{FlakyApi, client_draft, drain, init_tracing, shipment_draft};

fn shipments_service() -> (Arc<InMemoryApi>, EventBus, ShipmentsService) {
    init_tracing();
    let api = Arc::new(InMemoryApi::with_seed_data());
    let bus = EventBus::new(16);
    let service = ShipmentsService::new(api.clone(), bus.clone());
    (api, bus, service)
}

fn clients_service() -> (Arc<InMemoryApi>, EventBus, ClientsService) {
    init_tracing();
    let api = Arc::new(InMemoryApi::with_seed_data());
    let bus = EventBus::new(16);
    let service = ClientsService::new(api.clone(), bus.clone());
    (api, bus, service)
}

#[tokio::test]
async fn load_replaces_the_cached_page_newest_first() -> Result<()> {
    let (_api, _bus, service) = shipments_service();

    service.load(PageRequest::first(20)).await?;
    let items = service.items();
    assert_eq!(items.len(), 8);
    assert_eq!(items[0].id, ShipmentId::new("SH005"));
    assert_eq!(items[7].id, ShipmentId::new("SH002"));
    assert_eq!(service.page_info().map(|info| info.total_items), Some(8));
    assert!(service.last_error().is_none());
    Ok(())
}

#[tokio::test]
async fn filters_apply_on_the_next_load() -> Result<()> {
    let (_api, _bus, service) = shipments_service();

    service.set_filter(ShipmentFilter {
        status: Some(ShipmentStatus::InTransit),
        ..ShipmentFilter::default()
    });
    service.load(PageRequest::first(20)).await?;
    let items = service.items();
    assert_eq!(items.len(), 2);
    assert!(
        items
            .iter()
            .all(|row| row.status == ShipmentStatus::InTransit)
    );

    service.set_filter(ShipmentFilter {
        query: Some("techcorp".to_string()),
        ..ShipmentFilter::default()
    });
    service.load(PageRequest::first(20)).await?;
    let items = service.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, ShipmentId::new("SH001"));
    Ok(())
}

#[tokio::test]
async fn pagination_slices_the_sorted_listing() -> Result<()> {
    let (_api, _bus, service) = shipments_service();

    service.load(PageRequest::new(2, 3)).await?;
    let items = service.items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, ShipmentId::new("SH008"));

    let info = service.page_info().unwrap();
    assert_eq!(info.page, 2);
    assert_eq!(info.total_items, 8);
    assert_eq!(info.page_count(), 3);
    assert!(info.has_next());
    Ok(())
}

#[tokio::test]
async fn create_refreshes_the_current_page() -> Result<()> {
    let (_api, _bus, service) = shipments_service();
    service.load(PageRequest::first(20)).await?;

    let created = service.create(&shipment_draft("Acme Corp")).await?;
    assert!(created.id.as_str().starts_with("SH"));

    let items = service.items();
    assert_eq!(items.len(), 9);
    // The new row is the newest, so the refreshed page leads with it.
    assert_eq!(items[0].id, created.id);
    assert_eq!(service.page_info().map(|info| info.total_items), Some(9));
    Ok(())
}

#[tokio::test]
async fn update_applies_locally_and_confirms_with_the_server() -> Result<()> {
    let (api, _bus, service) = shipments_service();
    service.load(PageRequest::first(20)).await?;

    let id = ShipmentId::new("SH001");
    let draft = shipment_draft("TechCorp Inc.");
    service.update(&id, &draft).await?;

    let cached = service
        .items()
        .into_iter()
        .find(|row| row.id == id)
        .unwrap();
    assert_eq!(cached.origin, "Warehouse 12");
    assert_eq!(cached.status, ShipmentStatus::Pending);

    let server_copy = api
        .store()
        .shipments()
        .into_iter()
        .find(|row| row.id == id)
        .unwrap();
    assert_eq!(server_copy.origin, "Warehouse 12");
    Ok(())
}

#[tokio::test]
async fn update_rolls_back_when_the_server_rejects() -> Result<()> {
    let (api, bus, service) = shipments_service();
    service.load(PageRequest::first(20)).await?;
    let before = service.items();

    let mut toasts = bus.subscribe_toasts();
    api.fail_writes(true);

    let id = ShipmentId::new("SH001");
    let result = service.update(&id, &shipment_draft("TechCorp Inc.")).await;
    assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));

    assert_eq!(service.items(), before);
    let announced = drain(&mut toasts);
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].kind, ToastKind::Error);
    assert_eq!(announced[0].title, "Update failed");
    assert_eq!(announced[0].body, "Could not save shipment SH001");
    Ok(())
}

#[tokio::test]
async fn update_outside_the_cached_page_only_touches_the_server() -> Result<()> {
    let (api, _bus, service) = shipments_service();
    service.set_filter(ShipmentFilter {
        status: Some(ShipmentStatus::InTransit),
        ..ShipmentFilter::default()
    });
    service.load(PageRequest::first(20)).await?;
    assert_eq!(service.items().len(), 2);

    // SH002 is Delivered, so it is not on the cached page.
    let id = ShipmentId::new("SH002");
    service.update(&id, &shipment_draft("Global Logistics")).await?;

    assert_eq!(service.items().len(), 2);
    let server_copy = api
        .store()
        .shipments()
        .into_iter()
        .find(|row| row.id == id)
        .unwrap();
    assert_eq!(server_copy.origin, "Warehouse 12");
    Ok(())
}

#[tokio::test]
async fn remove_drops_the_row_and_restores_it_on_rejection() -> Result<()> {
    let (api, bus, service) = shipments_service();
    service.load(PageRequest::first(20)).await?;

    service.remove(&ShipmentId::new("SH003")).await?;
    assert_eq!(service.items().len(), 7);
    assert!(
        !service
            .items()
            .iter()
            .any(|row| row.id == ShipmentId::new("SH003"))
    );

    let before = service.items();
    let mut toasts = bus.subscribe_toasts();
    api.fail_writes(true);

    let result = service.remove(&ShipmentId::new("SH001")).await;
    assert!(result.is_err());
    // Restored at its old position, not appended.
    assert_eq!(service.items(), before);
    let announced = drain(&mut toasts);
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].title, "Delete failed");
    assert_eq!(announced[0].body, "Could not delete shipment SH001");
    Ok(())
}

#[tokio::test]
async fn load_failure_clears_the_page_and_records_the_error() -> Result<()> {
    init_tracing();
    let api = Arc::new(FlakyApi::new(InMemoryApi::with_seed_data()));
    let bus = EventBus::new(16);
    let service = ShipmentsService::new(api.clone(), bus.clone());

    service.load(PageRequest::first(20)).await?;
    assert_eq!(service.items().len(), 8);

    api.set_broken(true);
    assert!(service.reload().await.is_err());
    assert!(service.items().is_empty());
    assert!(service.page_info().is_none());
    assert!(service.last_error().unwrap().contains("500"));

    api.set_broken(false);
    service.reload().await?;
    assert_eq!(service.items().len(), 8);
    assert!(service.last_error().is_none());
    Ok(())
}

#[tokio::test]
async fn get_fetches_without_touching_the_cached_page() -> Result<()> {
    let (_api, _bus, service) = shipments_service();

    let row = service.get(&ShipmentId::new("SH002")).await?;
    assert_eq!(row.client, "Global Logistics");
    assert!(service.items().is_empty());
    Ok(())
}

#[tokio::test]
async fn client_listing_sorts_and_filters() -> Result<()> {
    let (_api, _bus, service) = clients_service();

    service.load(PageRequest::first(20)).await?;
    let items = service.items();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0].id, ClientId::new("CL005"));
    assert_eq!(items[4].id, ClientId::new("CL002"));

    service.set_filter(ClientFilter {
        query: Some("megastore".to_string()),
        ..ClientFilter::default()
    });
    service.load(PageRequest::first(20)).await?;
    let items = service.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, ClientId::new("CL003"));
    Ok(())
}

#[tokio::test]
async fn created_clients_get_a_seeded_satisfaction_score() -> Result<()> {
    let (_api, _bus, service) = clients_service();
    service.load(PageRequest::first(20)).await?;

    let created = service.create(&client_draft("Beta Solutions")).await?;
    assert!(created.id.as_str().starts_with("CL"));
    let score = created.satisfaction_score.unwrap();
    assert!((70.0..100.0).contains(&score), "got: {score}");
    assert_eq!(service.items().len(), 6);
    Ok(())
}

#[tokio::test]
async fn client_update_rolls_back_when_the_server_rejects() -> Result<()> {
    let (api, bus, service) = clients_service();
    service.load(PageRequest::first(20)).await?;
    let before = service.items();

    let mut toasts = bus.subscribe_toasts();
    api.fail_writes(true);

    let result = service
        .update(&ClientId::new("CL001"), &client_draft("TechCorp Inc."))
        .await;
    assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));
    assert_eq!(service.items(), before);

    let announced = drain(&mut toasts);
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].body, "Could not save client CL001");
    Ok(())
}

#[tokio::test]
async fn removing_an_unknown_client_reports_not_found() -> Result<()> {
    let (_api, bus, service) = clients_service();
    service.load(PageRequest::first(20)).await?;

    let mut toasts = bus.subscribe_toasts();
    let result = service.remove(&ClientId::new("CL999")).await;
    assert!(matches!(result, Err(ApiError::Http { status: 404, .. })));

    // Nothing was cached for that id, so nothing changed locally.
    assert_eq!(service.items().len(), 5);
    assert_eq!(drain(&mut toasts).len(), 1);
    Ok(())
}
