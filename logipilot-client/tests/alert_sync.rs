//! Validates the alert engine's merge, announce-once, and rollback behavior
//! against the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use logipilot_client::mock::InMemoryApi;
use logipilot_client::{
    AlertEvent, AlertSyncEngine, ApiError, ApiService,
    DEFAULT_ALERT_POLL_INTERVAL, EventBus, ToastKind,
};
use logipilot_model::{AlertId, PageRequest};

#[path = "support/mod.rs"]
mod support;

use support::{FlakyApi, drain, init_tracing, make_alert};

fn seeded_engine() -> (Arc<InMemoryApi>, EventBus, AlertSyncEngine) {
    init_tracing();
    let api = Arc::new(InMemoryApi::with_seed_data());
    let bus = EventBus::new(16);
    let engine = AlertSyncEngine::new(api.clone(), bus.clone());
    (api, bus, engine)
}

#[tokio::test]
async fn refresh_populates_the_cache_silently() -> Result<()> {
    let (_api, bus, engine) = seeded_engine();
    let mut toasts = bus.subscribe_toasts();
    let mut events = bus.subscribe_alerts();

    engine.refresh().await?;

    let alerts = engine.alerts();
    assert_eq!(alerts.len(), 4);
    // Newest first.
    assert_eq!(alerts[0].id, AlertId::new("notif001"));
    assert_eq!(alerts[3].id, AlertId::new("notif004"));
    assert_eq!(engine.unread_count(), 2);
    assert_eq!(engine.page_info().map(|info| info.total_items), Some(4));
    assert_eq!(engine.poll_interval(), DEFAULT_ALERT_POLL_INTERVAL);

    assert!(drain(&mut toasts).is_empty());
    assert_eq!(
        drain(&mut events),
        vec![AlertEvent::Refreshed {
            total: 4,
            unread: 2
        }]
    );
    Ok(())
}

#[tokio::test]
async fn first_poll_toasts_only_unread_alerts() -> Result<()> {
    let (_api, bus, engine) = seeded_engine();
    let mut toasts = bus.subscribe_toasts();

    let fresh = engine.poll_once().await?;
    assert_eq!(fresh.len(), 4);

    let toasts = drain(&mut toasts);
    assert_eq!(toasts.len(), 2);
    // notif001 is High severity, notif003 Info; read ones stay silent.
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[1].kind, ToastKind::Info);
    Ok(())
}

#[tokio::test]
async fn poll_announces_a_fresh_unread_alert_exactly_once() -> Result<()> {
    let (api, bus, engine) = seeded_engine();
    engine.refresh().await?;

    let mut toasts = bus.subscribe_toasts();
    let mut events = bus.subscribe_alerts();
    api.push_alert(make_alert("notif_fresh", 0, false));

    let fresh = engine.poll_once().await?;
    assert_eq!(fresh, vec![AlertId::new("notif_fresh")]);

    let announced = drain(&mut toasts);
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].title, "Alert notif_fresh");
    assert_eq!(
        drain(&mut events),
        vec![AlertEvent::NewAlerts {
            ids: vec![AlertId::new("notif_fresh")]
        }]
    );

    // Same alert again: merged, not re-announced.
    let again = engine.poll_once().await?;
    assert!(again.is_empty());
    assert!(drain(&mut toasts).is_empty());
    assert!(drain(&mut events).is_empty());
    assert_eq!(engine.alerts().len(), 5);
    Ok(())
}

#[tokio::test]
async fn fresh_read_alerts_merge_without_toasts() -> Result<()> {
    let (api, bus, engine) = seeded_engine();
    engine.refresh().await?;

    let mut toasts = bus.subscribe_toasts();
    api.push_alert(make_alert("notif_archived", 90, true));

    let fresh = engine.poll_once().await?;
    assert_eq!(fresh, vec![AlertId::new("notif_archived")]);
    assert!(drain(&mut toasts).is_empty());
    assert_eq!(engine.alerts().len(), 5);
    Ok(())
}

#[tokio::test]
async fn server_side_read_state_wins_on_merge() -> Result<()> {
    let (api, bus, engine) = seeded_engine();
    engine.refresh().await?;
    assert_eq!(engine.unread_count(), 2);

    let mut toasts = bus.subscribe_toasts();
    // Another session marks it read on the server.
    api.mark_alert_read(&AlertId::new("notif001")).await?;

    let fresh = engine.poll_once().await?;
    assert!(fresh.is_empty());
    assert_eq!(engine.unread_count(), 1);
    assert!(drain(&mut toasts).is_empty());
    Ok(())
}

#[tokio::test]
async fn mark_read_updates_local_and_server() -> Result<()> {
    let (api, bus, engine) = seeded_engine();
    engine.refresh().await?;

    let mut events = bus.subscribe_alerts();
    engine.mark_read(&AlertId::new("notif001")).await?;

    assert_eq!(engine.unread_count(), 1);
    let server_copy = api
        .store()
        .alerts()
        .into_iter()
        .find(|alert| alert.id == AlertId::new("notif001"))
        .unwrap();
    assert!(server_copy.read);
    assert_eq!(
        drain(&mut events),
        vec![AlertEvent::MarkedRead {
            id: AlertId::new("notif001")
        }]
    );
    Ok(())
}

#[tokio::test]
async fn mark_read_rolls_back_on_rejection() -> Result<()> {
    let (api, bus, engine) = seeded_engine();
    engine.refresh().await?;

    let mut toasts = bus.subscribe_toasts();
    let mut events = bus.subscribe_alerts();
    api.fail_writes(true);

    let result = engine.mark_read(&AlertId::new("notif001")).await;
    assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));

    // Optimistic flip reverted, no success event, one failure toast.
    assert_eq!(engine.unread_count(), 2);
    assert!(drain(&mut events).is_empty());
    let announced = drain(&mut toasts);
    assert_eq!(announced.len(), 1);
    assert_eq!(announced[0].kind, ToastKind::Error);
    assert_eq!(announced[0].title, "Update failed");
    assert_eq!(announced[0].body, "Could not mark notification as read");
    Ok(())
}

#[tokio::test]
async fn mark_read_of_unknown_alert_errors_without_local_damage() -> Result<()> {
    let (_api, _bus, engine) = seeded_engine();
    engine.refresh().await?;

    let result = engine.mark_read(&AlertId::new("ghost")).await;
    assert!(matches!(result, Err(ApiError::Http { status: 404, .. })));
    assert_eq!(engine.alerts().len(), 4);
    assert_eq!(engine.unread_count(), 2);
    Ok(())
}

#[tokio::test]
async fn mark_all_read_reports_the_flipped_count() -> Result<()> {
    let (api, bus, engine) = seeded_engine();
    engine.refresh().await?;

    let mut events = bus.subscribe_alerts();
    let flipped = engine.mark_all_read().await?;
    assert_eq!(flipped, 2);
    assert_eq!(engine.unread_count(), 0);
    assert!(api.store().alerts().iter().all(|alert| alert.read));
    assert_eq!(
        drain(&mut events),
        vec![AlertEvent::MarkedAllRead { count: 2 }]
    );

    // Second call has nothing left to flip.
    assert_eq!(engine.mark_all_read().await?, 0);
    Ok(())
}

#[tokio::test]
async fn mark_all_read_restores_only_what_it_flipped() -> Result<()> {
    let (api, _bus, engine) = seeded_engine();
    engine.refresh().await?;

    api.fail_writes(true);
    let result = engine.mark_all_read().await;
    assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));

    // The two unread alerts are unread again; the already-read ones were
    // never touched.
    assert_eq!(engine.unread_count(), 2);
    let by_id = engine.alerts();
    let read_state = |id: &str| {
        by_id
            .iter()
            .find(|alert| alert.id == AlertId::new(id))
            .map(|alert| alert.read)
    };
    assert_eq!(read_state("notif001"), Some(false));
    assert_eq!(read_state("notif002"), Some(true));
    assert_eq!(read_state("notif003"), Some(false));
    assert_eq!(read_state("notif004"), Some(true));
    Ok(())
}

#[tokio::test]
async fn reconcile_prunes_alerts_gone_from_the_server() -> Result<()> {
    let (api, _bus, engine) = seeded_engine();
    engine.refresh().await?;
    assert_eq!(engine.alerts().len(), 4);

    assert!(api.store().remove_alert(&AlertId::new("notif004")));

    // A plain poll keeps the stale entry; reconcile drops it.
    engine.poll_once().await?;
    assert_eq!(engine.alerts().len(), 4);

    engine.reconcile().await?;
    let alerts = engine.alerts();
    assert_eq!(alerts.len(), 3);
    assert!(
        !alerts
            .iter()
            .any(|alert| alert.id == AlertId::new("notif004"))
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn background_loop_announces_new_alerts() -> Result<()> {
    init_tracing();
    let api = Arc::new(InMemoryApi::with_seed_data());
    let bus = EventBus::new(16);
    let engine = AlertSyncEngine::with_settings(
        api.clone(),
        bus.clone(),
        Duration::from_secs(5),
        PageRequest::default(),
    );
    engine.refresh().await?;

    let mut events = bus.subscribe_alerts();
    engine.start();
    assert!(engine.is_running());

    api.push_alert(make_alert("notif_live", 0, false));

    // Paused time auto-advances to the next tick while we wait.
    let ids = loop {
        match events.recv().await? {
            AlertEvent::NewAlerts { ids } => break ids,
            _ => continue,
        }
    };
    assert_eq!(ids, vec![AlertId::new("notif_live")]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn stop_halts_the_background_loop() -> Result<()> {
    let (api, bus, engine) = seeded_engine();
    engine.refresh().await?;

    engine.start();
    engine.stop();
    assert!(!engine.is_running());

    let mut events = bus.subscribe_alerts();
    api.push_alert(make_alert("notif_after_stop", 0, false));

    let waited =
        tokio::time::timeout(Duration::from_secs(60), events.recv()).await;
    assert!(waited.is_err(), "no poll should run after stop");
    assert_eq!(engine.alerts().len(), 4);
    Ok(())
}

#[tokio::test]
async fn refresh_failure_is_recorded_and_recoverable() -> Result<()> {
    init_tracing();
    let api = Arc::new(FlakyApi::new(InMemoryApi::with_seed_data()));
    let bus = EventBus::new(16);
    let engine = AlertSyncEngine::new(api.clone(), bus.clone());

    api.set_broken(true);
    assert!(engine.refresh().await.is_err());
    assert!(engine.alerts().is_empty());
    let recorded = engine.last_error().unwrap();
    assert!(recorded.contains("500"), "got: {recorded}");

    api.set_broken(false);
    engine.refresh().await?;
    assert_eq!(engine.alerts().len(), 4);
    assert!(engine.last_error().is_none());
    Ok(())
}
