mod common;

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use common::{sample_route, sample_transport, InMemoryReservations, InMemoryRoutes, InMemoryTransports};
use transport_manager::models::reservation::{NewReservation, ReservationStatus};
use transport_manager::services::{NotificationEvent, NotificationOutbox, ReservationService};
use transport_manager::utils::errors::AppError;

struct Harness {
    service: ReservationService,
    reservations: Arc<InMemoryReservations>,
    events: UnboundedReceiver<NotificationEvent>,
}

fn harness() -> Harness {
    let reservations = Arc::new(InMemoryReservations::default());
    let (outbox, events) = NotificationOutbox::channel();
    let service = ReservationService::new(
        reservations.clone(),
        Arc::new(InMemoryRoutes::with_route(sample_route(10, 25.5))),
        Arc::new(InMemoryTransports::with_transport(sample_transport(20, true))),
        outbox,
    );
    Harness {
        service,
        reservations,
        events,
    }
}

fn drain(events: &mut UnboundedReceiver<NotificationEvent>) -> Vec<NotificationEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

fn input() -> NewReservation {
    NewReservation {
        user_id: 3,
        route_id: 10,
        transport_id: 20,
        date_time: Utc.with_ymd_and_hms(2025, 7, 1, 8, 30, 0).unwrap(),
        status: ReservationStatus::Pending,
        price: None,
        is_paid: false,
        round_trip: false,
        return_date_time: None,
    }
}

#[tokio::test]
async fn test_paid_confirmed_reservation_records_one_event() {
    let mut h = harness();

    let reservation = h
        .service
        .create(NewReservation {
            status: ReservationStatus::Confirmed,
            price: Some(175.0),
            is_paid: true,
            ..input()
        })
        .await
        .unwrap();

    assert!(reservation.id > 0);
    assert_eq!(reservation.price, 175.0);
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(reservation.created_at, reservation.updated_at);

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        NotificationEvent::ReservationConfirmed { reservation_id, user_id: 3, amount, .. }
            if *reservation_id == reservation.id && *amount == 175.0
    ));
}

#[tokio::test]
async fn test_pending_reservation_records_no_event() {
    let mut h = harness();
    h.service.create(input()).await.unwrap();
    assert!(drain(&mut h.events).is_empty());
}

#[tokio::test]
async fn test_missing_price_uses_route_base_price() {
    let h = harness();

    let one_way = h.service.create(input()).await.unwrap();
    assert_eq!(one_way.price, 25.5);

    let departure = input().date_time;
    let round_trip = h
        .service
        .create(NewReservation {
            round_trip: true,
            return_date_time: Some(departure + Duration::days(2)),
            price: Some(0.0),
            ..input()
        })
        .await
        .unwrap();
    assert_eq!(round_trip.price, 51.0);
}

#[tokio::test]
async fn test_price_computation_needs_existing_route() {
    let h = harness();
    let result = h
        .service
        .create(NewReservation {
            route_id: 99,
            ..input()
        })
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_round_trip_without_return_is_rejected_before_persisting() {
    let h = harness();

    let result = h
        .service
        .create(NewReservation {
            round_trip: true,
            return_date_time: None,
            ..input()
        })
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert!(h.reservations.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_return_before_departure_is_rejected() {
    let h = harness();
    let departure = input().date_time;

    let result = h
        .service
        .create(NewReservation {
            round_trip: true,
            return_date_time: Some(departure - Duration::hours(1)),
            ..input()
        })
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_missing_route_or_transport_is_rejected() {
    let h = harness();
    let no_route = h.service.create(NewReservation { route_id: 0, ..input() }).await;
    let no_transport = h.service.create(NewReservation { transport_id: 0, ..input() }).await;
    let negative = h.service.create(NewReservation { price: Some(-1.0), ..input() }).await;

    assert!(matches!(no_route, Err(AppError::ValidationError(_))));
    assert!(matches!(no_transport, Err(AppError::ValidationError(_))));
    assert!(matches!(negative, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_cannot_create_in_terminal_status() {
    let h = harness();
    let result = h
        .service
        .create(NewReservation {
            status: ReservationStatus::Completed,
            ..input()
        })
        .await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_confirm_pending_sets_paid_and_notifies() {
    let mut h = harness();
    let created = h.service.create(input()).await.unwrap();

    let confirmed = h.service.confirm(created.id, true).await.unwrap();

    assert_eq!(confirmed.status, ReservationStatus::Confirmed);
    assert!(confirmed.is_paid);
    assert!(confirmed.updated_at >= confirmed.created_at);
    assert_eq!(confirmed.created_at, created.created_at);
    assert_eq!(drain(&mut h.events).len(), 1);
}

#[tokio::test]
async fn test_confirm_unpaid_records_no_event() {
    let mut h = harness();
    let created = h.service.create(input()).await.unwrap();

    let confirmed = h.service.confirm(created.id, false).await.unwrap();

    assert!(!confirmed.is_paid);
    assert!(drain(&mut h.events).is_empty());
}

#[tokio::test]
async fn test_completed_reservation_is_terminal() {
    let h = harness();
    let created = h.service.create(input()).await.unwrap();
    h.service.confirm(created.id, true).await.unwrap();
    h.service
        .transition(created.id, ReservationStatus::Completed)
        .await
        .unwrap();

    for target in [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Canceled,
        ReservationStatus::Rejected,
    ] {
        let result = h.service.transition(created.id, target).await;
        assert!(
            matches!(result, Err(AppError::InvalidTransition { .. })),
            "COMPLETED -> {} should fail",
            target
        );
    }
}

#[tokio::test]
async fn test_cancel_rules() {
    let h = harness();

    let pending = h.service.create(input()).await.unwrap();
    let canceled = h.service.cancel(pending.id).await.unwrap();
    assert_eq!(canceled.status, ReservationStatus::Canceled);

    let again = h.service.cancel(pending.id).await;
    assert!(matches!(again, Err(AppError::InvalidTransition { .. })));

    let rejected = h.service.create(input()).await.unwrap();
    h.service
        .transition(rejected.id, ReservationStatus::Rejected)
        .await
        .unwrap();
    assert!(h.service.cancel(rejected.id).await.is_err());
}

#[tokio::test]
async fn test_pending_cannot_jump_to_completed() {
    let h = harness();
    let created = h.service.create(input()).await.unwrap();
    let result = h
        .service
        .transition(created.id, ReservationStatus::Completed)
        .await;
    assert!(matches!(result, Err(AppError::InvalidTransition { .. })));
}

#[tokio::test]
async fn test_update_refreshes_timestamp_and_checks_transition() {
    let mut h = harness();
    let created = h.service.create(input()).await.unwrap();

    let mut changed = created.clone();
    changed.status = ReservationStatus::Confirmed;
    changed.is_paid = true;
    let updated = h.service.update(changed).await.unwrap();

    assert!(updated.updated_at >= created.updated_at);
    assert!(updated.updated_at >= updated.created_at);
    assert_eq!(drain(&mut h.events).len(), 1);

    let mut back = updated.clone();
    back.status = ReservationStatus::Pending;
    assert!(matches!(
        h.service.update(back).await,
        Err(AppError::InvalidTransition { .. })
    ));

    // Sin cambio de estado no hay nueva notificación
    let mut repriced = updated.clone();
    repriced.price = 30.0;
    h.service.update(repriced).await.unwrap();
    assert!(drain(&mut h.events).is_empty());
}

#[tokio::test]
async fn test_update_cannot_clear_route_or_transport() {
    let h = harness();
    let created = h.service.create(input()).await.unwrap();

    let mut no_route = created.clone();
    no_route.route_id = 0;
    let mut no_transport = created.clone();
    no_transport.transport_id = 0;

    assert!(matches!(h.service.update(no_route).await, Err(AppError::ValidationError(_))));
    assert!(matches!(h.service.update(no_transport).await, Err(AppError::ValidationError(_))));
    assert_eq!(h.service.get(created.id).await.unwrap().route_id, 10);
}

#[tokio::test]
async fn test_update_keeps_owner_and_creation_time() {
    let h = harness();
    let created = h.service.create(input()).await.unwrap();

    let mut tampered = created.clone();
    tampered.user_id = 999;
    tampered.created_at = created.created_at + Duration::days(30);
    let updated = h.service.update(tampered).await.unwrap();

    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_unknown_reservation_is_not_found() {
    let h = harness();
    assert!(matches!(h.service.get(42).await, Err(AppError::NotFound(_))));
    assert!(matches!(h.service.cancel(42).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_list_for_user() {
    let h = harness();
    h.service.create(input()).await.unwrap();
    h.service.create(NewReservation { user_id: 4, ..input() }).await.unwrap();
    h.service.create(input()).await.unwrap();

    assert_eq!(h.service.list_for_user(3).await.unwrap().len(), 2);
    assert_eq!(h.service.list_for_user(4).await.unwrap().len(), 1);
}
