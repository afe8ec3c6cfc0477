mod common;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use common::{InMemoryUsers, RecordingMailer};
use transport_manager::models::user::{NewUser, UserRole};
use transport_manager::repositories::UserRepository;
use transport_manager::services::{NotificationEvent, NotificationOutbox, OutboxConsumer};
use transport_manager::utils::errors::AppError;

async fn users_with_client() -> Arc<InMemoryUsers> {
    let users = Arc::new(InMemoryUsers::default());
    users
        .create(NewUser {
            first_name: "Amira".to_string(),
            last_name: "Ben Salah".to_string(),
            email: "Amira@example.tn".to_string(),
            phone: None,
            password_hash: "x".to_string(),
            role: UserRole::Client,
            organisation_id: None,
        })
        .await
        .unwrap();
    users
}

fn confirmed(user_id: i32) -> NotificationEvent {
    NotificationEvent::ReservationConfirmed {
        reservation_id: 5,
        user_id,
        amount: 175.0,
        date_time: Utc.with_ymd_and_hms(2025, 7, 1, 8, 30, 0).unwrap(),
    }
}

#[tokio::test]
async fn test_consumer_delivers_events_until_outbox_closes() {
    let users = users_with_client().await;
    let mailer = Arc::new(RecordingMailer::default());
    let (outbox, receiver) = NotificationOutbox::channel();
    let consumer = OutboxConsumer::new(receiver, users, mailer.clone()).spawn();

    assert!(outbox.record(confirmed(1)));
    assert!(outbox.record(NotificationEvent::PaymentReceived {
        payment_id: 9,
        email: "payer@example.tn".to_string(),
        payer_name: "Karim".to_string(),
        amount: Decimal::new(4500, 2),
    }));
    drop(outbox);
    consumer.await.unwrap();

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "amira@example.tn");
    assert_eq!(sent[0].to_name, "Amira Ben Salah");
    assert!(sent[0].html.contains("175.00 TND"));
    assert_eq!(sent[1].to, "payer@example.tn");
    assert!(sent[1].html.contains("45.00 TND"));
}

#[tokio::test]
async fn test_unknown_recipient_is_an_error_but_consumer_keeps_going() {
    let users = users_with_client().await;
    let mailer = Arc::new(RecordingMailer::default());
    let (outbox, receiver) = NotificationOutbox::channel();
    let consumer = OutboxConsumer::new(receiver, users.clone(), mailer.clone());

    let result = consumer.deliver(&confirmed(77)).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let handle = consumer.spawn();
    outbox.record(confirmed(77));
    outbox.record(confirmed(1));
    drop(outbox);
    handle.await.unwrap();

    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delivery_failure_is_dropped() {
    let users = users_with_client().await;
    let mailer = Arc::new(RecordingMailer {
        fail: true,
        ..Default::default()
    });
    let (outbox, receiver) = NotificationOutbox::channel();
    let handle = OutboxConsumer::new(receiver, users, mailer.clone()).spawn();

    assert!(outbox.record(confirmed(1)));
    drop(outbox);

    // El consumidor termina sin propagar el fallo
    handle.await.unwrap();
    assert!(mailer.sent.lock().unwrap().is_empty());
}
