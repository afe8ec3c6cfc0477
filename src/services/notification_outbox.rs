//! Outbox de notificaciones
//!
//! Los servicios registran eventos en el outbox sin esperar a la entrega.
//! Un consumidor en segundo plano resuelve el destinatario, genera el
//! email y lo envía. Los fallos de entrega se registran y se descartan:
//! nunca afectan a la operación que originó el evento.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::repositories::UserRepository;
use crate::services::email_service::{EmailMessage, EmailSender};
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    ReservationConfirmed {
        reservation_id: i32,
        user_id: i32,
        amount: f64,
        date_time: DateTime<Utc>,
    },
    PaymentReceived {
        payment_id: i32,
        email: String,
        payer_name: String,
        amount: Decimal,
    },
}

/// Extremo de escritura del outbox
#[derive(Clone)]
pub struct NotificationOutbox {
    sender: mpsc::UnboundedSender<NotificationEvent>,
}

impl NotificationOutbox {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Registrar un evento. Devuelve `false` si el consumidor ya no existe.
    pub fn record(&self, event: NotificationEvent) -> bool {
        debug!("📬 Evento registrado en outbox: {:?}", event);
        match self.sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                error!("❌ Outbox cerrado, evento perdido: {:?}", e.0);
                false
            }
        }
    }
}

/// Consumidor del outbox
pub struct OutboxConsumer {
    receiver: mpsc::UnboundedReceiver<NotificationEvent>,
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn EmailSender>,
}

impl OutboxConsumer {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<NotificationEvent>,
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            receiver,
            users,
            mailer,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Procesa eventos hasta que todos los emisores se cierran
    pub async fn run(mut self) {
        info!("📮 Consumidor de notificaciones iniciado");
        while let Some(event) = self.receiver.recv().await {
            if let Err(e) = self.deliver(&event).await {
                error!("❌ Notificación no entregada ({:?}): {}", event, e);
            }
        }
        info!("📮 Consumidor de notificaciones detenido");
    }

    pub async fn deliver(&self, event: &NotificationEvent) -> AppResult<()> {
        let message = match event {
            NotificationEvent::ReservationConfirmed {
                reservation_id,
                user_id,
                amount,
                date_time,
            } => {
                let user = self
                    .users
                    .find_by_id(*user_id)
                    .await?
                    .ok_or_else(|| not_found_error("User", user_id))?;

                EmailMessage {
                    to: user.email.clone(),
                    to_name: user.full_name(),
                    subject: format!("Confirmation de paiement - réservation #{}", reservation_id),
                    html: render_reservation_confirmed(&user.full_name(), *reservation_id, *amount, *date_time),
                }
            }
            NotificationEvent::PaymentReceived {
                payment_id,
                email,
                payer_name,
                amount,
            } => EmailMessage {
                to: email.clone(),
                to_name: payer_name.clone(),
                subject: format!("Reçu de paiement #{}", payment_id),
                html: render_payment_received(payer_name, *payment_id, *amount),
            },
        };

        self.mailer.send(&message).await
    }
}

pub fn render_reservation_confirmed(
    name: &str,
    reservation_id: i32,
    amount: f64,
    date_time: DateTime<Utc>,
) -> String {
    format!(
        "<html><body>\
         <h2>Bonjour {},</h2>\
         <p>Votre paiement pour la réservation <strong>#{}</strong> a bien été reçu.</p>\
         <p>Montant : <strong>{:.2} TND</strong><br/>Départ : {}</p>\
         <p>Merci d'avoir voyagé avec nous.</p>\
         </body></html>",
        name,
        reservation_id,
        amount,
        date_time.format("%d/%m/%Y %H:%M")
    )
}

pub fn render_payment_received(name: &str, payment_id: i32, amount: Decimal) -> String {
    format!(
        "<html><body>\
         <h2>Bonjour {},</h2>\
         <p>Nous confirmons la réception de votre paiement <strong>#{}</strong> \
         d'un montant de <strong>{} TND</strong>.</p>\
         <p>Votre abonnement est désormais actif.</p>\
         </body></html>",
        name,
        payment_id,
        amount.round_dp(2)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_fails_once_consumer_is_gone() {
        let (outbox, receiver) = NotificationOutbox::channel();
        drop(receiver);
        assert!(!outbox.record(NotificationEvent::PaymentReceived {
            payment_id: 1,
            email: "a@b.tn".to_string(),
            payer_name: "A".to_string(),
            amount: Decimal::new(1000, 2),
        }));
    }

    #[test]
    fn test_render_reservation_confirmed() {
        let when = Utc.with_ymd_and_hms(2025, 7, 1, 8, 30, 0).unwrap();
        let html = render_reservation_confirmed("Sami Trabelsi", 12, 175.0, when);
        assert!(html.contains("#12"));
        assert!(html.contains("175.00 TND"));
        assert!(html.contains("01/07/2025 08:30"));
    }
}
