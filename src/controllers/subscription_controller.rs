use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::dto::subscription_dto::SubscriptionResponse;
use crate::dto::ApiResponse;
use crate::models::payment::{Payment, PaymentRequest};
use crate::models::subscription::CreateSubscriptionRequest;
use crate::repositories::subscription_repository::SubscriptionRepository;
use crate::services::notification_outbox::{NotificationEvent, NotificationOutbox};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use sqlx::PgPool;

pub struct SubscriptionController {
    repository: SubscriptionRepository,
    outbox: NotificationOutbox,
}

impl SubscriptionController {
    pub fn new(pool: PgPool, outbox: NotificationOutbox) -> Self {
        Self {
            repository: SubscriptionRepository::new(pool),
            outbox,
        }
    }

    pub async fn create(
        &self,
        user_id: i32,
        mut request: CreateSubscriptionRequest,
    ) -> AppResult<ApiResponse<SubscriptionResponse>> {
        request.user_id = user_id;
        request.validate()?;

        let subscription = self.repository.create(&request).await?;
        Ok(ApiResponse::success_with_message(
            SubscriptionResponse::new(subscription, Utc::now().date_naive()),
            "Subscription created, awaiting payment",
        ))
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<SubscriptionResponse>> {
        let today = Utc::now().date_naive();
        Ok(self
            .repository
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|s| SubscriptionResponse::new(s, today))
            .collect())
    }

    /// Paga el abono por su precio. Sólo se guardan los cuatro últimos
    /// dígitos de la tarjeta; el recibo sale por el outbox.
    pub async fn pay(
        &self,
        user_id: i32,
        subscription_id: i32,
        request: PaymentRequest,
    ) -> AppResult<ApiResponse<Payment>> {
        request.validate()?;

        let subscription = self
            .repository
            .find_by_id(subscription_id)
            .await?
            .ok_or_else(|| not_found_error("Subscription", subscription_id))?;

        if subscription.user_id != user_id {
            return Err(AppError::Forbidden(format!(
                "Subscription {} belongs to another user",
                subscription_id
            )));
        }
        if subscription.is_valid {
            return Err(AppError::Conflict(format!("Subscription {} is already paid", subscription_id)));
        }

        let payment = self
            .repository
            .record_payment(&request.into_masked(subscription.id, subscription.price))
            .await?;
        info!(
            "💳 Pago {} registrado para el abono {} (**** {})",
            payment.id, subscription.id, payment.card_last_four
        );

        self.outbox.record(NotificationEvent::PaymentReceived {
            payment_id: payment.id,
            email: payment.payer_email.clone(),
            payer_name: payment.payer_name.clone(),
            amount: payment.amount,
        });

        Ok(ApiResponse::success_with_message(payment, "Payment recorded"))
    }
}
