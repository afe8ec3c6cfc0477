use crate::models::payment::{NewPayment, Payment};
use crate::models::subscription::{CreateSubscriptionRequest, Subscription};
use crate::utils::errors::{db_error, AppError, AppResult};
use chrono::Utc;
use sqlx::PgPool;

// Sólo un pago puede validar el abono: la fila se reclama antes de insertar el pago
const CLAIM_UNPAID_SQL: &str =
    "UPDATE subscriptions SET is_valid = TRUE WHERE id = $1 AND is_valid = FALSE";

/// Un UPDATE que no tocó filas significa que otro pago ya validó el abono
fn ensure_claimed(subscription_id: i32, rows_affected: u64) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::Conflict(format!(
            "Subscription {} is already paid",
            subscription_id
        )));
    }
    Ok(())
}

/// Abonos y sus pagos
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// El abono nace sin validar hasta que se registra el pago
    pub async fn create(&self, request: &CreateSubscriptionRequest) -> AppResult<Subscription> {
        sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (user_id, subscription_type, start_date, end_date, price,
                                       station_start, station_end, is_valid)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE)
            RETURNING *
            "#,
        )
        .bind(request.user_id)
        .bind(&request.subscription_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.price)
        .bind(&request.station_start)
        .bind(&request.station_end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating subscription", e))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Subscription>> {
        sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error finding subscription", e))
    }

    pub async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<Subscription>> {
        sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE user_id = $1 ORDER BY end_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error listing subscriptions", e))
    }

    /// Valida el abono y registra el pago en la misma transacción
    pub async fn record_payment(&self, payment: &NewPayment) -> AppResult<Payment> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Error starting transaction", e))?;

        let claimed = sqlx::query(CLAIM_UNPAID_SQL)
            .bind(payment.subscription_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Error validating subscription", e))?
            .rows_affected();

        if let Err(e) = ensure_claimed(payment.subscription_id, claimed) {
            tx.rollback()
                .await
                .map_err(|e| db_error("Error rolling back payment", e))?;
            return Err(e);
        }

        let stored = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (subscription_id, payer_name, payer_email, payer_phone,
                                  card_last_four, card_expiry, amount, paid_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(payment.subscription_id)
        .bind(&payment.payer_name)
        .bind(&payment.payer_email)
        .bind(&payment.payer_phone)
        .bind(&payment.card_last_four)
        .bind(&payment.card_expiry)
        .bind(payment.amount)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Error creating payment", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Error committing payment", e))?;

        Ok(stored)
    }
}
