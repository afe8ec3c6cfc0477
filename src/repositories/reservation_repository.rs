use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::reservation::Reservation;
use crate::utils::errors::{db_error, AppResult};

/// Acceso a la tabla reservations
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserta la reserva ignorando su `id` y devuelve la fila creada
    async fn create(&self, reservation: &Reservation) -> AppResult<Reservation>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Reservation>>;
    async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<Reservation>>;
    async fn update(&self, reservation: &Reservation) -> AppResult<Reservation>;
}

pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    async fn create(&self, reservation: &Reservation) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, route_id, transport_id, date_time, status, price,
                                      is_paid, round_trip, return_date_time, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(reservation.user_id)
        .bind(reservation.route_id)
        .bind(reservation.transport_id)
        .bind(reservation.date_time)
        .bind(reservation.status.as_str())
        .bind(reservation.price)
        .bind(reservation.is_paid)
        .bind(reservation.round_trip)
        .bind(reservation.return_date_time)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error creating reservation", e))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Error finding reservation", e))
    }

    async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 ORDER BY date_time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Error listing reservations", e))
    }

    async fn update(&self, reservation: &Reservation) -> AppResult<Reservation> {
        sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET route_id = $2, transport_id = $3, date_time = $4, status = $5, price = $6,
                is_paid = $7, round_trip = $8, return_date_time = $9, updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.route_id)
        .bind(reservation.transport_id)
        .bind(reservation.date_time)
        .bind(reservation.status.as_str())
        .bind(reservation.price)
        .bind(reservation.is_paid)
        .bind(reservation.round_trip)
        .bind(reservation.return_date_time)
        .bind(reservation.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Error updating reservation", e))
    }
}
