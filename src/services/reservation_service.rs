use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::reservation::{
    check_references, check_return, NewReservation, Reservation, ReservationStatus,
};
use crate::repositories::{ReservationRepository, RouteRepository, TransportRepository};
use crate::services::notification_outbox::{NotificationEvent, NotificationOutbox};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Servicio de reservas: reglas de negocio, cálculo de precio y
/// registro de la notificación de pago confirmado
pub struct ReservationService {
    reservations: Arc<dyn ReservationRepository>,
    routes: Arc<dyn RouteRepository>,
    transports: Arc<dyn TransportRepository>,
    outbox: NotificationOutbox,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        routes: Arc<dyn RouteRepository>,
        transports: Arc<dyn TransportRepository>,
        outbox: NotificationOutbox,
    ) -> Self {
        Self {
            reservations,
            routes,
            transports,
            outbox,
        }
    }

    pub async fn create(&self, input: NewReservation) -> AppResult<Reservation> {
        input.check()?;

        let price = match input.price {
            Some(price) if price > 0.0 => price,
            _ => self.compute_price(&input).await?,
        };

        let now = Utc::now();
        let reservation = Reservation {
            id: 0,
            user_id: input.user_id,
            route_id: input.route_id,
            transport_id: input.transport_id,
            date_time: input.date_time,
            status: input.status,
            price,
            is_paid: input.is_paid,
            round_trip: input.round_trip,
            return_date_time: input.return_date_time,
            created_at: now,
            updated_at: now,
        };

        let stored = self.reservations.create(&reservation).await?;
        info!(
            "🎫 Reserva #{} creada (ruta {}, transporte {}, {:.2}, {})",
            stored.id, stored.route_id, stored.transport_id, stored.price, stored.status
        );

        if stored.is_paid && stored.status == ReservationStatus::Confirmed {
            self.notify_confirmed(&stored);
        }

        Ok(stored)
    }

    pub async fn get(&self, id: i32) -> AppResult<Reservation> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Reservation", id))
    }

    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Reservation>> {
        self.reservations.find_by_user(user_id).await
    }

    /// Persistir cambios de una reserva existente. Un cambio de estado
    /// debe respetar la máquina de estados.
    pub async fn update(&self, reservation: Reservation) -> AppResult<Reservation> {
        let current = self.get(reservation.id).await?;

        check_references(reservation.route_id, reservation.transport_id)?;
        if reservation.price < 0.0 {
            return Err(AppError::ValidationError(format!("Invalid price {}", reservation.price)));
        }
        check_return(reservation.round_trip, reservation.date_time, reservation.return_date_time)?;
        if reservation.status != current.status {
            current.status.transition(reservation.status)?;
        }

        self.persist(&current, reservation).await
    }

    /// PENDING -> CONFIRMED, guardando `is_paid` tal cual llega
    pub async fn confirm(&self, id: i32, is_paid: bool) -> AppResult<Reservation> {
        let current = self.get(id).await?;
        let status = current.status.transition(ReservationStatus::Confirmed)?;

        let next = Reservation {
            status,
            is_paid,
            ..current.clone()
        };
        self.persist(&current, next).await
    }

    pub async fn cancel(&self, id: i32) -> AppResult<Reservation> {
        self.transition(id, ReservationStatus::Canceled).await
    }

    pub async fn transition(&self, id: i32, target: ReservationStatus) -> AppResult<Reservation> {
        let current = self.get(id).await?;
        let status = current.status.transition(target)?;

        let next = Reservation {
            status,
            ..current.clone()
        };
        self.persist(&current, next).await
    }

    async fn persist(&self, current: &Reservation, mut next: Reservation) -> AppResult<Reservation> {
        next.user_id = current.user_id;
        next.created_at = current.created_at;
        next.updated_at = Utc::now().max(current.created_at);

        let stored = self.reservations.update(&next).await?;
        info!("🎫 Reserva #{} actualizada ({} -> {})", stored.id, current.status, stored.status);

        let entered_confirmed = current.status != ReservationStatus::Confirmed
            && stored.status == ReservationStatus::Confirmed;
        if entered_confirmed && stored.is_paid {
            self.notify_confirmed(&stored);
        }

        Ok(stored)
    }

    /// Precio base de la ruta, doble para ida y vuelta
    async fn compute_price(&self, input: &NewReservation) -> AppResult<f64> {
        let route = self
            .routes
            .find_by_id(input.route_id)
            .await?
            .ok_or_else(|| not_found_error("Route", input.route_id))?;

        let transport = self
            .transports
            .find_by_id(input.transport_id)
            .await?
            .ok_or_else(|| not_found_error("Transport", input.transport_id))?;

        if !transport.available {
            warn!("⚠️ Transporte {} marcado como no disponible", transport.id);
        }

        let factor = if input.round_trip { 2.0 } else { 1.0 };
        Ok(route.base_price * factor)
    }

    fn notify_confirmed(&self, reservation: &Reservation) {
        self.outbox.record(NotificationEvent::ReservationConfirmed {
            reservation_id: reservation.id,
            user_id: reservation.user_id,
            amount: reservation.price,
            date_time: reservation.date_time,
        });
    }
}
