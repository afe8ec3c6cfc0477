//! Repositorios
//!
//! Acceso a PostgreSQL con `sqlx::query_as`. Los repositorios que usan
//! los servicios con reglas de negocio (rutas, reservas, transportes,
//! usuarios) se exponen como traits para poder sustituirlos en tests.

pub mod fleet_repository;
pub mod organisation_repository;
pub mod reservation_repository;
pub mod route_repository;
pub mod station_repository;
pub mod subscription_repository;
pub mod transport_repository;
pub mod user_repository;

pub use reservation_repository::{PgReservationRepository, ReservationRepository};
pub use route_repository::{PgRouteRepository, RouteRepository};
pub use transport_repository::{PgTransportRepository, TransportRepository};
pub use user_repository::{PgUserRepository, UserRepository};
pub use station_repository::StationRepository;
