//! Services module
//!
//! Este módulo contiene la lógica de negocio y los colaboradores externos.
//! Los servicios encapsulan operaciones que involucran varios repositorios
//! o integraciones HTTP (email transaccional, geocoding).

pub mod email_service;
pub mod geocoding_service;
pub mod image_storage;
pub mod jwt_service;
pub mod notification_outbox;
pub mod reservation_service;
pub mod route_seeder;
pub mod station_service;
pub mod user_service;

pub use email_service::{EmailMessage, EmailSender, LogOnlyEmailSender, MailjetEmailService};
pub use geocoding_service::{Geocoder, GeocodingService};
pub use image_storage::ProfileImageStore;
pub use jwt_service::{JwtService, SessionClaims};
pub use notification_outbox::{NotificationEvent, NotificationOutbox, OutboxConsumer};
pub use reservation_service::ReservationService;
pub use route_seeder::RouteSeeder;
pub use station_service::{CoordinateResolver, StationService};
pub use user_service::UserService;
