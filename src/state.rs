//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Todo se construye una vez al arrancar.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    PgReservationRepository, PgRouteRepository, PgTransportRepository, PgUserRepository,
    RouteRepository, StationRepository, TransportRepository, UserRepository,
};
use crate::services::{
    CoordinateResolver, GeocodingService, JwtService, NotificationOutbox, ProfileImageStore,
    ReservationService, StationService, UserService,
};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub outbox: NotificationOutbox,
    pub routes: Arc<dyn RouteRepository>,
    pub transports: Arc<dyn TransportRepository>,
    pub users: Arc<dyn UserRepository>,
    pub reservation_service: Arc<ReservationService>,
    pub station_service: Arc<StationService>,
    pub user_service: Arc<UserService>,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig, outbox: NotificationOutbox) -> AppResult<Self> {
        let routes: Arc<dyn RouteRepository> = Arc::new(PgRouteRepository::new(pool.clone()));
        let transports: Arc<dyn TransportRepository> = Arc::new(PgTransportRepository::new(pool.clone()));
        let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));

        let reservation_service = ReservationService::new(
            Arc::new(PgReservationRepository::new(pool.clone())),
            routes.clone(),
            transports.clone(),
            outbox.clone(),
        );

        let geocoder = Arc::new(GeocodingService::new(&config)?);
        let station_service = StationService::new(
            StationRepository::new(pool.clone()),
            CoordinateResolver::new(geocoder),
        );

        let user_service = UserService::new(users.clone(), ProfileImageStore::new(&config.upload_dir));

        let jwt = Arc::new(JwtService::from_config(&config));

        Ok(Self {
            pool,
            config,
            outbox,
            routes,
            transports,
            users,
            reservation_service: Arc::new(reservation_service),
            station_service: Arc::new(station_service),
            user_service: Arc::new(user_service),
            jwt,
        })
    }
}
