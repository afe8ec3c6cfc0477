//! Implementaciones en memoria de los repositorios y colaboradores
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Mutex;

use transport_manager::database::schema::{DdlError, SchemaExecutor, DUPLICATE_COLUMN_SQLSTATE};
use transport_manager::models::reservation::Reservation;
use transport_manager::models::route::{NewRoute, Route, RouteFilters, TransportMode};
use transport_manager::models::transport::{NewTransport, Transport};
use transport_manager::models::user::{NewUser, User};
use transport_manager::repositories::{
    ReservationRepository, RouteRepository, TransportRepository, UserRepository,
};
use transport_manager::services::{EmailMessage, EmailSender};
use transport_manager::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Default)]
pub struct InMemoryRoutes {
    pub rows: Mutex<Vec<Route>>,
    /// Los orígenes listados fallan al insertar
    pub failing_origins: Vec<String>,
}

impl InMemoryRoutes {
    pub fn with_route(route: Route) -> Self {
        Self {
            rows: Mutex::new(vec![route]),
            failing_origins: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl RouteRepository for InMemoryRoutes {
    async fn create(&self, route: NewRoute) -> AppResult<Route> {
        if self.failing_origins.contains(&route.origin) {
            return Err(AppError::DatabaseError(format!("insert failed for {}", route.origin)));
        }
        let mut rows = self.rows.lock().unwrap();
        let stored = route.into_route(rows.len() as i32 + 1);
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Route>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn search(&self, filters: &RouteFilters) -> AppResult<Vec<Route>> {
        let contains = |value: &str, filter: &Option<String>| {
            filter
                .as_ref()
                .map_or(true, |f| value.to_lowercase().contains(&f.trim().to_lowercase()))
        };
        let mode = filters
            .transport_mode
            .as_deref()
            .map(|m| m.parse::<TransportMode>())
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| contains(&r.origin, &filters.origin))
            .filter(|r| contains(&r.destination, &filters.destination))
            .filter(|r| mode.map_or(true, |m| r.transport_mode == m))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryTransports {
    pub rows: Mutex<Vec<Transport>>,
}

impl InMemoryTransports {
    pub fn with_transport(transport: Transport) -> Self {
        Self {
            rows: Mutex::new(vec![transport]),
        }
    }
}

#[async_trait]
impl TransportRepository for InMemoryTransports {
    async fn create(&self, transport: NewTransport) -> AppResult<Transport> {
        let mut rows = self.rows.lock().unwrap();
        let stored = Transport {
            id: rows.len() as i32 + 1,
            name: transport.name,
            transport_type: transport.transport_type,
            capacity: transport.capacity,
            company_id: transport.company_id,
            license_plate: transport.license_plate,
            available: transport.available,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Transport>> {
        Ok(self.rows.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_company(&self, company_id: i32) -> AppResult<Vec<Transport>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn set_available(&self, id: i32, available: bool) -> AppResult<Transport> {
        let mut rows = self.rows.lock().unwrap();
        let transport = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found_error("Transport", id))?;
        transport.available = available;
        Ok(transport.clone())
    }
}

#[derive(Default)]
pub struct InMemoryReservations {
    pub rows: Mutex<Vec<Reservation>>,
}

#[async_trait]
impl ReservationRepository for InMemoryReservations {
    async fn create(&self, reservation: &Reservation) -> AppResult<Reservation> {
        let mut rows = self.rows.lock().unwrap();
        let stored = Reservation {
            id: rows.len() as i32 + 1,
            ..reservation.clone()
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Reservation>> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: i32) -> AppResult<Vec<Reservation>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, reservation: &Reservation) -> AppResult<Reservation> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == reservation.id)
            .ok_or_else(|| not_found_error("Reservation", reservation.id))?;
        // Igual que el UPDATE: user_id y created_at no cambian
        *row = Reservation {
            user_id: row.user_id,
            created_at: row.created_at,
            ..reservation.clone()
        };
        Ok(row.clone())
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    pub rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let stored = User {
            id: rows.len() as i32 + 1,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.to_lowercase(),
            phone: user.phone,
            password_hash: user.password_hash,
            role: user.role,
            organisation_id: user.organisation_id,
            profile_image: None,
            created_at: Utc::now(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self.rows.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn set_profile_image(&self, id: i32, filename: &str) -> AppResult<User> {
        let mut rows = self.rows.lock().unwrap();
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| not_found_error("User", id))?;
        user.profile_image = Some(filename.to_string());
        Ok(user.clone())
    }
}

/// Guarda los emails en lugar de enviarlos
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        if self.fail {
            return Err(AppError::ExternalApi("mail provider down".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Ejecutor DDL que simula las columnas de una tabla
///
/// Sólo entiende `ALTER TABLE "t" ADD COLUMN "c" ...`; el resto de
/// sentencias se registran y tienen éxito.
#[derive(Default)]
pub struct FakeSchema {
    pub columns: Mutex<HashSet<(String, String)>>,
    pub statements: Mutex<Vec<String>>,
    /// Columnas cuyo ALTER falla con un error distinto de duplicate_column
    pub broken_columns: Vec<String>,
}

impl FakeSchema {
    pub fn with_columns(table: &str, columns: &[&str]) -> Self {
        Self {
            columns: Mutex::new(
                columns
                    .iter()
                    .map(|c| (table.to_string(), c.to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.columns
            .lock()
            .unwrap()
            .contains(&(table.to_string(), column.to_string()))
    }

    pub fn alter_count(&self) -> usize {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.starts_with("ALTER TABLE"))
            .count()
    }
}

#[async_trait]
impl SchemaExecutor for FakeSchema {
    async fn execute(&self, statement: &str) -> Result<(), DdlError> {
        self.statements.lock().unwrap().push(statement.to_string());
        if !statement.starts_with("ALTER TABLE") {
            return Ok(());
        }

        // ALTER TABLE "tabla" ADD COLUMN "columna" definición
        let parts: Vec<&str> = statement.split('"').collect();
        let (table, column) = (parts[1].to_string(), parts[3].to_string());

        if self.broken_columns.contains(&column) {
            return Err(DdlError {
                code: Some("42601".to_string()),
                message: format!("syntax error near {}", column),
            });
        }

        let mut columns = self.columns.lock().unwrap();
        if !columns.insert((table.clone(), column.clone())) {
            return Err(DdlError {
                code: Some(DUPLICATE_COLUMN_SQLSTATE.to_string()),
                message: format!("column \"{}\" of relation \"{}\" already exists", column, table),
            });
        }
        Ok(())
    }
}

pub fn sample_route(id: i32, base_price: f64) -> Route {
    Route {
        id,
        origin: "Tunis".to_string(),
        destination: "Sousse".to_string(),
        distance: 140.0,
        estimated_duration: 150,
        base_price,
        company_id: 1,
        transport_mode: TransportMode::Bus,
        is_international: false,
        is_intra_city: false,
    }
}

pub fn sample_transport(id: i32, available: bool) -> Transport {
    Transport {
        id,
        name: "SNTRI 42".to_string(),
        transport_type: "Bus".to_string(),
        capacity: 50,
        company_id: 1,
        license_plate: "123 TU 4567".to_string(),
        available,
    }
}
