//! Definición del schema y evolución defensiva de columnas
//!
//! Las tablas base se crean con `CREATE TABLE IF NOT EXISTS`. Las columnas
//! añadidas después a `"OrganisationRoute"` se reconcilian con
//! [`SchemaManager::ensure_column`]: cada `ALTER TABLE` va en su propia
//! sentencia autocommit y el error `duplicate_column` cuenta como éxito.
//! No hay rollback: es una migración hacia delante, no versionada.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// SQLSTATE de PostgreSQL para `duplicate_column`
pub const DUPLICATE_COLUMN_SQLSTATE: &str = "42701";

pub const ORGANISATION_ROUTE_TABLE: &str = "OrganisationRoute";

/// Error de una sentencia DDL con su código SQLSTATE, si lo hay
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DdlError {
    pub code: Option<String>,
    pub message: String,
}

impl DdlError {
    pub fn is_duplicate_column(&self) -> bool {
        self.code.as_deref() == Some(DUPLICATE_COLUMN_SQLSTATE)
    }
}

impl From<sqlx::Error> for DdlError {
    fn from(e: sqlx::Error) -> Self {
        let code = e
            .as_database_error()
            .and_then(|db| db.code())
            .map(|c| c.into_owned());
        Self {
            code,
            message: e.to_string(),
        }
    }
}

/// Ejecutor de sentencias DDL
#[async_trait]
pub trait SchemaExecutor: Send + Sync {
    async fn execute(&self, statement: &str) -> Result<(), DdlError>;
}

/// Ejecutor sobre el pool: cada sentencia usa su propia conexión en autocommit
pub struct PgSchemaExecutor {
    pool: PgPool,
}

impl PgSchemaExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaExecutor for PgSchemaExecutor {
    async fn execute(&self, statement: &str) -> Result<(), DdlError> {
        sqlx::query(statement).execute(&self.pool).await?;
        Ok(())
    }
}

/// Columnas que `"OrganisationRoute"` debe tener, en orden de aplicación
pub const ORGANISATION_ROUTE_COLUMNS: &[(&str, &str)] = &[
    ("wifiAvailable", "BOOLEAN DEFAULT FALSE"),
    ("accessible", "BOOLEAN DEFAULT FALSE"),
    ("airConditioned", "BOOLEAN DEFAULT FALSE"),
    ("foodService", "BOOLEAN DEFAULT FALSE"),
    ("customPrice", "DOUBLE PRECISION NULL"),
    ("customDuration", "INTEGER NULL"),
    ("routePrice", "DOUBLE PRECISION DEFAULT 0.0"),
    ("departureStationId", "INTEGER NULL"),
    ("arrivalStationId", "INTEGER NULL"),
    ("weekdaySchedule", "VARCHAR(50) NULL"),
    ("saturdaySchedule", "VARCHAR(50) NULL"),
    ("sundaySchedule", "VARCHAR(50) NULL"),
    ("holidaySchedule", "VARCHAR(50) NULL"),
    ("firstDepartureTime", "VARCHAR(10) NULL"),
    ("lastDepartureTime", "VARCHAR(10) NULL"),
    ("operationalDays", "INTEGER DEFAULT 127"),
    ("platformInfo", "VARCHAR(100) NULL"),
];

const BASE_TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"CREATE TABLE IF NOT EXISTS users (
            id SERIAL PRIMARY KEY,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            phone VARCHAR(30),
            password_hash VARCHAR(255) NOT NULL,
            role VARCHAR(30) NOT NULL DEFAULT 'CLIENT',
            organisation_id INTEGER,
            profile_image VARCHAR(255),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "organisations",
        r#"CREATE TABLE IF NOT EXISTS organisations (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            phone VARCHAR(30),
            address VARCHAR(255),
            city VARCHAR(100),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "routes",
        r#"CREATE TABLE IF NOT EXISTS routes (
            id SERIAL PRIMARY KEY,
            origin VARCHAR(100) NOT NULL,
            destination VARCHAR(100) NOT NULL,
            distance DOUBLE PRECISION NOT NULL DEFAULT 0,
            estimated_duration INTEGER NOT NULL DEFAULT 0,
            base_price DOUBLE PRECISION NOT NULL DEFAULT 0,
            company_id INTEGER NOT NULL DEFAULT 0,
            transport_mode VARCHAR(20) NOT NULL,
            is_international BOOLEAN NOT NULL DEFAULT FALSE,
            is_intra_city BOOLEAN NOT NULL DEFAULT FALSE,
            CHECK (origin <> destination)
        )"#,
    ),
    (
        "transports",
        r#"CREATE TABLE IF NOT EXISTS transports (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            transport_type VARCHAR(50) NOT NULL,
            capacity INTEGER NOT NULL CHECK (capacity > 0),
            company_id INTEGER NOT NULL,
            license_plate VARCHAR(20) NOT NULL,
            available BOOLEAN NOT NULL DEFAULT TRUE
        )"#,
    ),
    (
        "stations",
        r#"CREATE TABLE IF NOT EXISTS stations (
            id SERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            city VARCHAR(100) NOT NULL,
            address VARCHAR(255) NOT NULL DEFAULT '',
            latitude DOUBLE PRECISION NOT NULL,
            longitude DOUBLE PRECISION NOT NULL,
            station_type VARCHAR(50) NOT NULL,
            organisation_id INTEGER,
            station_code VARCHAR(20) NOT NULL,
            opening_hours VARCHAR(100)
        )"#,
    ),
    (
        "reservations",
        r#"CREATE TABLE IF NOT EXISTS reservations (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL,
            route_id INTEGER NOT NULL,
            transport_id INTEGER NOT NULL,
            date_time TIMESTAMPTZ NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'PENDING',
            price DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (price >= 0),
            is_paid BOOLEAN NOT NULL DEFAULT FALSE,
            round_trip BOOLEAN NOT NULL DEFAULT FALSE,
            return_date_time TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "subscriptions",
        r#"CREATE TABLE IF NOT EXISTS subscriptions (
            id SERIAL PRIMARY KEY,
            user_id INTEGER NOT NULL,
            subscription_type VARCHAR(20) NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE NOT NULL,
            price NUMERIC(10, 2) NOT NULL,
            station_start VARCHAR(100) NOT NULL,
            station_end VARCHAR(100) NOT NULL,
            is_valid BOOLEAN NOT NULL DEFAULT FALSE,
            CHECK (start_date <= end_date)
        )"#,
    ),
    (
        "payments",
        r#"CREATE TABLE IF NOT EXISTS payments (
            id SERIAL PRIMARY KEY,
            subscription_id INTEGER NOT NULL,
            payer_name VARCHAR(100) NOT NULL,
            payer_email VARCHAR(255) NOT NULL,
            payer_phone VARCHAR(30),
            card_last_four VARCHAR(4) NOT NULL,
            card_expiry VARCHAR(5) NOT NULL,
            amount NUMERIC(10, 2) NOT NULL,
            paid_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"#,
    ),
    (
        "vehicules",
        r#"CREATE TABLE IF NOT EXISTS vehicules (
            id SERIAL PRIMARY KEY,
            organisation_id INTEGER NOT NULL,
            immatriculation VARCHAR(20) NOT NULL,
            brand VARCHAR(100),
            model VARCHAR(100),
            capacity INTEGER NOT NULL,
            vehicule_type VARCHAR(50) NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'ACTIVE'
        )"#,
    ),
    (
        "conducteurs",
        r#"CREATE TABLE IF NOT EXISTS conducteurs (
            id SERIAL PRIMARY KEY,
            organisation_id INTEGER NOT NULL,
            vehicule_id INTEGER,
            first_name VARCHAR(100) NOT NULL,
            last_name VARCHAR(100) NOT NULL,
            licence_number VARCHAR(30) NOT NULL,
            phone VARCHAR(30),
            email VARCHAR(255),
            active BOOLEAN NOT NULL DEFAULT TRUE
        )"#,
    ),
    (
        "maintenance_records",
        r#"CREATE TABLE IF NOT EXISTS maintenance_records (
            id SERIAL PRIMARY KEY,
            vehicule_id INTEGER NOT NULL,
            description VARCHAR(500) NOT NULL,
            cost NUMERIC(10, 2) NOT NULL DEFAULT 0,
            maintenance_date DATE NOT NULL,
            next_due_date DATE
        )"#,
    ),
    (
        "OrganisationRoute",
        r#"CREATE TABLE IF NOT EXISTS "OrganisationRoute" (
            "id" SERIAL PRIMARY KEY,
            "organisationId" INTEGER NOT NULL,
            "routeId" INTEGER NOT NULL,
            "internalRouteCode" VARCHAR(50),
            "isActive" BOOLEAN NOT NULL DEFAULT TRUE,
            "assignedVehiculeId" INTEGER,
            "assignedConducteurId" INTEGER,
            "routeDuration" INTEGER NOT NULL DEFAULT 0
        )"#,
    ),
];

/// Encomillar un identificador SQL (cubre palabras reservadas y camelCase)
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Gestor del schema sobre un ejecutor DDL
pub struct SchemaManager<E: SchemaExecutor> {
    executor: E,
}

impl<E: SchemaExecutor> SchemaManager<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Crear todas las tablas base si no existen
    pub async fn create_base_tables(&self) -> Result<(), DdlError> {
        for (table, ddl) in BASE_TABLES {
            self.executor.execute(ddl).await.map_err(|e| {
                error!("❌ Error creando la tabla {}: {}", table, e);
                e
            })?;
            debug!("📋 Tabla {} lista", table);
        }
        Ok(())
    }

    /// Añadir una columna si falta. Idempotente: `duplicate_column` es éxito.
    pub async fn ensure_column(
        &self,
        table: &str,
        column: &str,
        sql_type_and_default: &str,
    ) -> Result<(), DdlError> {
        let statement = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            quote_ident(table),
            quote_ident(column),
            sql_type_and_default
        );

        match self.executor.execute(&statement).await {
            Ok(()) => {
                info!("➕ Columna {}.{} añadida", table, column);
                Ok(())
            }
            Err(e) if e.is_duplicate_column() => {
                debug!("Columna {}.{} ya existe", table, column);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error añadiendo la columna {}.{}: {}", table, column, e);
                Err(e)
            }
        }
    }

    /// Reconciliar `"OrganisationRoute"` con todas sus columnas.
    /// Un fallo no detiene las columnas siguientes; se devuelve el primero.
    pub async fn reconcile_organisation_route(&self) -> Result<(), DdlError> {
        let mut first_error = None;

        for (column, definition) in ORGANISATION_ROUTE_COLUMNS {
            if let Err(e) = self
                .ensure_column(ORGANISATION_ROUTE_TABLE, column, definition)
                .await
            {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => {
                warn!("⚠️ Reconciliación de {} incompleta", ORGANISATION_ROUTE_TABLE);
                Err(e)
            }
            None => Ok(()),
        }
    }

    /// Tablas base y después reconciliación de columnas
    pub async fn initialize(&self) -> Result<(), DdlError> {
        self.create_base_tables().await?;
        self.reconcile_organisation_route().await?;
        info!("✅ Schema reconciliado");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("accessible"), "\"accessible\"");
        assert_eq!(quote_ident("weird\"name"), "\"weird\"\"name\"");
    }

    #[test]
    fn test_duplicate_column_detection() {
        let duplicate = DdlError {
            code: Some(DUPLICATE_COLUMN_SQLSTATE.to_string()),
            message: "column already exists".to_string(),
        };
        let other = DdlError {
            code: Some("42P01".to_string()),
            message: "relation does not exist".to_string(),
        };
        assert!(duplicate.is_duplicate_column());
        assert!(!other.is_duplicate_column());
    }

    #[test]
    fn test_column_list_has_no_duplicates() {
        let mut names: Vec<&str> = ORGANISATION_ROUTE_COLUMNS.iter().map(|(c, _)| *c).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ORGANISATION_ROUTE_COLUMNS.len());
    }
}
