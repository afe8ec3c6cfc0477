//! Módulo de base de datos
//!
//! Maneja la conexión con PostgreSQL y la reconciliación del schema

pub mod connection;
pub mod schema;

pub use connection::DatabaseConnection;
pub use schema::{PgSchemaExecutor, SchemaManager};
