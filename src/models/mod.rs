//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean
//! al schema PostgreSQL. Las claves foráneas son enteros sueltos:
//! la coherencia entre entidades es responsabilidad del llamador.

use thiserror::Error;

pub mod fleet;
pub mod organisation;
pub mod organisation_route;
pub mod payment;
pub mod reservation;
pub mod route;
pub mod station;
pub mod subscription;
pub mod transport;
pub mod user;

/// Error al convertir un texto de la base de datos en un enum del dominio
#[derive(Debug, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
