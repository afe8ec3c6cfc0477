//! Utilidades del sistema
//!
//! Manejo de errores y validadores compartidos por los modelos.

pub mod errors;
pub mod validation;
