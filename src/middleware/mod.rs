//! Middleware del sistema
//!
//! Contexto de sesión por request y configuración de CORS.

pub mod cors;
pub mod session;

pub use cors::*;
pub use session::{session_middleware, SessionContext, SessionUser};
