//! Controladores
//!
//! Orquestan repositorios para las rutas HTTP que no necesitan un
//! servicio propio y devuelven las respuestas ya envueltas.

pub mod fleet_controller;
pub mod organisation_controller;
pub mod subscription_controller;
