//! Backend de gestión de transporte
//!
//! Rutas, reservas, estaciones, abonos, organizaciones y flota sobre
//! PostgreSQL, expuestos como API JSON con axum.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
