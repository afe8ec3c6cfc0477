//! Conexión a PostgreSQL
//!
//! El pool se crea una sola vez al arrancar y se entrega por constructor
//! a los repositorios. No existe un holder global de conexión.

use sqlx::PgPool;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Pool de conexiones compartido por todos los repositorios
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!("🔗 Conectando a la base de datos: {}", mask_database_url(&config.url));

        match config.create_pool().await {
            Ok(pool) => {
                info!("✅ Base de datos conectada");
                Ok(Self { pool })
            }
            Err(e) => {
                error!("❌ Error conectando a {}: {}", mask_database_url(&config.url), e);
                Err(e)
            }
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.find('@') else {
        return url.to_string();
    };
    match url.find("://") {
        Some(scheme_end) if scheme_end + 3 <= at_pos => {
            format!("{}***:***@{}", &url[..scheme_end + 3], &url[at_pos + 1..])
        }
        _ => url.to_string(),
    }
}
