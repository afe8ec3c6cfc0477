//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor y de los
//! colaboradores externos (email transaccional, geocoding, ficheros).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_JWT_SECRET: &str = "transport-dev-secret-change-in-production";

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub port: u16,
    pub host: String,
    pub mailjet_api_key: String,
    pub mailjet_api_secret: String,
    pub mail_sender: String,
    pub mail_sender_name: String,
    pub geocoding_url: String,
    pub upload_dir: PathBuf,
    pub http_connect_timeout: Duration,
    pub seed_routes: bool,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
            mailjet_api_key: String::new(),
            mailjet_api_secret: String::new(),
            mail_sender: "no-reply@transport.tn".to_string(),
            mail_sender_name: "Transport".to_string(),
            geocoding_url: "https://nominatim.openstreetmap.org/search".to_string(),
            upload_dir: PathBuf::from("uploads"),
            http_connect_timeout: Duration::from_secs(10),
            seed_routes: true,
            cors_origins: Vec::new(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_ttl: Duration::from_secs(24 * 3600),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración del entorno; las variables ausentes o inválidas
    /// conservan el valor por defecto
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            mailjet_api_key: env::var("MAILJET_API_KEY").unwrap_or(defaults.mailjet_api_key),
            mailjet_api_secret: env::var("MAILJET_API_SECRET").unwrap_or(defaults.mailjet_api_secret),
            mail_sender: env::var("MAIL_SENDER").unwrap_or(defaults.mail_sender),
            mail_sender_name: env::var("MAIL_SENDER_NAME").unwrap_or(defaults.mail_sender_name),
            geocoding_url: env::var("GEOCODING_URL").unwrap_or(defaults.geocoding_url),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            http_connect_timeout: env::var("HTTP_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_connect_timeout),
            seed_routes: env::var("SEED_ROUTES")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.seed_routes),
            // Lista separada por comas; vacía = CORS permisivo
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            jwt_secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.jwt_secret),
            jwt_ttl: env::var("JWT_TTL_HOURS")
                .ok()
                .and_then(|h| h.parse::<u64>().ok())
                .map(|h| Duration::from_secs(h * 3600))
                .unwrap_or(defaults.jwt_ttl),
        }
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// El envío de emails sólo está activo con credenciales configuradas
    pub fn mail_enabled(&self) -> bool {
        !self.mailjet_api_key.is_empty() && !self.mailjet_api_secret.is_empty()
    }
}
