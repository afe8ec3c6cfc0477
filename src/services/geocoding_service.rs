use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

const BATCH_SIZE: usize = 10;

/// Resultado de geocodificar un lugar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodingResponse {
    pub query: String,
    pub success: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub display_name: Option<String>,
    pub error: Option<String>,
}

impl GeocodingResponse {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Colaborador de geocoding: nombre de lugar -> coordenadas
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, place: &str) -> AppResult<GeocodingResponse>;

    /// Geocodifica por lotes de 10 en paralelo. Un fallo individual
    /// produce una respuesta con `success: false`, no aborta el lote.
    async fn batch_geocode(&self, places: Vec<String>) -> Vec<GeocodingResponse> {
        log::info!("🗺️ Batch geocoding de {} lugares", places.len());
        let mut results = Vec::with_capacity(places.len());

        for chunk in places.chunks(BATCH_SIZE) {
            let futures = chunk.iter().map(|place| self.geocode(place));
            let chunk_results = futures::future::join_all(futures).await;

            for (place, result) in chunk.iter().zip(chunk_results) {
                match result {
                    Ok(response) => results.push(response),
                    Err(e) => {
                        log::error!("❌ Error de geocoding para '{}': {}", place, e);
                        results.push(not_found(place, Some(e.to_string())));
                    }
                }
            }

            // respetar el límite de peticiones de Nominatim
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        }

        log::info!("✅ Batch geocoding completado: {} resultados", results.len());
        results
    }
}

// Nominatim devuelve lat/lon como strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

pub struct GeocodingService {
    search_url: String,
    client: reqwest::Client,
}

impl GeocodingService {
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.http_connect_timeout)
            .timeout(config.http_connect_timeout * 2)
            .user_agent("TransportManager/1.0")
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            search_url: config.geocoding_url.clone(),
            client,
        })
    }

    fn search_url_for(&self, place: &str) -> String {
        format!(
            "{}?q={}&format=json&limit=1",
            self.search_url,
            urlencoding::encode(place)
        )
    }
}

#[async_trait]
impl Geocoder for GeocodingService {
    async fn geocode(&self, place: &str) -> AppResult<GeocodingResponse> {
        log::info!("🗺️ Geocoding: {}", place);

        let response = self
            .client
            .get(self.search_url_for(place))
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Geocoding unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ Geocoding respondió {}: {}", status, error_text);
            return Ok(not_found(place, Some(format!("Geocoding failed: {}", status))));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse geocoding response: {}", e)))?;

        Ok(parse_first(place, &places))
    }
}

fn not_found(place: &str, error: Option<String>) -> GeocodingResponse {
    GeocodingResponse {
        query: place.to_string(),
        success: false,
        latitude: None,
        longitude: None,
        display_name: None,
        error,
    }
}

fn parse_first(place: &str, places: &[NominatimPlace]) -> GeocodingResponse {
    let Some(first) = places.first() else {
        log::warn!("⚠️ Sin coordenadas para: {}", place);
        return not_found(place, None);
    };

    match (first.lat.parse::<f64>(), first.lon.parse::<f64>()) {
        (Ok(latitude), Ok(longitude)) => {
            log::info!("✅ Geocoding: {} -> ({}, {})", place, latitude, longitude);
            GeocodingResponse {
                query: place.to_string(),
                success: true,
                latitude: Some(latitude),
                longitude: Some(longitude),
                display_name: first.display_name.clone(),
                error: None,
            }
        }
        _ => not_found(place, Some(format!("Invalid coordinates '{}', '{}'", first.lat, first.lon))),
    }
}
