use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::models::station::{CreateStationRequest, Station};
use crate::repositories::station_repository::StationRepository;
use crate::services::geocoding_service::Geocoder;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_coordinates;

lazy_static! {
    /// Coordenadas conocidas por ciudad (clave normalizada)
    static ref CITY_COORDINATES: HashMap<&'static str, (f64, f64)> = {
        let mut m = HashMap::new();
        // Túnez
        m.insert("tunis", (36.8065, 10.1815));
        m.insert("ariana", (36.8625, 10.1956));
        m.insert("ben arous", (36.7531, 10.2189));
        m.insert("la marsa", (36.8782, 10.3247));
        m.insert("la goulette", (36.8181, 10.3050));
        m.insert("carthage", (36.8528, 10.3233));
        m.insert("bizerte", (37.2744, 9.8739));
        m.insert("nabeul", (36.4561, 10.7376));
        m.insert("hammamet", (36.4000, 10.6167));
        m.insert("zaghouan", (36.4029, 10.1429));
        m.insert("sousse", (35.8256, 10.6084));
        m.insert("monastir", (35.7643, 10.8113));
        m.insert("mahdia", (35.5047, 11.0622));
        m.insert("enfidha", (36.1333, 10.3833));
        m.insert("kairouan", (35.6781, 10.0963));
        m.insert("sfax", (34.7406, 10.7603));
        m.insert("kerkennah", (34.6667, 11.1667));
        m.insert("gabes", (33.8815, 10.0982));
        m.insert("medenine", (33.3549, 10.5055));
        m.insert("djerba", (33.8076, 10.8451));
        m.insert("tataouine", (32.9297, 10.4518));
        m.insert("gafsa", (34.4250, 8.7842));
        m.insert("metlaoui", (34.3214, 8.4019));
        m.insert("tozeur", (33.9197, 8.1335));
        m.insert("kebili", (33.7044, 8.9690));
        m.insert("kasserine", (35.1676, 8.8365));
        m.insert("sidi bouzid", (35.0382, 9.4849));
        m.insert("beja", (36.7256, 9.1817));
        m.insert("jendouba", (36.5011, 8.7802));
        m.insert("ghardimaou", (36.4500, 8.4333));
        m.insert("le kef", (36.1822, 8.7147));
        m.insert("siliana", (36.0849, 9.3708));
        m.insert("manouba", (36.8081, 10.0972));
        // Internacional
        m.insert("paris", (48.8566, 2.3522));
        m.insert("marseille", (43.2965, 5.3698));
        m.insert("rome", (41.9028, 12.4964));
        m.insert("genes", (44.4056, 8.9463));
        m.insert("palerme", (38.1157, 13.3615));
        m.insert("civitavecchia", (42.0930, 11.7960));
        m.insert("istanbul", (41.0082, 28.9784));
        m.insert("alger", (36.7538, 3.0588));
        m.insert("tripoli", (32.8872, 13.1913));
        m.insert("londres", (51.5074, -0.1278));
        m
    };
}

/// Normaliza el nombre de ciudad: minúsculas, sin acentos, espacios simples
pub fn normalize_city(city: &str) -> String {
    let folded: String = city
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            '-' | '_' => ' ',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn lookup_city(city: &str) -> Option<(f64, f64)> {
    CITY_COORDINATES.get(normalize_city(city).as_str()).copied()
}

/// Resolución de coordenadas: explícitas, tabla de ciudades, geocoding
pub struct CoordinateResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl CoordinateResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, request: &CreateStationRequest) -> AppResult<(f64, f64)> {
        if let Some(coordinates) = request.explicit_coordinates() {
            return Ok(coordinates);
        }

        if let Some(coordinates) = lookup_city(&request.city) {
            return Ok(coordinates);
        }

        let query = if request.address.trim().is_empty() {
            request.city.clone()
        } else {
            format!("{}, {}", request.address.trim(), request.city.trim())
        };

        match self.geocoder.geocode(&query).await {
            Ok(response) => {
                if let Some(coordinates) = response.coordinates() {
                    return Ok(coordinates);
                }
            }
            Err(e) => warn!("⚠️ Geocoding no disponible para '{}': {}", query, e),
        }

        Err(AppError::ValidationError(format!(
            "Unable to resolve coordinates for city '{}'",
            request.city
        )))
    }
}

pub struct StationService {
    stations: StationRepository,
    resolver: CoordinateResolver,
}

impl StationService {
    pub fn new(stations: StationRepository, resolver: CoordinateResolver) -> Self {
        Self { stations, resolver }
    }

    pub async fn create(&self, request: CreateStationRequest) -> AppResult<Station> {
        request.validate()?;

        let (latitude, longitude) = self.resolver.resolve(&request).await?;
        validate_coordinates(latitude, longitude).map_err(|e| {
            AppError::ValidationError(format!("Invalid coordinates ({}, {}): {}", latitude, longitude, e))
        })?;

        let station = self
            .stations
            .create(&request.into_station(0, latitude, longitude))
            .await?;
        info!("🚉 Estación {} creada en {} ({}, {})", station.name, station.city, latitude, longitude);
        Ok(station)
    }

    pub async fn list(&self, city: Option<&str>) -> AppResult<Vec<Station>> {
        match city {
            Some(city) if !city.trim().is_empty() => self.stations.find_by_city(city).await,
            _ => self.stations.find_all().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geocoding_service::GeocodingResponse;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGeocoder {
        calls: AtomicUsize,
        answer: Option<(f64, f64)>,
    }

    impl FakeGeocoder {
        fn new(answer: Option<(f64, f64)>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                answer,
            })
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, place: &str) -> AppResult<GeocodingResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GeocodingResponse {
                query: place.to_string(),
                success: self.answer.is_some(),
                latitude: self.answer.map(|c| c.0),
                longitude: self.answer.map(|c| c.1),
                display_name: None,
                error: None,
            })
        }
    }

    fn request(city: &str, coordinates: Option<(f64, f64)>) -> CreateStationRequest {
        CreateStationRequest {
            name: "Gare centrale".to_string(),
            city: city.to_string(),
            address: String::new(),
            latitude: coordinates.map(|c| c.0),
            longitude: coordinates.map(|c| c.1),
            station_type: "Gare".to_string(),
            organisation_id: None,
            station_code: "TUN01".to_string(),
            opening_hours: None,
        }
    }

    #[test]
    fn test_normalize_city() {
        assert_eq!(normalize_city("  Gabès "), "gabes");
        assert_eq!(normalize_city("Sidi   Bouzid"), "sidi bouzid");
        assert_eq!(normalize_city("Le-Kef"), "le kef");
    }

    #[tokio::test]
    async fn test_explicit_coordinates_win() {
        let geocoder = FakeGeocoder::new(Some((1.0, 1.0)));
        let resolver = CoordinateResolver::new(geocoder.clone());
        let coordinates = resolver.resolve(&request("Sfax", Some((34.0, 10.0)))).await.unwrap();
        assert_eq!(coordinates, (34.0, 10.0));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_table_skips_geocoder() {
        let geocoder = FakeGeocoder::new(Some((1.0, 1.0)));
        let resolver = CoordinateResolver::new(geocoder.clone());
        let coordinates = resolver.resolve(&request("Médenine", None)).await.unwrap();
        assert_eq!(coordinates, (33.3549, 10.5055));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_city_falls_back_to_geocoder() {
        let geocoder = FakeGeocoder::new(Some((35.2, 9.1)));
        let resolver = CoordinateResolver::new(geocoder.clone());
        let coordinates = resolver.resolve(&request("Thala", None)).await.unwrap();
        assert_eq!(coordinates, (35.2, 9.1));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unresolvable_city_is_validation_error() {
        let resolver = CoordinateResolver::new(FakeGeocoder::new(None));
        let result = resolver.resolve(&request("Atlantide", None)).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
