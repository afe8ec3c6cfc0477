//! Carga del catálogo de rutas de referencia
//!
//! El catálogo es fijo y determinista: cada par de ciudades genera la ruta
//! de ida y la de vuelta. La carga es best-effort: una fila que falla se
//! registra y no detiene las demás. No hay detección de duplicados en
//! `populate_all`; sólo `populate_if_empty` protege contra recargas.

use std::sync::Arc;
use tracing::{error, info};

use crate::models::route::TransportMode::{Avion, Bus, Ferry, Metro, Taxi, Tgm, Train, Tram};
use crate::models::route::{NewRoute, TransportMode};
use crate::repositories::RouteRepository;
use crate::utils::errors::AppResult;

struct CatalogEntry {
    a: &'static str,
    b: &'static str,
    distance: f64,
    duration: i32,
    price: f64,
    mode: TransportMode,
    international: bool,
    intra_city: bool,
}

const fn entry(
    a: &'static str,
    b: &'static str,
    distance: f64,
    duration: i32,
    price: f64,
    mode: TransportMode,
) -> CatalogEntry {
    CatalogEntry {
        a,
        b,
        distance,
        duration,
        price,
        mode,
        international: false,
        intra_city: false,
    }
}

const fn urban(
    a: &'static str,
    b: &'static str,
    distance: f64,
    duration: i32,
    price: f64,
    mode: TransportMode,
) -> CatalogEntry {
    CatalogEntry {
        intra_city: true,
        ..entry(a, b, distance, duration, price, mode)
    }
}

const fn abroad(
    a: &'static str,
    b: &'static str,
    distance: f64,
    duration: i32,
    price: f64,
    mode: TransportMode,
) -> CatalogEntry {
    CatalogEntry {
        international: true,
        ..entry(a, b, distance, duration, price, mode)
    }
}

const CATALOG: &[CatalogEntry] = &[
    // Bus interurbano
    entry("Tunis", "Sousse", 140.0, 150, 11.5, Bus),
    entry("Tunis", "Sfax", 270.0, 270, 19.0, Bus),
    entry("Tunis", "Bizerte", 65.0, 75, 5.2, Bus),
    entry("Tunis", "Nabeul", 65.0, 70, 5.0, Bus),
    entry("Tunis", "Kairouan", 155.0, 150, 11.0, Bus),
    entry("Tunis", "Gabès", 405.0, 390, 27.5, Bus),
    entry("Tunis", "Djerba", 500.0, 480, 33.0, Bus),
    entry("Tunis", "Tozeur", 430.0, 450, 30.0, Bus),
    entry("Tunis", "Béja", 105.0, 100, 7.5, Bus),
    entry("Tunis", "Jendouba", 155.0, 150, 10.8, Bus),
    entry("Tunis", "Le Kef", 175.0, 170, 12.0, Bus),
    entry("Tunis", "Zaghouan", 60.0, 70, 4.6, Bus),
    entry("Sousse", "Monastir", 22.0, 30, 1.8, Bus),
    entry("Sousse", "Mahdia", 60.0, 60, 4.2, Bus),
    entry("Sousse", "Kairouan", 57.0, 60, 4.0, Bus),
    entry("Sfax", "Gabès", 140.0, 130, 9.5, Bus),
    entry("Sfax", "Gafsa", 200.0, 190, 14.0, Bus),
    entry("Gabès", "Médenine", 75.0, 75, 5.5, Bus),
    entry("Médenine", "Tataouine", 50.0, 50, 3.9, Bus),
    entry("Kairouan", "Sidi Bouzid", 95.0, 90, 7.0, Bus),
    entry("Kasserine", "Gafsa", 105.0, 100, 7.8, Bus),
    entry("Nabeul", "Hammamet", 13.0, 20, 1.2, Bus),
    entry("Gafsa", "Tozeur", 93.0, 85, 6.5, Bus),
    entry("Tozeur", "Kébili", 95.0, 90, 6.8, Bus),
    // Grandes líneas SNCFT
    entry("Tunis", "Sousse", 150.0, 140, 13.0, Train),
    entry("Tunis", "Sfax", 280.0, 270, 21.0, Train),
    entry("Tunis", "Gabès", 410.0, 420, 29.0, Train),
    entry("Tunis", "Bizerte", 75.0, 90, 4.5, Train),
    entry("Tunis", "Ghardimaou", 190.0, 240, 11.0, Train),
    entry("Tunis", "Nabeul", 70.0, 85, 4.2, Train),
    entry("Sfax", "Gafsa", 210.0, 270, 12.0, Train),
    entry("Gafsa", "Métlaoui", 40.0, 50, 2.5, Train),
    // Métro léger de Tunis y Métro du Sahel
    urban("Place Barcelone", "Ben Arous", 10.0, 25, 0.7, Metro),
    urban("Place Barcelone", "Ariana", 9.0, 25, 0.7, Metro),
    urban("Place Barcelone", "Den Den", 8.0, 22, 0.7, Metro),
    urban("République", "Ibn Khaldoun", 6.0, 18, 0.7, Metro),
    urban("Tunis Marine", "Intilaka", 11.0, 30, 0.7, Metro),
    urban("Place Barcelone", "El Mourouj", 12.0, 30, 0.7, Metro),
    entry("Sousse", "Monastir", 22.0, 35, 1.5, Metro),
    entry("Monastir", "Mahdia", 47.0, 70, 2.4, Metro),
    // TGM
    urban("Tunis Marine", "La Marsa", 19.0, 35, 0.9, Tgm),
    urban("Tunis Marine", "La Goulette", 10.0, 15, 0.7, Tgm),
    urban("Tunis Marine", "Carthage Hannibal", 16.0, 28, 0.8, Tgm),
    urban("La Goulette", "Sidi Bou Saïd", 8.0, 15, 0.7, Tgm),
    // Tranvía
    urban("Bab Saadoun", "Le Bardo", 4.0, 12, 0.6, Tram),
    urban("Place Barcelone", "Bab Alioua", 2.0, 8, 0.5, Tram),
    // Taxi
    urban("Tunis Centre", "Aéroport Tunis-Carthage", 8.0, 20, 10.0, Taxi),
    urban("Sousse Centre", "Port El Kantaoui", 10.0, 15, 8.0, Taxi),
    urban("Sfax Centre", "Aéroport Sfax-Thyna", 7.0, 15, 7.0, Taxi),
    entry("Tunis", "Hammamet", 65.0, 60, 45.0, Taxi),
    entry("Monastir", "Aéroport Monastir", 8.0, 12, 9.0, Taxi),
    // Ferry
    entry("Sfax", "Kerkennah", 20.0, 70, 2.5, Ferry),
    entry("Jorf", "Ajim", 2.0, 15, 1.0, Ferry),
    abroad("La Goulette", "Marseille", 880.0, 1320, 420.0, Ferry),
    abroad("La Goulette", "Gênes", 850.0, 1440, 380.0, Ferry),
    abroad("La Goulette", "Palerme", 330.0, 660, 180.0, Ferry),
    abroad("La Goulette", "Civitavecchia", 600.0, 1260, 300.0, Ferry),
    // Avion
    entry("Tunis", "Djerba", 420.0, 60, 140.0, Avion),
    entry("Tunis", "Tozeur", 400.0, 60, 130.0, Avion),
    entry("Tunis", "Sfax", 240.0, 50, 110.0, Avion),
    abroad("Tunis", "Paris", 1480.0, 150, 650.0, Avion),
    abroad("Tunis", "Rome", 600.0, 85, 420.0, Avion),
    abroad("Tunis", "Istanbul", 1700.0, 165, 780.0, Avion),
    abroad("Tunis", "Alger", 620.0, 80, 390.0, Avion),
    abroad("Tunis", "Tripoli", 540.0, 75, 360.0, Avion),
    abroad("Monastir", "Paris", 1600.0, 165, 600.0, Avion),
    abroad("Enfidha", "Londres", 2000.0, 200, 700.0, Avion),
];

/// Construye el catálogo completo: ida y vuelta por cada par, en orden fijo
pub fn catalog(company_id: i32) -> Vec<NewRoute> {
    CATALOG
        .iter()
        .flat_map(|e| {
            [(e.a, e.b), (e.b, e.a)].map(|(origin, destination)| NewRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
                distance: e.distance,
                estimated_duration: e.duration,
                base_price: e.price,
                company_id,
                transport_mode: e.mode,
                is_international: e.international,
                is_intra_city: e.intra_city,
            })
        })
        .collect()
}

pub struct RouteSeeder {
    routes: Arc<dyn RouteRepository>,
    company_id: i32,
}

impl RouteSeeder {
    pub fn new(routes: Arc<dyn RouteRepository>, company_id: i32) -> Self {
        Self { routes, company_id }
    }

    /// Carga el catálogo sólo si la tabla está vacía. Devuelve las filas insertadas.
    pub async fn populate_if_empty(&self) -> AppResult<usize> {
        let existing = self.routes.count().await?;
        if existing > 0 {
            info!("🛣️ Tabla de rutas con {} filas, no se carga el catálogo", existing);
            return Ok(0);
        }
        Ok(self.populate_all().await)
    }

    /// Inserta el catálogo completo; los fallos por fila se registran y se saltan
    pub async fn populate_all(&self) -> usize {
        let catalog = catalog(self.company_id);
        let total = catalog.len();
        let mut inserted = 0;

        for route in catalog {
            let label = format!("{} -> {} ({})", route.origin, route.destination, route.transport_mode);
            let result = match route.check() {
                Ok(()) => self.routes.create(route).await.map(|_| ()),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => inserted += 1,
                Err(e) => error!("❌ Ruta {} no insertada: {}", label, e),
            }
        }

        info!("✅ Catálogo de rutas cargado: {}/{} filas", inserted, total);
        inserted
    }
}
