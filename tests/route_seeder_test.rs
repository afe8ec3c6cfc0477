mod common;

use std::sync::Arc;

use common::{sample_route, InMemoryRoutes};
use transport_manager::services::route_seeder::catalog;
use transport_manager::services::RouteSeeder;

#[tokio::test]
async fn test_empty_table_receives_full_catalog() {
    let routes = Arc::new(InMemoryRoutes::default());
    let seeder = RouteSeeder::new(routes.clone(), 1);

    let inserted = seeder.populate_if_empty().await.unwrap();

    assert_eq!(inserted, catalog(1).len());
    assert_eq!(routes.len(), catalog(1).len());
}

#[tokio::test]
async fn test_populate_if_empty_runs_once() {
    let routes = Arc::new(InMemoryRoutes::default());
    let seeder = RouteSeeder::new(routes.clone(), 1);

    seeder.populate_if_empty().await.unwrap();
    let second = seeder.populate_if_empty().await.unwrap();

    assert_eq!(second, 0);
    assert_eq!(routes.len(), catalog(1).len());
}

#[tokio::test]
async fn test_non_empty_table_is_left_alone() {
    let routes = Arc::new(InMemoryRoutes::with_route(sample_route(1, 12.0)));
    let seeder = RouteSeeder::new(routes.clone(), 1);

    assert_eq!(seeder.populate_if_empty().await.unwrap(), 0);
    assert_eq!(routes.len(), 1);
}

#[tokio::test]
async fn test_populate_all_does_not_deduplicate() {
    let routes = Arc::new(InMemoryRoutes::default());
    let seeder = RouteSeeder::new(routes.clone(), 1);

    seeder.populate_all().await;
    seeder.populate_all().await;

    assert_eq!(routes.len(), catalog(1).len() * 2);
}

#[tokio::test]
async fn test_failing_rows_are_skipped() {
    let routes = Arc::new(InMemoryRoutes {
        failing_origins: vec!["Djerba".to_string()],
        ..Default::default()
    });
    let seeder = RouteSeeder::new(routes.clone(), 1);

    let failing = catalog(1).iter().filter(|r| r.origin == "Djerba").count();
    assert!(failing > 0);

    let inserted = seeder.populate_all().await;
    assert_eq!(inserted, catalog(1).len() - failing);
    assert_eq!(routes.len(), inserted);
}

#[tokio::test]
async fn test_seeded_routes_satisfy_route_invariants() {
    let routes = Arc::new(InMemoryRoutes::default());
    RouteSeeder::new(routes.clone(), 7).populate_all().await;

    for route in routes.rows.lock().unwrap().iter() {
        assert!(!route.origin.eq_ignore_ascii_case(&route.destination));
        assert!(route.distance >= 0.0);
        assert!(route.estimated_duration >= 0);
        assert!(route.base_price >= 0.0);
        assert_eq!(route.company_id, 7);
    }
}
