use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use dotenvy::dotenv;

use transport_manager::config::{DatabaseConfig, EnvironmentConfig, DEFAULT_JWT_SECRET};
use transport_manager::database::{DatabaseConnection, PgSchemaExecutor, SchemaManager};
use transport_manager::middleware::{cors_middleware, cors_middleware_with_origins, session_middleware};
use transport_manager::routes::create_api_router;
use transport_manager::services::{
    EmailSender, LogOnlyEmailSender, MailjetEmailService, NotificationOutbox, OutboxConsumer,
    RouteSeeder,
};
use transport_manager::state::AppState;

// Compañía propietaria de las rutas de referencia
const CATALOG_COMPANY_ID: i32 = 1;

const OUTBOX_DRAIN_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚆 Transport Manager API");
    info!("========================");

    let config = EnvironmentConfig::from_env();
    if config.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("⚠️ JWT_SECRET no configurado, se usa el secreto de desarrollo");
    }

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new(&DatabaseConfig::from_env()).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };
    let pool = db_connection.pool().clone();

    // Esquema: tablas base y columnas añadidas. Un fallo deja el servicio degradado.
    let schema = SchemaManager::new(PgSchemaExecutor::new(pool.clone()));
    if let Err(e) = schema.initialize().await {
        warn!("⚠️ Esquema incompleto, se continúa en modo degradado: {}", e);
    }

    // Outbox de notificaciones
    let (outbox, receiver) = NotificationOutbox::channel();
    let state = AppState::new(pool, config.clone(), outbox)?;

    let mailer: Arc<dyn EmailSender> = if config.mail_enabled() {
        Arc::new(MailjetEmailService::new(&config)?)
    } else {
        warn!("⚠️ MAILJET_API_KEY/MAILJET_API_SECRET no configurados, emails sólo en log");
        Arc::new(LogOnlyEmailSender)
    };
    let consumer = OutboxConsumer::new(receiver, state.users.clone(), mailer).spawn();

    if config.seed_routes {
        let seeder = RouteSeeder::new(state.routes.clone(), CATALOG_COMPANY_ID);
        match seeder.populate_if_empty().await {
            Ok(0) => {}
            Ok(inserted) => info!("🛣️ {} rutas de referencia insertadas", inserted),
            Err(e) => warn!("⚠️ No se pudo cargar el catálogo de rutas: {}", e),
        }
    }

    let cors = if config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(&config.cors_origins)
    };

    let app = Router::new()
        .merge(create_api_router())
        .layer(axum::middleware::from_fn_with_state(state.jwt.clone(), session_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = config.server_url().parse()?;
    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   GET|POST /api/routes, GET /api/routes/:id");
    info!("   GET|POST /api/reservations, /api/reservations/:id[/confirm|/cancel|/status]");
    info!("   GET|POST /api/stations");
    info!("   GET|POST /api/organisations, /api/organisations/:id/routes");
    info!("   GET|POST /api/transports, PUT /api/transports/:id/availability");
    info!("   /api/fleet/vehicules[/:id/status|/:id/maintenance], /api/fleet/conducteurs[/:id/vehicule]");
    info!("   GET|POST /api/subscriptions, POST /api/subscriptions/:id/pay");
    info!("   POST /api/users, POST /api/users/:id/profile-image, POST /api/auth/login");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
    }

    // El router ya no existe: el outbox se cierra y el consumidor drena lo pendiente
    match tokio::time::timeout(OUTBOX_DRAIN_TIMEOUT, consumer).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("❌ Consumidor de notificaciones terminó con error: {}", e),
        Err(_) => warn!("⚠️ Notificaciones pendientes descartadas al apagar"),
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
