use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use enrollment_service::config::AppConfig;
use enrollment_service::db;
use enrollment_service::handler::EnrollmentHandler;
use enrollment_service::routes::router;
use enrollment_service::services::EnrollmentService;
use enrollment_service::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "enrollment_service=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let service = match &config.database_url {
        Some(database_url) => {
            let (store, pool) = db::store_from_url(database_url, config.max_connections);
            if config.run_migrations {
                if let Some(pool) = &pool {
                    // a broken database is reported per request, not at startup
                    if let Err(e) = db::run_migrations(pool).await {
                        error!("failed to run migrations: {}", e);
                    }
                }
            }
            EnrollmentService::new(store)
        }
        None => {
            warn!("DATABASE_URL is not set; enrollment storage is unavailable");
            EnrollmentService::unconfigured()
        }
    };

    let state = AppState {
        handler: EnrollmentHandler::new(service),
    };

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
