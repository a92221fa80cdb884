use catalog_service::config::{startup_log_filter, ServiceConfig};
use catalog_service::utils::file::load_catalog_file;
use catalog_service::{app, AppState};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = ServiceConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(startup_log_filter(&config)))
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Loading catalog from {}", config.catalog_path);
    let catalog = match load_catalog_file(&config.catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load catalog from {}: {}", config.catalog_path, e);
            std::process::exit(1);
        }
    };
    info!(
        "Catalog loaded: {} books, {} authors, {} genres",
        catalog.len(),
        catalog.references().authors.len(),
        catalog.references().genres.len()
    );

    let app = app(AppState::new(
        catalog,
        config.books_per_page,
        config.session_ttl,
    ));

    let addr = config.bind_addr();
    info!(
        "Catalog service starting on {} ({} books per page, sessions expire after {}s idle)",
        addr,
        config.books_per_page,
        config.session_ttl.as_secs()
    );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
