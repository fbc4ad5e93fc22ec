use homestay_api_rust::address::{LoadState, SharedLookup};
use homestay_api_rust::middleware::LoadedLookup;
use homestay_api_rust::{is_development, server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up HOMESTAY_LOOKUP_DIR, PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = homestay_api_rust::config::config();
    tracing::info!("Starting Homestay API in {:?} mode", config.environment);

    let shared = SharedLookup::global();
    let lookup = match config.lookup_source() {
        Ok(source) => shared.get_or_load(source.as_ref()).await,
        Err(e) => {
            tracing::error!("Address lookup source misconfigured: {}", e);
            std::sync::Arc::new(homestay_api_rust::address::GeographicLookup::empty())
        }
    };
    let state = match shared.state() {
        LoadState::Ready => LoadState::Ready,
        _ => LoadState::Failed,
    };

    if is_development!() && state == LoadState::Ready {
        for issue in lookup.consistency_issues() {
            tracing::warn!(
                "Lookup {} '{}' (under '{}') has no child table",
                issue.level,
                issue.name,
                issue.parent
            );
        }
    }

    let app = server::app(LoadedLookup::new(lookup, state), config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Homestay API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
