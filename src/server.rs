use axum::{
    extract::Extension,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::address::LoadState;
use crate::config::AppConfig;
use crate::handlers::address;
use crate::middleware::{require_lookup_middleware, ApiResponse, LoadedLookup};

pub fn app(loaded: LoadedLookup, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Static lookup documents, so an HTTP lookup source can point back here
        .nest_service("/data", ServeDir::new(&config.lookup.dir))
        .merge(address_routes())
        .layer(Extension(loaded));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn address_routes() -> Router {
    let edits = Router::new()
        .route("/api/address/change", post(address::change_post))
        .route("/api/address/reconcile", post(address::reconcile_post))
        .route_layer(middleware::from_fn(require_lookup_middleware));

    Router::new()
        .route("/api/address/lookup", get(address::lookup_get))
        .route("/api/address/options/:level", get(address::options_get))
        .route("/api/address/ward-display", get(address::ward_display_get))
        .merge(edits)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Homestay API (Rust)",
            "version": version,
            "description": "Cascading province/district/municipality/ward lookup for homestay registration",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "data": "/data/{allProvinces,provinceDistrictsMap,districtMunicipalitiesMap,municipalitiesWardsMap}.json (static)",
                "lookup": "/api/address/lookup",
                "options": "/api/address/options/:level",
                "change": "/api/address/change (POST)",
                "reconcile": "/api/address/reconcile (POST)",
                "ward_display": "/api/address/ward-display?ward=",
            }
        }
    }))
}

async fn health(Extension(loaded): Extension<LoadedLookup>) -> ApiResponse<Value> {
    let now = chrono::Utc::now();
    let status = if loaded.is_ready() { "ok" } else { "degraded" };
    let data = json!({
        "status": status,
        "timestamp": now,
        "lookup": loaded.state,
        "provinces": loaded.lookup.all_provinces.len(),
    });

    match loaded.state {
        LoadState::Ready => ApiResponse::success(data),
        LoadState::Loading | LoadState::Failed => ApiResponse::degraded(data),
    }
}
