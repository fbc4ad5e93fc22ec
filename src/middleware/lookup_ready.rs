use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::address::{GeographicLookup, LoadState};
use crate::error::ApiError;

/// Address lookup shared with handlers through a request extension
#[derive(Clone, Debug)]
pub struct LoadedLookup {
    pub lookup: Arc<GeographicLookup>,
    pub state: LoadState,
}

impl LoadedLookup {
    pub fn new(lookup: Arc<GeographicLookup>, state: LoadState) -> Self {
        Self { lookup, state }
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }
}

/// Rejects requests that need a loaded lookup with 503 while it is missing.
/// A failed load stays failed until the process restarts.
pub async fn require_lookup_middleware(request: Request, next: Next) -> Response {
    let ready = request
        .extensions()
        .get::<LoadedLookup>()
        .is_some_and(LoadedLookup::is_ready);

    if !ready {
        tracing::warn!("Rejecting {} {}: address lookup not loaded", request.method(), request.uri().path());
        return ApiError::service_unavailable("Address lookup unavailable").into_response();
    }

    next.run(request).await
}
