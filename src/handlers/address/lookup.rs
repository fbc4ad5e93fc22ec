// handlers/address/lookup.rs - GET /api/address/lookup

use axum::extract::Extension;

use crate::address::GeographicLookup;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, LoadedLookup};

/// GET /api/address/lookup - The whole cached lookup, in the same shape as
/// the four static documents
pub async fn lookup_get(Extension(loaded): Extension<LoadedLookup>) -> ApiResult<GeographicLookup> {
    if !loaded.is_ready() {
        return Err(ApiError::service_unavailable("Address lookup unavailable"));
    }
    Ok(ApiResponse::success(loaded.lookup.as_ref().clone()))
}
