// handlers/address/ward.rs - GET /api/address/ward-display

use axum::extract::Query;
use serde::{Deserialize, Serialize};

use crate::address::to_latin_digits;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct WardQuery {
    #[serde(default)]
    pub ward: String,
}

#[derive(Debug, Serialize)]
pub struct WardDisplay {
    pub ward: String,
    pub display: String,
}

/// GET /api/address/ward-display?ward=७ - ASCII rendering of a ward label.
/// The stored value is echoed back untouched.
pub async fn ward_display_get(Query(query): Query<WardQuery>) -> ApiResult<WardDisplay> {
    let display = to_latin_digits(&query.ward);
    Ok(ApiResponse::success(WardDisplay {
        ward: query.ward,
        display,
    }))
}
