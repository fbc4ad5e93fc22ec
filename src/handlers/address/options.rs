// handlers/address/options.rs - GET /api/address/options/:level

use axum::extract::{Extension, Path, Query};
use serde::Serialize;

use crate::address::{level_control, reconcile, AddressLevel, AddressSelection};
use crate::middleware::{ApiResponse, ApiResult, LoadedLookup};

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub level: AddressLevel,
    pub value: String,
    pub enabled: bool,
    pub options: Vec<String>,
}

/**
 * GET /api/address/options/:level - Options for one level
 *
 * The current selection is passed as query parameters
 * (`?province=Bagmati&district=Kathmandu`); only the parent of `:level`
 * matters. A stale selection is repaired first, so a district that is not
 * listed under the given province leaves municipality disabled. A level whose
 * parent is empty, or whose lookup failed to load, is reported disabled with
 * no options.
 */
pub async fn options_get(
    Path(level): Path<String>,
    Query(mut selection): Query<AddressSelection>,
    Extension(loaded): Extension<LoadedLookup>,
) -> ApiResult<OptionsResponse> {
    let level: AddressLevel = level.parse()?;
    if loaded.is_ready() {
        reconcile(&selection, &loaded.lookup).merge_into(&mut selection);
    }
    let control = level_control(&loaded.lookup, &selection, level, loaded.state);

    Ok(ApiResponse::success(OptionsResponse {
        level,
        enabled: control.is_enabled(),
        options: control.options().to_vec(),
        value: control.value,
    }))
}
