// handlers/address/change.rs - POST /api/address/change, POST /api/address/reconcile

use axum::{extract::Extension, response::Json};
use serde::{Deserialize, Serialize};

use crate::address::{
    apply_address_change, is_offered, reconcile, AddressLevel, AddressPatch, AddressSelection,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, LoadedLookup};

#[derive(Debug, Deserialize)]
pub struct ChangeRequest {
    #[serde(default)]
    pub selection: AddressSelection,
    pub level: AddressLevel,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ChangeResponse {
    /// Selection after the patch is merged
    pub selection: AddressSelection,
    /// Consolidated update for the host form
    pub patch: AddressPatch,
}

/**
 * POST /api/address/change - Apply one edit to an address
 *
 * Expected Input:
 * ```json
 * {
 *   "selection": { "province": "Bagmati", "district": "Kathmandu", ... },
 *   "level": "province",
 *   "value": "Gandaki"
 * }
 * ```
 *
 * The response patch holds the edited field plus every dependent field that
 * had to be cleared, e.g. district, municipality and ward when the old
 * district is not listed under the new province. A stale incoming selection
 * is repaired first and those clears are folded into the same patch.
 *
 * Values that the parent level does not offer are rejected with 422.
 */
pub async fn change_post(
    Extension(loaded): Extension<LoadedLookup>,
    Json(request): Json<ChangeRequest>,
) -> ApiResult<ChangeResponse> {
    let lookup = loaded.lookup.as_ref();
    let original = request.selection;

    let mut current = original.clone();
    reconcile(&current, lookup).merge_into(&mut current);

    if !is_offered(&current, lookup, request.level, &request.value) {
        let reason = match current.parent_value(request.level) {
            Some("") => format!("'{}' cannot be chosen before a {}", request.value, parent_name(request.level)),
            Some(parent) => format!("'{}' is not listed under '{}'", request.value, parent),
            None => format!("'{}' is not a known province", request.value),
        };
        return Err(ApiError::invalid_field(request.level.as_str(), reason));
    }

    let selection = apply_address_change(&current, lookup, request.level, &request.value);
    let patch = AddressPatch::diff(&original, &selection);
    tracing::debug!("Address change {}={:?} -> {:?}", request.level, request.value, patch);

    Ok(ApiResponse::success(ChangeResponse { selection, patch }))
}

/// POST /api/address/reconcile - Repair a selection whose children no longer
/// match their parents; the patch is empty when nothing needed clearing
pub async fn reconcile_post(
    Extension(loaded): Extension<LoadedLookup>,
    Json(selection): Json<AddressSelection>,
) -> ApiResult<ChangeResponse> {
    let patch = reconcile(&selection, &loaded.lookup);
    let mut repaired = selection;
    patch.merge_into(&mut repaired);

    Ok(ApiResponse::success(ChangeResponse {
        selection: repaired,
        patch,
    }))
}

fn parent_name(level: AddressLevel) -> &'static str {
    level.parent().map(AddressLevel::as_str).unwrap_or("province")
}
