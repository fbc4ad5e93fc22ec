use tracing::debug;

use super::lookup::GeographicLookup;
use super::selection::{AddressLevel, AddressPatch, AddressSelection};

/// Set `level` to `new_value` and clear, in the same step, every deeper level
/// whose value is no longer offered under its freshly computed parent.
///
/// Membership is checked against the new option lists, so a child that is
/// also listed under the new parent keeps its value. Free-text fields are
/// never touched.
pub fn apply_address_change(
    current: &AddressSelection,
    lookup: &GeographicLookup,
    level: AddressLevel,
    new_value: &str,
) -> AddressSelection {
    let mut next = current.clone();
    next.set(level, new_value);
    clear_invalid_below(&mut next, lookup, level);
    next
}

/// The consolidated `onChange` payload for a single edit: only the fields
/// that differ from `current`
pub fn address_change_patch(
    current: &AddressSelection,
    lookup: &GeographicLookup,
    level: AddressLevel,
    new_value: &str,
) -> AddressPatch {
    let next = apply_address_change(current, lookup, level, new_value);
    AddressPatch::diff(current, &next)
}

/// Patch that brings an externally supplied selection back to a consistent
/// state: the shallowest invalid level and everything under it are cleared.
/// Empty when the selection is already consistent.
pub fn reconcile(selection: &AddressSelection, lookup: &GeographicLookup) -> AddressPatch {
    let Some(invalid) = selection.first_invalid_level(lookup) else {
        return AddressPatch::default();
    };

    let mut next = selection.clone();
    next.set(invalid, "");
    for level in invalid.deeper() {
        next.set(level, "");
    }
    debug!("Reconciled address: cleared from {} down", invalid);
    AddressPatch::diff(selection, &next)
}

/// True when `value` may be chosen at `level` given the parents in `selection`.
/// The empty string always is: it means "nothing chosen".
pub fn is_offered(
    selection: &AddressSelection,
    lookup: &GeographicLookup,
    level: AddressLevel,
    value: &str,
) -> bool {
    value.is_empty() || lookup.contains(level, selection, value)
}

fn clear_invalid_below(selection: &mut AddressSelection, lookup: &GeographicLookup, level: AddressLevel) {
    for child in level.deeper() {
        let value = selection.get(child);
        if value.is_empty() || lookup.contains(child, selection, value) {
            continue;
        }
        debug!("Clearing {} '{}' after {} change", child, value, level);
        selection.set(child, "");
    }
}
