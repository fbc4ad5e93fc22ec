use serde_json::json;

use crate::address::{
    address_change_patch, is_offered, level_control, reconcile, to_latin_digits, AddressLevel,
    AddressSelection, LoadState,
};
use crate::cli::utils::{option_lines, or_dash, output_data};
use crate::cli::{OutputFormat, SourceArgs};

pub async fn options(
    level: &str,
    selection: AddressSelection,
    source: &SourceArgs,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let level: AddressLevel = level.parse()?;
    let lookup = source.load().await?;

    let mut selection = selection;
    reconcile(&selection, &lookup).merge_into(&mut selection);
    let control = level_control(&lookup, &selection, level, LoadState::Ready);

    let data = json!({
        "level": level,
        "enabled": control.is_enabled(),
        "options": control.options(),
    });
    output_data(&output_format, &data, || {
        if control.is_enabled() {
            option_lines(control.options(), &control.value)
        } else {
            vec![format!("{} is disabled: choose a {} first", level, parent_label(level))]
        }
    })
}

pub async fn change(
    level: &str,
    value: &str,
    selection: AddressSelection,
    source: &SourceArgs,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let level: AddressLevel = level.parse()?;
    let lookup = source.load().await?;

    let mut current = selection;
    reconcile(&current, &lookup).merge_into(&mut current);
    if !is_offered(&current, &lookup, level, value) {
        anyhow::bail!("'{}' is not offered at {} for the given selection", value, level);
    }

    let patch = address_change_patch(&current, &lookup, level, value);
    let mut next = current.clone();
    patch.merge_into(&mut next);

    let data = json!({ "patch": patch, "selection": next });
    output_data(&output_format, &data, || {
        AddressLevel::ALL
            .into_iter()
            .map(|l| {
                let changed = if patch.get(l).is_some() { " (changed)" } else { "" };
                format!("{:<13} {}{}", l.as_str(), or_dash(next.get(l)), changed)
            })
            .collect()
    })
}

pub fn ward(value: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let display = to_latin_digits(value);
    let data = json!({ "ward": value, "display": display });
    output_data(&output_format, &data, || vec![display.clone()])
}

fn parent_label(level: AddressLevel) -> &'static str {
    level.parent().map(AddressLevel::as_str).unwrap_or("province")
}
