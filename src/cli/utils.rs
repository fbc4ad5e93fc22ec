use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;

/// Print `data` wrapped in a success envelope (JSON) or as the text lines
/// produced by `text`
pub fn output_data<T: Serialize>(
    output_format: &OutputFormat,
    data: &T,
    text: impl FnOnce() -> Vec<String>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": true,
                "data": data
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            for line in text() {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Render an option list for text output, marking the current value
pub fn option_lines(options: &[String], current: &str) -> Vec<String> {
    options
        .iter()
        .map(|option| {
            let marker = if option == current { "*" } else { " " };
            format!("{} {}", marker, option)
        })
        .collect()
}

/// Display a possibly empty value
pub fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
