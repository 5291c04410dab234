//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use serde::Serialize;
use serde_json::Value;
use sehha_i18n::{BilingualValue, DecodedItem};

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const LABEL_KEYS: &[&str] = &["name", "title", "full_name"];

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_bilingual(value: &BilingualValue, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => {
            println!("en: {}", value.en);
            println!("ar: {}", value.ar);
            Ok(())
        }
    }
}

pub(crate) fn render_record(record: &Value, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(record),
        OutputFormat::Table => {
            match record {
                Value::Object(fields) => {
                    for (key, value) in fields {
                        println!("{key}: {}", cell_text(value));
                    }
                }
                other => println!("{}", cell_text(other)),
            }
            Ok(())
        }
    }
}

pub(crate) fn render_records(records: &[Value], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(records),
        OutputFormat::Table => {
            println!("{:<10} LABEL", "ID");
            for record in records {
                println!(
                    "{:<10} {}",
                    record.get("id").map(cell_text).unwrap_or_default(),
                    record_label(record)
                );
            }
            println!("{} record(s)", records.len());
            Ok(())
        }
    }
}

pub(crate) fn render_items(items: &[DecodedItem], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(items),
        OutputFormat::Table => {
            println!("{:<12} {:>5} {:<32} AR", "ID", "ORDER", "EN");
            print_item_rows(items, 0);
            Ok(())
        }
    }
}

fn print_item_rows(items: &[DecodedItem], depth: usize) {
    let indent = "  ".repeat(depth);
    for item in items {
        let english = format!("{indent}{}", item.title.en);
        println!(
            "{:<12} {:>5} {english:<32} {}",
            item.id.to_string(),
            item.sort_order.to_string(),
            item.title.ar
        );
        print_item_rows(&item.service_list, depth + 1);
        print_item_rows(&item.items, depth + 1);
    }
}

/// Display label of a record: the first of `name`, `title` or `full_name`
/// that holds text.
pub(crate) fn record_label(record: &Value) -> String {
    LABEL_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(|value| match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "<untitled>".to_string())
}

/// Table cell text: strings unquoted, other JSON compact.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn labels_prefer_name_then_title() {
        assert_eq!(record_label(&json!({"name": "Dr. Salem", "title": "x"})), "Dr. Salem");
        assert_eq!(record_label(&json!({"name": "", "title": "Offer"})), "Offer");
        assert_eq!(record_label(&json!({"name": {"en": "raw"}})), "<untitled>");
    }

    #[test]
    fn cells_render_strings_without_quotes() {
        assert_eq!(cell_text(&json!("مرحبا")), "مرحبا");
        assert_eq!(cell_text(&json!(3)), "3");
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!({"en": "A"})), r#"{"en":"A"}"#);
    }
}
