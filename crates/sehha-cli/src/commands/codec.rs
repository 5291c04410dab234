//! Offline coder commands: decode, encode, resolve and project raw values.

use std::io::Read;

use anyhow::{Context, anyhow};
use serde_json::Value;
use sehha_i18n::{
    BilingualValue, DEFAULT_TRANSLATABLE_FIELDS, current_locale, decode, decode_list_field,
    decode_transport, encode, encode_list_payload, prepare_for_edit, project, resolve_current,
};

use crate::cli::{EditArgs, EncodeArgs, OutputFormat, ProjectArgs, RawArgs, ResolveArgs};
use crate::client::{CliError, CliResult};
use crate::output::{render_bilingual, render_items, render_record};

pub(crate) fn handle_decode(args: &RawArgs, format: OutputFormat) -> CliResult<()> {
    let value = decode_input(&read_raw(args)?);
    render_bilingual(&value, format)
}

pub(crate) fn handle_encode(args: &EncodeArgs) {
    println!("{}", encode(&BilingualValue::new(&args.en, &args.ar)));
}

pub(crate) fn handle_resolve(args: &ResolveArgs) -> CliResult<()> {
    let raw = read_raw(&args.raw)?;
    println!("{}", resolve_current(Some(&raw), &args.fallback));
    Ok(())
}

pub(crate) fn handle_project(args: &ProjectArgs, format: OutputFormat) -> CliResult<()> {
    let raw = read_raw(&args.raw)?;
    let fields = field_names(&args.fields);
    let projected = project(Some(&raw), &fields, current_locale()).unwrap_or(Value::Null);
    render_record(&projected, format)
}

pub(crate) fn handle_edit(args: &EditArgs, format: OutputFormat) -> CliResult<()> {
    let raw = read_raw(&args.raw)?;
    let fields = field_names(&args.fields);
    let list_fields: Vec<&str> = args.list_fields.iter().map(String::as_str).collect();
    let prepared = prepare_for_edit(Some(&raw), &fields, &list_fields).unwrap_or(Value::Null);
    render_record(&prepared, format)
}

pub(crate) fn handle_items_decode(args: &RawArgs, format: OutputFormat) -> CliResult<()> {
    let items = decode_list_field(Some(&read_raw(args)?));
    render_items(&items, format)
}

pub(crate) fn handle_items_encode(args: &RawArgs) -> CliResult<()> {
    let items = decode_list_field(Some(&read_raw(args)?));
    println!("{}", encode_list_payload(&items));
    Ok(())
}

/// Strings are read in transport form, everything else is decoded as is.
pub(crate) fn decode_input(raw: &Value) -> BilingualValue {
    match raw {
        Value::String(text) => decode_transport(text),
        other => decode(Some(other)),
    }
}

/// Read the raw value from `--value`, `--file` or stdin.
pub(crate) fn read_raw(args: &RawArgs) -> CliResult<Value> {
    let text = match (&args.value, &args.file) {
        (Some(value), _) => value.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))
            .map_err(CliError::failure)?,
        (None, None) => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| CliError::failure(anyhow!("failed to read stdin: {err}")))?;
            buffer
        }
    };
    Ok(parse_raw_text(&text))
}

/// JSON text is parsed; anything else is taken as a plain string. Blank
/// input stands for a missing value.
pub(crate) fn parse_raw_text(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed)
        .unwrap_or_else(|_| Value::String(text.trim_end_matches(['\r', '\n']).to_string()))
}

/// Field names requested on the command line, or the default set.
pub(crate) fn field_names(requested: &[String]) -> Vec<&str> {
    if requested.is_empty() {
        DEFAULT_TRANSLATABLE_FIELDS.to_vec()
    } else {
        requested.iter().map(String::as_str).collect()
    }
}
