//! Display language commands.

use anyhow::anyhow;
use serde::Serialize;
use sehha_config::{LocaleSource, PreferenceStore, SystemEnv, load_locale, persist_locale};
use sehha_i18n::{LocaleCode, current_locale, set_current_locale};

use crate::cli::{LocaleSetArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::output::print_json;

#[derive(Debug, Serialize)]
pub(crate) struct LocaleReport {
    active: LocaleCode,
    label: &'static str,
    direction: &'static str,
    startup: LocaleCode,
    source: &'static str,
}

pub(crate) fn handle_locale_show(
    store: &impl PreferenceStore,
    format: OutputFormat,
) -> CliResult<()> {
    let report = locale_report(store, current_locale());
    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Table => {
            println!("active: {} ({})", report.active, report.label);
            println!("direction: {}", report.direction);
            println!("startup: {} (from {})", report.startup, report.source);
            Ok(())
        }
    }
}

pub(crate) fn handle_locale_set(store: &impl PreferenceStore, args: &LocaleSetArgs) -> CliResult<()> {
    persist_locale(store, args.locale)
        .map_err(|err| CliError::failure(anyhow!(err).context("failed to save locale preference")))?;
    set_current_locale(args.locale);
    println!(
        "Display language set to {} ({}).",
        args.locale.label(),
        args.locale
    );
    Ok(())
}

pub(crate) fn locale_report(store: &impl PreferenceStore, active: LocaleCode) -> LocaleReport {
    let startup = load_locale(store, &SystemEnv);
    LocaleReport {
        active,
        label: active.label(),
        direction: if active.rtl() { "rtl" } else { "ltr" },
        startup: startup.locale,
        source: source_label(startup.source),
    }
}

const fn source_label(source: LocaleSource) -> &'static str {
    match source {
        LocaleSource::Preference => "preference",
        LocaleSource::Environment => "environment",
        LocaleSource::Default => "default",
    }
}
