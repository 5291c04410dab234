//! Command-line client for bilingual content on a Sehha portal backend.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sehha_api_models::Resource;
use sehha_config::{
    FilePreferenceStore, SystemEnv, default_preferences_path, load_locale, load_token,
};
use sehha_i18n::{LocaleCode, set_current_locale};
use sehha_telemetry::{InvocationContext, LoggingConfig, init_logging};
use tracing::{Instrument, debug, warn};
use url::Url;

use crate::client::{AppContext, CliResult, build_client, parse_url};
use crate::commands::auth::{handle_auth_clear, handle_auth_set};
use crate::commands::codec::{
    handle_decode, handle_edit, handle_encode, handle_items_decode, handle_items_encode,
    handle_project, handle_resolve,
};
use crate::commands::locale::{handle_locale_set, handle_locale_show};
use crate::commands::records::{handle_list, handle_show, handle_submit};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Parses CLI arguments, bootstraps logging and the display locale, executes
/// the requested command, and returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LoggingConfig::default()) {
        eprintln!("warning: {err:#}");
    }

    let store = FilePreferenceStore::new(
        cli.prefs
            .clone()
            .unwrap_or_else(|| default_preferences_path(&SystemEnv)),
    );
    let startup = load_locale(&store, &SystemEnv);
    let locale = cli.lang.unwrap_or(startup.locale);
    set_current_locale(locale);

    let invocation = InvocationContext::new(command_label(&cli.command), locale.code());
    debug!(
        locale = %locale,
        source = ?startup.source,
        overridden = cli.lang.is_some(),
        "display locale selected"
    );

    let span = invocation.span().clone();
    let result = dispatch(cli, &store, invocation.request_id())
        .instrument(span)
        .await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, store: &FilePreferenceStore, request_id: &str) -> CliResult<()> {
    let output = cli.output;
    match cli.command {
        Command::Decode(args) => handle_decode(&args, output),
        Command::Encode(args) => {
            handle_encode(&args);
            Ok(())
        }
        Command::Resolve(args) => handle_resolve(&args),
        Command::Project(args) => handle_project(&args, output),
        Command::Edit(args) => handle_edit(&args, output),
        Command::Items(ItemsCommand::Decode(args)) => handle_items_decode(&args, output),
        Command::Items(ItemsCommand::Encode(args)) => handle_items_encode(&args),
        Command::Locale(LocaleCommand::Show) => handle_locale_show(store, output),
        Command::Locale(LocaleCommand::Set(args)) => handle_locale_set(store, &args),
        Command::Auth(AuthCommand::Set(args)) => handle_auth_set(store, &args),
        Command::Auth(AuthCommand::Clear) => handle_auth_clear(store),
        Command::List(args) => {
            let ctx = remote_context(&cli.remote, store, request_id)?;
            handle_list(&ctx, &args, output).await
        }
        Command::Show(args) => {
            let ctx = remote_context(&cli.remote, store, request_id)?;
            handle_show(&ctx, &args, output).await
        }
        Command::Submit(args) => {
            let ctx = remote_context(&cli.remote, store, request_id)?;
            handle_submit(&ctx, &args, output).await
        }
    }
}

fn remote_context(
    remote: &RemoteArgs,
    store: &FilePreferenceStore,
    request_id: &str,
) -> CliResult<AppContext> {
    let token = remote
        .token
        .clone()
        .filter(|token| !token.trim().is_empty())
        .or_else(|| {
            load_token(store).unwrap_or_else(|err| {
                warn!(error = %err, "failed to read stored API token");
                None
            })
        });
    Ok(AppContext {
        client: build_client(remote.timeout, request_id)?,
        base_url: remote.api_url.clone(),
        token,
    })
}

#[derive(Parser)]
#[command(
    name = "sehha",
    about = "Inspect, normalize and submit bilingual Sehha portal content"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) remote: RemoteArgs,
    #[arg(
        long,
        global = true,
        value_parser = parse_locale,
        help = "Display language for this invocation (en or ar)"
    )]
    pub(crate) lang: Option<LocaleCode>,
    #[arg(
        long,
        global = true,
        help = "Preference file (defaults to SEHHA_PREFS or the user config directory)"
    )]
    pub(crate) prefs: Option<PathBuf>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Args)]
pub(crate) struct RemoteArgs {
    #[arg(
        long,
        global = true,
        env = "SEHHA_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(long, global = true, env = "SEHHA_API_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "SEHHA_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Decode a raw translatable value into its canonical `{en, ar}` form.
    Decode(RawArgs),
    /// Encode English and Arabic text into the submission string.
    Encode(EncodeArgs),
    /// Resolve a raw translatable value for the display locale.
    Resolve(ResolveArgs),
    /// Flatten the translatable fields of a record for display.
    Project(ProjectArgs),
    /// Expand the translatable fields of a record for editing.
    Edit(EditArgs),
    /// Decode or encode lists of bilingual items.
    #[command(subcommand)]
    Items(ItemsCommand),
    /// Show or switch the display language.
    #[command(subcommand)]
    Locale(LocaleCommand),
    /// Store or forget the API token.
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Fetch and display the records of a resource.
    List(ListArgs),
    /// Fetch and display one record.
    Show(ShowArgs),
    /// Submit an edited record as a multipart form.
    Submit(SubmitArgs),
}

#[derive(Subcommand)]
pub(crate) enum ItemsCommand {
    /// Decode a raw list (array, legacy wrapper or payload string).
    Decode(RawArgs),
    /// Decode then encode a list into the wire payload.
    Encode(RawArgs),
}

#[derive(Subcommand)]
pub(crate) enum LocaleCommand {
    /// Print the active display language and where it came from.
    Show,
    /// Persist a new display language.
    Set(LocaleSetArgs),
}

#[derive(Subcommand)]
pub(crate) enum AuthCommand {
    /// Remember an API token in the preference file.
    Set(AuthSetArgs),
    /// Forget the stored API token.
    Clear,
}

/// Raw JSON input taken from a flag, a file or stdin.
#[derive(Args, Default)]
pub(crate) struct RawArgs {
    #[arg(long, conflicts_with = "file", help = "Raw JSON value (plain text is a string)")]
    pub(crate) value: Option<String>,
    #[arg(short = 'f', long = "file", help = "Read the raw value from a file")]
    pub(crate) file: Option<PathBuf>,
}

#[derive(Args, Default)]
pub(crate) struct EncodeArgs {
    #[arg(long, default_value = "")]
    pub(crate) en: String,
    #[arg(long, default_value = "")]
    pub(crate) ar: String,
}

#[derive(Args, Default)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    pub(crate) raw: RawArgs,
    #[arg(long, default_value = "", help = "Text used when nothing resolves")]
    pub(crate) fallback: String,
}

#[derive(Args, Default)]
pub(crate) struct ProjectArgs {
    #[command(flatten)]
    pub(crate) raw: RawArgs,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Translatable fields (defaults to the standard set)"
    )]
    pub(crate) fields: Vec<String>,
}

#[derive(Args, Default)]
pub(crate) struct EditArgs {
    #[command(flatten)]
    pub(crate) raw: RawArgs,
    #[arg(
        long,
        value_delimiter = ',',
        help = "Translatable fields (defaults to the standard set)"
    )]
    pub(crate) fields: Vec<String>,
    #[arg(long, value_delimiter = ',', help = "Fields holding bilingual item lists")]
    pub(crate) list_fields: Vec<String>,
}

#[derive(Args)]
pub(crate) struct LocaleSetArgs {
    #[arg(value_parser = parse_locale)]
    pub(crate) locale: LocaleCode,
}

#[derive(Args)]
pub(crate) struct AuthSetArgs {
    pub(crate) token: String,
}

#[derive(Args)]
pub(crate) struct ListArgs {
    #[arg(value_parser = parse_resource)]
    pub(crate) resource: Resource,
    #[arg(long, help = "Print records without locale projection")]
    pub(crate) raw: bool,
}

#[derive(Args)]
pub(crate) struct ShowArgs {
    #[arg(value_parser = parse_resource)]
    pub(crate) resource: Resource,
    pub(crate) id: String,
    #[arg(long, conflicts_with = "edit", help = "Print the record without locale projection")]
    pub(crate) raw: bool,
    #[arg(long, help = "Print the record as an edit form would load it")]
    pub(crate) edit: bool,
}

#[derive(Args)]
pub(crate) struct SubmitArgs {
    #[arg(value_parser = parse_resource)]
    pub(crate) resource: Resource,
    #[arg(short = 'f', long = "file", help = "JSON file holding the edited record")]
    pub(crate) file: PathBuf,
    #[arg(long, help = "Update this record instead of creating a new one")]
    pub(crate) id: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Decode(_) => "decode",
        Command::Encode(_) => "encode",
        Command::Resolve(_) => "resolve",
        Command::Project(_) => "project",
        Command::Edit(_) => "edit",
        Command::Items(ItemsCommand::Decode(_)) => "items_decode",
        Command::Items(ItemsCommand::Encode(_)) => "items_encode",
        Command::Locale(LocaleCommand::Show) => "locale_show",
        Command::Locale(LocaleCommand::Set(_)) => "locale_set",
        Command::Auth(AuthCommand::Set(_)) => "auth_set",
        Command::Auth(AuthCommand::Clear) => "auth_clear",
        Command::List(_) => "list",
        Command::Show(_) => "show",
        Command::Submit(_) => "submit",
    }
}

fn parse_locale(input: &str) -> Result<LocaleCode, String> {
    input
        .parse::<LocaleCode>()
        .map_err(|_| format!("unsupported locale '{input}' (expected en or ar)"))
}

fn parse_resource(input: &str) -> Result<Resource, String> {
    input.parse::<Resource>().map_err(|_| {
        let known: Vec<&str> = Resource::all().iter().map(|resource| resource.slug()).collect();
        format!("unknown resource '{input}' (expected one of {})", known.join(", "))
    })
}
