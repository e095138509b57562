use std::fmt::Write;
use std::path::PathBuf;

use clap::{
    ArgAction, ColorChoice, Parser, ValueEnum,
    builder::{
        BoolishValueParser, Styles,
        styling::{AnsiColor, Effects},
    },
};
use livequery::app_dirs;

/// Version banner that also shows where configuration and scripts live.
fn long_version() -> &'static str {
    let config_dir = match app_dirs::get_config_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };
    let data_dir = match app_dirs::get_data_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };

    let mut details = format!("livequery {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(details);
    let _ = writeln!(details, "config directory: {config_dir}");
    let _ = writeln!(details, "data directory: {data_dir}");

    Box::leak(details.into_boxed_str())
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
}

pub(crate) fn parse_cli() -> CliArgs {
    CliArgs::parse()
}

/// Command-line arguments accepted by the `livequery` binary.
#[derive(Parser, Debug, Default)]
#[command(
    name = "livequery",
    version,
    long_version = long_version(),
    about = "Run a live search session against a scripted backend",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
pub(crate) struct CliArgs {
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "LIVEQUERY_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        long = "scope",
        value_name = "ID",
        help = "Scope the query belongs to, e.g. a dashboard id"
    )]
    pub(crate) scope: Option<String>,
    #[arg(
        long = "scope-name",
        value_name = "NAME",
        help = "Human readable scope name"
    )]
    pub(crate) scope_name: Option<String>,
    #[arg(long = "query-id", value_name = "ID", help = "Id of the query within its scope")]
    pub(crate) query_id: Option<String>,
    #[arg(
        short = 't',
        long = "term",
        value_name = "FIELD=VALUE",
        action = ArgAction::Append,
        help = "Expression term; terms are combined with AND (default: match everything)"
    )]
    pub(crate) terms: Vec<String>,
    #[arg(
        long = "incremental",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        help = "Ask for partial results while the search runs (default: enabled)"
    )]
    pub(crate) incremental: Option<bool>,
    #[arg(
        short = 's',
        long = "script",
        value_name = "FILE",
        help = "JSON replay script of result frames (default: <data dir>/replay.json)"
    )]
    pub(crate) script: Option<PathBuf>,
    #[arg(
        long = "poll-interval-ms",
        value_name = "MS",
        help = "Delay between poll rounds (default: 250)"
    )]
    pub(crate) poll_interval_ms: Option<u64>,
    #[arg(
        long = "timeout-ms",
        value_name = "MS",
        help = "Give up waiting for completion after this long (default: 30000)"
    )]
    pub(crate) timeout_ms: Option<u64>,
    #[arg(
        long = "time-zone",
        value_name = "TZ",
        help = "Time zone sent with each request (default: UTC)"
    )]
    pub(crate) time_zone: Option<String>,
    #[arg(
        short = 'p',
        long = "print-config",
        help = "Print the resolved configuration before running (default: disabled)"
    )]
    pub(crate) print_config: bool,
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help = "Log more; repeat for debug and trace output"
    )]
    pub(crate) verbose: u8,
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Plain, help = "Choose how to print the outcome")]
    pub(crate) output: OutputFormat,
}

/// Output formats supported by the CLI utility.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Plain,
    Json,
}
