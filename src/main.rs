mod cli;
mod color;
mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cli::{check::check_cmd, list::list_cmd, load_sources, show::show_cmd, ColorMode};

#[derive(Default, Clone, Copy, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum RequestedColorMode {
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "contentreg")]
#[command(
    about = "Inspect the content models declared by plugins, admin and APIs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(long, default_value_t = RequestedColorMode::default())]
    color: RequestedColorMode,
    /// Read the model sources from this file instead of the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every model and report problems
    Check,
    /// List registered models or their sources
    List(ListArgs),
    /// Show a model, its schema and its relations
    Show(ShowArgs),
}

/// Possible listings
#[derive(Subcommand)]
pub(crate) enum ListObject {
    /// Registered models
    Models(ListModelArgs),
    /// Plugins, admin and APIs declaring models
    Sources,
}

/// Output formats
#[derive(ValueEnum, Default, Clone, Copy, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum ListingFormat {
    /// Format the output as a table
    #[default]
    Table,
    /// Format the output as JSON
    Json,
    /// Format the output as a table without a header
    HeaderlessTable,
}

#[derive(Parser)]
pub(crate) struct ListArgs {
    /// Output the listing with the specified format
    #[arg(short, long, default_value_t = ListingFormat::default())]
    format: ListingFormat,
    /// List the specified object
    #[command(subcommand)]
    object: ListObject,
}

#[derive(Parser, Default)]
pub(crate) struct ListModelArgs {
    /// Limit listing to the models of a plugin, an API or "admin"
    #[arg(short, long)]
    namespace: Option<String>,
}

#[derive(Parser)]
pub(crate) struct ShowArgs {
    /// Key of the model, e.g. "auth.user"
    key: String,
}

fn main() {
    let cli = Cli::parse();

    color::configure_color(ColorMode::resolve_auto(cli.color));

    let sources = load_sources(cli.config);

    match &cli.command {
        Some(Commands::Check) | None => check_cmd(&sources),
        Some(Commands::List(args)) => list_cmd(args, &sources),
        Some(Commands::Show(args)) => show_cmd(args, &sources),
    }
}
