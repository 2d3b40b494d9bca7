mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "nsv",
    version,
    about = "Filter a markdown vault with a compact query language"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved settings
    Doctor,

    /// List the notes matching a query
    Search(SearchArgs),

    /// Show how a query is tokenized, classified and parsed
    Explain(ExplainArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Quiet,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Query, e.g. `#project OR #meeting` or `report folder:work @thisweek`
    pub query: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Shorthand for `--output json`
    #[arg(long, conflicts_with = "quiet")]
    pub json: bool,

    /// Print matching paths only
    #[arg(long, short)]
    pub quiet: bool,

    /// Maximum number of notes to print
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only notes directly inside this folder ("/" for the vault root)
    #[arg(long, conflicts_with = "tag")]
    pub folder: Option<String>,

    /// Only notes carrying this tag or one of its descendants
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExplainArgs {
    /// Query to explain
    pub query: String,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), cli.profile.as_deref()),
        Commands::Search(args) => {
            cmd::search::run(cli.config.as_deref(), cli.profile.as_deref(), args)
        }
        Commands::Explain(args) => {
            cmd::explain::run(cli.config.as_deref(), cli.profile.as_deref(), &args.query)
        }
    }
}
