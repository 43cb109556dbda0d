mod commands;
mod logging;
mod render;
mod source;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use calstat_core::config::CalstatConfig;
use clap::{Parser, Subcommand};

use commands::report::{GroupArg, RankArg, ReportArgs};
use source::SourceArgs;

#[derive(Parser)]
#[command(name = "calstat")]
#[command(about = "Find out where your calendar time goes")]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with Google and remember the account
    Auth,
    /// List the calendars of the signed-in account
    Calendars,
    /// Download raw events into a JSON snapshot for offline analysis
    Fetch {
        /// Where to write the snapshot
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Rank recurring events by total time spent
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// Only report groups with more events than this
        #[arg(long)]
        min: Option<usize>,

        /// Rank groups by total duration or by number of events
        #[arg(long, value_enum)]
        rank_by: Option<RankArg>,

        /// Group by tokenized titles or exact titles
        #[arg(long, value_enum)]
        by: Option<GroupArg>,

        /// Show at most this many groups
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Also print the time spent on events whose title contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Write the report as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Summarize time per keyword category from the config file
    Categories {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show a week agenda
    Week {
        /// Weeks relative to the current one (-1 is last week)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;

    let mut config = CalstatConfig::load()?;

    match cli.command {
        Commands::Auth => commands::auth::run(&mut config).await,
        Commands::Calendars => commands::calendars::run(&config).await,
        Commands::Fetch { output, source } => commands::fetch::run(&config, &source, &output).await,
        Commands::Report {
            source,
            min,
            rank_by,
            by,
            limit,
            search,
            json,
        } => {
            let args = ReportArgs {
                min,
                rank_by,
                by,
                limit,
                search,
                json,
            };
            commands::report::run(&config, &source, args).await
        }
        Commands::Categories { source } => commands::categories::run(&config, &source).await,
        Commands::Week { offset, source } => commands::week::run(&config, &source, offset).await,
    }
}
