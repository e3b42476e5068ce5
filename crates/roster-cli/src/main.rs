//! rosterctl — balance course rosters across named sections.
//!
//! # Usage
//!
//! ```text
//! rosterctl run --course 101 --section "Lab A" --section "Lab B"
//! rosterctl plan --course 101 --section "Lab A" --section "Lab B"
//! rosterctl batch --file work.json
//! rosterctl serve --port 8080
//! ```
//!
//! Connection settings come from `--config <file.toml>` and the
//! `ROSTER_*` environment variables.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use roster_core::RosterConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "rosterctl",
    about = "Balance course rosters across named sections",
    version,
    propagate_version = true
)]
struct Cli {
    /// TOML config file; ROSTER_* variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile one course.
    Run {
        /// Course id.
        #[arg(long)]
        course: String,
        /// Target section name; repeat for each section.
        #[arg(long = "section", required = true)]
        sections: Vec<String>,
        /// Report the plan without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show what `run` would do, without writing.
    Plan {
        #[arg(long)]
        course: String,
        #[arg(long = "section", required = true)]
        sections: Vec<String>,
    },
    /// Reconcile every item of a `{"data": [...]}` payload.
    ///
    /// Reads standard input when no file is given.
    Batch {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Serve the REST API.
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,
    },
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,roster=debug"));

    match format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = RosterConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            course,
            sections,
            dry_run,
        } => commands::run::run(&config, course, sections, dry_run).await,
        Commands::Plan { course, sections } => {
            commands::run::run(&config, course, sections, true).await
        }
        Commands::Batch { file } => commands::batch::batch(&config, file.as_deref()).await,
        Commands::Serve { port } => commands::serve::serve(&config, port).await,
    }
}
