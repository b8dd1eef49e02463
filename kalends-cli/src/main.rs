mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kalends")]
#[command(about = "Convert calendar events between JSON and iCalendar (.ics) files")]
struct Cli {
    /// Log codec decisions (dropped events, ignored properties) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a JSON array of events as an .ics file
    Export {
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Read an .ics file and write its events as JSON
    Import {
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the events in an .ics file
    Show {
        input: PathBuf,

        /// IANA time zone to display times in (defaults to the system zone)
        #[arg(long)]
        tz: Option<String>,
    },
    /// Create a single event and write it as an .ics file
    New {
        title: String,

        /// Start date ("2025-03-20") or date and time ("2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date or date and time
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Length of the event, e.g. "30m" or "2h"
        #[arg(short, long)]
        duration: Option<String>,

        /// Treat start and end as whole days
        #[arg(long)]
        all_day: bool,

        /// Reminder before the start, e.g. "15m" or "1day"; repeatable
        #[arg(long = "alarm")]
        alarms: Vec<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Time zone the start and end are given in (defaults to the system zone)
        #[arg(long)]
        tz: Option<String>,

        /// Output file (defaults to a file in the configured export directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Export { input, output } => commands::export::run(&input, output.as_deref()),
        Commands::Import { input, output } => commands::import::run(&input, output.as_deref()),
        Commands::Show { input, tz } => commands::show::run(&input, tz.as_deref()),
        Commands::New {
            title,
            start,
            end,
            duration,
            all_day,
            alarms,
            location,
            description,
            tz,
            output,
        } => commands::new::run(commands::new::NewEvent {
            title,
            start,
            end,
            duration,
            all_day,
            alarms,
            location,
            description,
            tz,
            output,
        }),
    }
}

/// `RUST_LOG` wins when set; otherwise warnings only, or debug with `-v`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
