mod commands;
mod notify;
mod render;
mod utils;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use planner_core::config::PlannerConfig;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Plan events, browse them by month, week or day, and get reminded")]
struct Cli {
    /// Log what the planner is doing (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new event
    Add {
        title: String,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Change an existing event; only the given fields are updated
    Edit {
        id: i64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Stop the event from repeating
        #[arg(long, conflicts_with = "repeat")]
        no_repeat: bool,

        #[command(flatten)]
        fields: EventFields,
    },
    /// Delete an event by id
    Delete {
        id: i64,
    },
    /// Show the events of a month, week or day
    List {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(long, conflicts_with_all = ["week", "day"])]
        month: Option<String>,

        /// Show the week (Sunday to Saturday) containing this date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "day")]
        week: Option<String>,

        /// Show a single day (YYYY-MM-DD)
        #[arg(long)]
        day: Option<String>,

        /// Only events whose title, description or location contains this text
        #[arg(short, long, default_value = "")]
        search: String,

        /// Hide events with this label (repeatable)
        #[arg(long)]
        hide: Vec<String>,
    },
    /// Show the labels in use
    Labels,
    /// Export all events as an .ics file
    Export {
        /// Directory to write into (defaults to the current directory)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,

        /// File name (defaults to export_filename from config)
        #[arg(long)]
        filename: Option<String>,
    },
    /// Show desktop notifications for upcoming events
    Remind {
        /// Check once and exit instead of running until Ctrl-C
        #[arg(long)]
        once: bool,
    },
}

/// Event fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct EventFields {
    /// Day of the event (YYYY-MM-DD, defaults to today on add)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Start time (HH:MM)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (HH:MM, defaults to one hour after start)
    #[arg(short, long)]
    pub end: Option<String>,

    /// Make the event all-day (`--all-day false` to undo)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub all_day: Option<bool>,

    /// Label (color) of the event
    #[arg(short, long)]
    pub label: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Repeat frequency: daily, weekly, monthly or yearly
    #[arg(short, long)]
    pub repeat: Option<String>,

    /// Repeat every N days/weeks/months/years
    #[arg(long)]
    pub every: Option<u32>,

    /// Last day the event repeats on (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Minutes before start to remind (0 for none)
    #[arg(long)]
    pub reminder: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = PlannerConfig::load()?;

    match cli.command {
        Commands::Add { title, fields } => commands::add::run(&config, title, fields),
        Commands::Edit {
            id,
            title,
            no_repeat,
            fields,
        } => commands::edit::run(&config, id, title, no_repeat, fields),
        Commands::Delete { id } => commands::delete::run(&config, id),
        Commands::List {
            month,
            week,
            day,
            search,
            hide,
        } => {
            let window = utils::resolve_window(month.as_deref(), week.as_deref(), day.as_deref())?;
            commands::list::run(&config, window, &search, &hide)
        }
        Commands::Labels => commands::labels::run(&config),
        Commands::Export { output, filename } => commands::export::run(&config, output, filename),
        Commands::Remind { once } => commands::remind::run(&config, once).await,
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "info" } else { "warn" };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))?;

    Ok(())
}
