mod api;
mod config;
mod error;
mod resource;
mod store;

use anyhow::Result;
use api::ApiClient;
use clap::{Parser, Subcommand, ValueEnum};
use config::SyncConfig;
use resource::{Action, ResourceKind, RunContext};
use store::FileStore;
use tracing::Level;

/// Move Datadog configuration objects between accounts
#[derive(Parser, Debug)]
#[command(name = "ddmover", version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Only pull synthetic tests carrying at least one of these tags
    /// (ignored by every other kind)
    #[arg(long = "tag", value_name = "TAG", global = true)]
    tags: Vec<String>,

    /// Perform all read calls but suppress file writes and API mutations
    #[arg(short = 'd', long, global = true)]
    dry_run: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read objects from the source account into local JSON files
    Pull { kind: ResourceKind },
    /// Create objects in the destination account from local JSON files
    Push { kind: ResourceKind },
    /// Update existing objects in the source account from local JSON files
    Edit { kind: ResourceKind },
    /// Check object definitions against the API without persisting anything
    Validate { kind: ResourceKind },
}

impl Command {
    fn split(&self) -> (Action, ResourceKind) {
        match self {
            Command::Pull { kind } => (Action::Pull, *kind),
            Command::Push { kind } => (Action::Push, *kind),
            Command::Edit { kind } => (Action::Edit, *kind),
            Command::Validate { kind } => (Action::Validate, *kind),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) {
    let Some(tracing_level) = level.to_tracing_level() else {
        return;
    };

    // Narrative output goes to stdout via println; telemetry stays on stderr.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("ddmover={tracing_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();

    tracing::info!("ddmover started with log level: {:?}", level);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.log_level);

    if args.dry_run {
        println!("You are running in dry-run mode. No changes will be committed to your Datadog account(s).");
    }

    let (action, kind) = args.command.split();

    let config = SyncConfig::load()?;
    let client = ApiClient::new(config.credentials(action.direction()))?;

    let ctx = RunContext {
        client,
        store: FileStore::new("."),
        dry_run: args.dry_run,
        tags: args.tags,
    };

    resource::run(kind, action, &ctx).await
}
