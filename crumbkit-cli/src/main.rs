//! `crumbkit`: inspect and exercise a file-backed breadcrumb log.
//!
//! Records live under `<root>/crumbkit/<key>.json`, the same layout an app
//! configured with `storageRoot` uses, so the CLI can read what an app wrote
//! and vice versa. Every command prints JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{eyre, Result, WrapErr};
use tracing_subscriber::EnvFilter;

use crumbkit_core::{
    timestamp_now, BreadcrumbConfig, BreadcrumbManager, Event, PlatformKind, DEFAULT_STORAGE_KEY,
};

#[derive(Parser, Debug)]
#[command(name = "crumbkit", version, about = "Record and inspect breadcrumb logs")]
struct Cli {
    /// Storage root; records go to `<root>/crumbkit/<key>.json`.
    /// Defaults to the platform data directory.
    #[arg(long, global = true, env = "CRUMBKIT_ROOT")]
    root: Option<PathBuf>,

    /// Record key.
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_KEY)]
    key: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a breadcrumb.
    Add {
        #[command(subcommand)]
        event: AddEvent,

        /// Correlation id attached to the event.
        #[arg(long, global = true)]
        correlation_id: Option<String>,

        /// Timestamp in milliseconds since the epoch. Defaults to now.
        #[arg(long, global = true)]
        at: Option<i64>,
    },
    /// Print the breadcrumbs, oldest first.
    List,
    /// Delete every breadcrumb.
    Clear,
    /// Print the error-report payload for a failure.
    Report {
        /// Correlation id of the failed operation.
        #[arg(long)]
        correlation_id: String,

        /// Error message placed in the report's `error` object.
        #[arg(long)]
        message: String,
    },
}

#[derive(Subcommand, Debug)]
enum AddEvent {
    /// A click on an element.
    Click {
        /// Element selector.
        selector: String,
    },
    /// A route change.
    Navigation {
        /// Destination URL, without query string.
        url: String,
    },
    /// A form submission.
    FormSubmit {
        /// Form identifier.
        form_id: String,
    },
    /// A completed network request.
    Network {
        /// Request path.
        path: String,
        /// Response status code.
        status_code: u16,
    },
}

impl AddEvent {
    fn into_event(self, timestamp: i64) -> Event {
        match self {
            Self::Click { selector } => Event::click(selector, timestamp),
            Self::Navigation { url } => Event::navigation(url, timestamp),
            Self::FormSubmit { form_id } => Event::form_submit(form_id, timestamp),
            Self::Network { path, status_code } => Event::network(path, status_code, timestamp),
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_manager(root: Option<PathBuf>, key: String) -> Result<BreadcrumbManager> {
    let root = match root {
        Some(root) => root,
        None => dirs::data_dir().ok_or_else(|| eyre!("no data directory on this platform, pass --root"))?,
    };
    tracing::debug!(root = %root.display(), %key, "opening breadcrumb storage");

    let config = BreadcrumbConfig {
        storage_key: key,
        storage_root: Some(root),
        platform: Some(PlatformKind::File),
        ..BreadcrumbConfig::default()
    };
    BreadcrumbManager::from_config(config).wrap_err("invalid storage settings")
}

fn run(cli: Cli) -> Result<serde_json::Value> {
    let manager = open_manager(cli.root, cli.key)?;

    let output = match cli.command {
        Command::Add {
            event,
            correlation_id,
            at,
        } => {
            let mut event = event.into_event(at.unwrap_or_else(timestamp_now));
            if let Some(correlation_id) = correlation_id {
                event = event.with_correlation_id(correlation_id);
            }
            manager.add(event).wrap_err("failed to record breadcrumb")?;
            serde_json::to_value(manager.get_all())?
        }
        Command::List => serde_json::to_value(manager.get_all())?,
        Command::Clear => {
            manager.clear();
            serde_json::json!([])
        }
        Command::Report {
            correlation_id,
            message,
        } => serde_json::to_value(
            manager.report(correlation_id, serde_json::json!({ "message": message })),
        )?,
    };

    manager.flush();
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = run(cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
