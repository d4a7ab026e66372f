//! mavinspect CLI - live telemetry tree

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use mavinspect::config::InspectorConfig;
use mavinspect::error::{FixSuggestion, InspectorError};
use mavinspect::session::{Command, Session};
use mavinspect::source::{ingest, spawn_ingestion, DemoSource, JsonLinesSource, TelemetrySource};
use mavinspect::store::Stores;
use mavinspect::tui::{self, widgets, Chrome};

#[derive(Parser)]
#[command(name = "mavinspect")]
#[command(about = "Live collapsible tree view of decoded MAVLink telemetry")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Write logs to this file (logs are discarded while the TUI runs otherwise)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Config file (default: ~/.config/mavinspect/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive tree of live telemetry
    Watch {
        /// JSON-lines decoder output, `-` for stdin
        #[arg(short, long, value_name = "PATH")]
        input: Option<String>,

        /// Use the built-in simulated vehicle (default without --input)
        #[arg(long, conflicts_with = "input")]
        demo: bool,

        /// Show every field list as text lines
        #[arg(long)]
        details: bool,

        /// Rebuild period in milliseconds
        #[arg(long, value_name = "MS")]
        tick_ms: Option<u64>,

        /// Start with the status message panel hidden
        #[arg(long)]
        no_status_panel: bool,
    },

    /// Ingest the whole input and print the tree once
    Dump {
        /// JSON-lines decoder output, `-` for stdin
        #[arg(short, long, value_name = "PATH")]
        input: String,

        /// Show every field list as text lines
        #[arg(long)]
        details: bool,

        /// Expand every node before printing
        #[arg(long)]
        expand_all: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let headless = matches!(cli.command, Commands::Dump { .. });

    if let Err(e) = init_tracing(cli.debug, cli.log_file.as_deref(), headless) {
        report(&e.into());
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Watch {
            input,
            demo,
            details,
            tick_ms,
            no_status_panel,
        } => {
            let source: Box<dyn TelemetrySource> = match input {
                Some(input) if !demo => Box::new(JsonLinesSource::from_arg(&input)),
                _ => Box::new(DemoSource::new()),
            };
            match load_config(cli.config.as_deref()) {
                Ok(mut config) => {
                    if let Some(tick_ms) = tick_ms {
                        config.tick_ms = tick_ms;
                    }
                    if no_status_panel {
                        config.show_status_panel = false;
                    }
                    watch(source.as_ref(), config.normalized(), details).await
                }
                Err(e) => Err(e.into()),
            }
        }
        Commands::Dump {
            input,
            details,
            expand_all,
        } => match load_config(cli.config.as_deref()) {
            Ok(config) => dump(&input, config.normalized(), details, expand_all).await,
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}

/// Logs go to `--log-file`, stderr for headless runs, nowhere under the TUI
fn init_tracing(debug: bool, log_file: Option<&Path>, headless: bool) -> io::Result<()> {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if debug {
        filter = filter.add_directive(tracing::Level::DEBUG.into());
    }

    let (writer, ansi) = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None if headless => (BoxMakeWriter::new(io::stderr), true),
        None => (BoxMakeWriter::new(io::sink), false),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .try_init();
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<InspectorConfig, InspectorError> {
    Ok(InspectorConfig::load(path)?.with_env())
}

async fn watch(
    source: &dyn TelemetrySource,
    config: InspectorConfig,
    details: bool,
) -> anyhow::Result<()> {
    let stores = Arc::new(Stores::new(config.smoothing, config.status_capacity));
    let events = source.open().await?;

    let cancel = CancellationToken::new();
    let ingestion = spawn_ingestion(events, stores.clone(), cancel.clone(), details);

    let session = Session::new(stores).with_status_panel(config.show_status_panel);
    let chrome = Chrome {
        source: source.describe(),
        status_rows: config.status_rows,
    };

    let result = tui::run(session, chrome, config.tick(), cancel.clone()).await;

    cancel.cancel();
    match ingestion.await {
        Ok(applied) => info!(applied, "ingestion finished"),
        Err(e) => warn!(error = %e, "ingestion task failed"),
    }
    result
}

async fn dump(
    input: &str,
    config: InspectorConfig,
    details: bool,
    expand_all: bool,
) -> anyhow::Result<()> {
    let stores = Arc::new(Stores::new(config.smoothing, config.status_capacity));
    let source = JsonLinesSource::from_arg(input);
    let events = source.open().await?;

    let applied = ingest(events, &stores, &CancellationToken::new(), details).await;
    info!(applied, input = %source.describe(), "input ingested");

    let mut session = Session::new(stores);
    session.rebuild();
    if expand_all {
        session.apply(Command::ExpandAll);
    }

    if session.rows().is_empty() {
        println!("{}", widgets::EMPTY_MESSAGE);
    }
    for row in session.all_rows() {
        println!("{}", widgets::plain_line(&row));
    }
    println!("{}", session.status_line());

    Ok(())
}

fn report(e: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), e);
    if let Some(suggestion) = e
        .downcast_ref::<InspectorError>()
        .and_then(|e| e.fix_suggestion())
    {
        eprintln!("  {} {}", "Fix:".yellow(), suggestion);
    }
}
