//! CLI entry point for the galley audit service.
//!
//! Provides subcommands for serving the HTTP audit API, seeding the rule
//! database, and running one-shot bottle or sticker audits against image
//! files or URLs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use galley_audit::classify::{Capture, VisionClient};
use galley_audit::error::AuditResult;
use galley_audit::fetch::load_capture_bytes;
use galley_audit::response::{BottleAuditBody, FailureBody, StickerAuditBody};
use galley_audit::server::{self, AppState};
use galley_audit::service;
use galley_audit::store::SqliteRuleStore;
use galley_audit::store::seed::{import_sticker_csv, seed_defaults};

#[derive(Parser)]
#[command(name = "galley_audit")]
#[command(about = "Catering cart audits: bottle dispositions and sticker expiry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP audit API
    Serve {
        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        bind: String,

        /// SQLite database holding rules and sticker references
        #[arg(short, long, default_value = "galley_audit.db")]
        database: String,
    },
    /// Create the schema and insert default reference data
    Seed {
        /// SQLite database to create or extend
        #[arg(short, long, default_value = "galley_audit.db")]
        database: String,

        /// Extra sticker references to import (CSV: shape,color,expires_on)
        #[arg(long)]
        stickers_csv: Option<String>,
    },
    /// One-shot bottle audit for an airline
    Bottles {
        /// Airline display name, exactly as stored
        airline: String,

        /// Image files or URLs to classify
        #[arg(required = true)]
        sources: Vec<String>,

        /// SQLite database holding rules
        #[arg(short, long, default_value = "galley_audit.db")]
        database: String,
    },
    /// One-shot sticker expiry audit
    Stickers {
        /// Image file or URL to analyze
        source: String,

        /// SQLite database holding sticker references
        #[arg(short, long, default_value = "galley_audit.db")]
        database: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/galley_audit.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("galley_audit.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, database } => {
            let store = SqliteRuleStore::open(&database)?;
            let classifier = vision_client_from_env()?;
            let state = Arc::new(AppState {
                store: Arc::new(store),
                classifier: Arc::new(classifier),
            });

            server::serve(state, &bind).await?;
        }
        Commands::Seed { database, stickers_csv } => {
            let store = SqliteRuleStore::open(&database)?;
            let summary = seed_defaults(&store)?;

            if let Some(path) = stickers_csv {
                import_sticker_csv(&store, &path)?;
            }

            info!(
                airlines = summary.airlines,
                rules = summary.rules,
                stickers = summary.stickers,
                flights = summary.flights,
                database = %database,
                "Seeding complete"
            );
        }
        Commands::Bottles { airline, sources, database } => {
            let store = SqliteRuleStore::open(&database)?;
            let classifier = vision_client_from_env()?;
            let captures = load_captures(&sources).await?;

            let outcome = service::audit_bottles(&classifier, &store, &airline, &captures).await;
            print_envelope(outcome.map(BottleAuditBody::new))?;
        }
        Commands::Stickers { source, database } => {
            let store = SqliteRuleStore::open(&database)?;
            let classifier = vision_client_from_env()?;
            let bytes = load_capture_bytes(&source).await?;
            let capture = Capture { id: 1, bytes };

            let outcome = service::audit_stickers(&classifier, &store, &capture).await;
            print_envelope(outcome.map(StickerAuditBody::new))?;
        }
    }

    Ok(())
}

fn vision_client_from_env() -> Result<VisionClient> {
    let base_url = std::env::var("VISION_API_URL").expect("VISION_API_URL must be set");
    let api_key = std::env::var("VISION_API_KEY").ok();
    Ok(VisionClient::new(base_url, api_key)?)
}

/// Loads each source (file path or URL) into a numbered capture.
async fn load_captures(sources: &[String]) -> Result<Vec<Capture>> {
    let mut captures = Vec::with_capacity(sources.len());
    for (index, source) in sources.iter().enumerate() {
        let bytes = load_capture_bytes(source).await?;
        captures.push(Capture {
            id: index as u64 + 1,
            bytes,
        });
    }
    Ok(captures)
}

/// Prints the same envelope the HTTP API would return.
fn print_envelope<T: serde::Serialize>(outcome: AuditResult<T>) -> Result<()> {
    let json = match outcome {
        Ok(body) => serde_json::to_string_pretty(&body)?,
        Err(err) => serde_json::to_string_pretty(&FailureBody::from_error(&err))?,
    };
    println!("{json}");
    Ok(())
}
