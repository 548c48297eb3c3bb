//! CLI entry point for the news sentiment tool.
//!
//! `serve` runs the web application; `search` runs a single search from the
//! command line and writes the same artifacts the web page links to.

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use news_sentiment::config::AppConfig;
use news_sentiment::pipeline::{Pipeline, SearchRequest};
use news_sentiment::web::{AppState, router};
use std::ffi::OsStr;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "news_sentiment")]
#[command(about = "Search news feeds by keyword and chart their sentiment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web application
    Serve {
        /// Port to listen on (overrides SERVER_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory for generated spreadsheets and images (overrides NEWS_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Run one search and write its artifacts
    Search {
        /// Keywords, separated by commas or spaces
        #[arg(short, long)]
        keyword: String,

        /// First publish date to include (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// Last publish date to include (YYYY-MM-DD)
        #[arg(short, long)]
        end: String,

        /// How multiple keywords combine: AND or OR
        #[arg(short, long, default_value = "AND")]
        logic: String,

        /// Directory for generated spreadsheets and images (overrides NEWS_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/news_sentiment.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("news_sentiment.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;

    match cli.command {
        Commands::Serve { port, output_dir } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            serve(config).await?;
        }
        Commands::Search {
            keyword,
            start,
            end,
            logic,
            output_dir,
        } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let request = SearchRequest::parse(Some(&keyword), Some(&start), Some(&end), Some(&logic))
                .map_err(|e| anyhow!(e))?;
            search(config, request).await?;
        }
    }

    Ok(())
}

/// Starts the HTTP server and blocks until it exits.
#[tracing::instrument(skip_all, fields(port = config.port, output_dir = %config.output_dir.display()))]
async fn serve(config: AppConfig) -> Result<()> {
    let pipeline = Pipeline::from_config(&config)?;
    pipeline.store().ensure_root()?;
    info!(
        sentiment = config.capabilities.sentiment,
        word_cloud = config.capabilities.word_cloud,
        "Capabilities"
    );

    let app = router(AppState::new(pipeline));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Runs one search and logs a summary of the report.
async fn search(config: AppConfig, request: SearchRequest) -> Result<()> {
    let pipeline = Pipeline::from_config(&config)?;
    let report = pipeline.run(&request).await;

    info!(
        keywords = ?report.keywords,
        total = report.count(),
        "Search finished"
    );

    for (source, n) in &report.counts.by_source {
        info!(source = %source, count = n, "Source");
    }
    for (date, n) in &report.counts.by_date {
        info!(date = %date, count = n, "Date");
    }
    for (label, n) in &report.counts.by_sentiment {
        info!(label = %label, count = n, "Sentiment");
    }

    if let Some(file) = &report.spreadsheet_file {
        info!(path = %pipeline.store().path_of(file).display(), "Spreadsheet written");
    }
    if let Some(file) = &report.word_cloud_file {
        info!(path = %pipeline.store().path_of(file).display(), "Word cloud written");
    }

    Ok(())
}
