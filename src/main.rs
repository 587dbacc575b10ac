//! CLI entry point for `mailindex`.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use mailindex::config::Config;
use mailindex::ingest::{IngestOptions, IngestPipeline, IngestProgress, IngestSummary};
use mailindex::server::{self, ApiState};
use mailindex::sink::ZincClient;

#[derive(Parser)]
#[command(
    name = "mailindex",
    version,
    about = "Index a directory of email files into ZincSearch and serve search over it"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Search engine base URL (overrides the config file)
    #[arg(long, global = true, env = "MAILINDEX_ENGINE_URL", value_name = "URL")]
    engine_url: Option<String>,

    /// Index name (overrides the config file)
    #[arg(long, global = true, value_name = "NAME")]
    index: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk a directory and submit every email to the search engine
    Index {
        path: std::path::PathBuf,
        /// Number of concurrent workers (default: number of CPUs)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Create the index with the email mapping before ingesting
        #[arg(long)]
        create_index: bool,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the search HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long)]
        host: Option<String>,
    },
    /// Create the index with the email mapping
    CreateIndex,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = mailindex::config::load_config();
    if let Some(url) = cli.engine_url {
        config.engine.base_url = url;
    }
    if let Some(index) = cli.index {
        config.engine.index = index;
    }

    let log_level = match cli.verbose {
        0 => config.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    setup_logging(log_level, &config);

    match cli.command {
        Commands::Index {
            path,
            workers,
            create_index,
            json,
        } => cmd_index(&config, &path, workers, create_index, json).await,
        Commands::Serve { port, host } => cmd_serve(&config, host, port).await,
        Commands::CreateIndex => cmd_create_index(&config).await,
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let log_dir = mailindex::config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mailindex.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "mailindex", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

async fn cmd_create_index(config: &Config) -> anyhow::Result<()> {
    let client = ZincClient::new(config.engine.clone())?;
    client
        .create_index(&config.engine.index)
        .await
        .with_context(|| format!("creating index '{}'", config.engine.index))?;
    println!("  Created index '{}'", config.engine.index);
    Ok(())
}

/// Ingest a directory and print the run summary.
async fn cmd_index(
    config: &Config,
    path: &Path,
    workers: Option<usize>,
    create_index: bool,
    json: bool,
) -> anyhow::Result<()> {
    let client = Arc::new(ZincClient::new(config.engine.clone())?);
    if create_index {
        client
            .create_index(&config.engine.index)
            .await
            .with_context(|| format!("creating index '{}'", config.engine.index))?;
    }

    let mut options = IngestOptions::from_config(config);
    if let Some(workers) = workers {
        options.workers = workers;
    }
    let pipeline = IngestPipeline::new(client, options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} Indexing [{elapsed_precise}] {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = pipeline
        .run_with_progress(
            path,
            Some(&|progress: &IngestProgress| {
                pb.set_message(format!(
                    "{} indexed, {} errors, {} skipped",
                    progress.indexed, progress.errors, progress.skipped
                ));
            }),
        )
        .await;

    pb.finish_and_clear();
    let summary = result?;

    if json {
        print_summary_json(path, &config.engine.index, &summary)?;
    } else {
        print_summary_table(path, &config.engine.index, &summary);
    }

    Ok(())
}

async fn cmd_serve(config: &Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address '{host}:{port}'"))?;

    let client = Arc::new(ZincClient::new(config.engine.clone())?);
    let state = ApiState::new(client, config.engine.index.clone());

    println!("  Serving search API on http://{addr}");
    server::serve(addr, state).await?;
    Ok(())
}

/// Print the run summary in a human-readable table.
fn print_summary_table(root: &Path, index: &str, summary: &IngestSummary) {
    println!();
    println!("  {:<20} {}", "Directory", root.display());
    println!("  {:<20} {}", "Index", index);
    println!("  {:<20} {}", "Indexed", summary.indexed);
    println!("  {:<20} {}", "Errors", summary.errors);
    println!("  {:<20} {}", "Skipped (empty)", summary.skipped);
    println!("  {:<20} {:.2?}", "Elapsed", summary.elapsed);
    println!("  {:<20} {:.1} emails/s", "Rate", summary.rate());
    println!();
}

/// Print the run summary as JSON.
fn print_summary_json(root: &Path, index: &str, summary: &IngestSummary) -> anyhow::Result<()> {
    let stats = serde_json::json!({
        "directory": root.to_string_lossy(),
        "index": index,
        "indexed": summary.indexed,
        "errors": summary.errors,
        "skipped": summary.skipped,
        "elapsed_ms": summary.elapsed.as_millis() as u64,
        "rate": summary.rate(),
    });
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
