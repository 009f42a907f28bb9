//! tender-worker — one-shot Transnet tender ingestion run.
//!
//! Fetches the advertised tender listing, normalizes it into canonical
//! records, and forwards them in fixed-size ordered batches to the shared
//! AI queue. Stateless: every invocation re-fetches and re-processes the
//! full current listing.

mod pipeline;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use tender_core::config::{load_dotenv, Config};
use tender_queue::{Dispatcher, SqsPublisher};
use tender_source::TransnetClient;

/// Transnet tender ingestion worker.
#[derive(Parser, Debug)]
#[command(name = "tender-worker", version, about)]
struct Cli {
    /// Fetch and normalize but skip queue delivery.
    #[arg(long, env = "TENDER_DRY_RUN", default_value_t = false)]
    dry_run: bool,

    /// Override records per outbound batch (1..=10).
    #[arg(long)]
    batch_size: Option<usize>,

    /// Override fetch timeout in seconds.
    #[arg(long)]
    fetch_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    load_dotenv();

    let mut config = Config::from_env();
    if let Some(n) = cli.batch_size {
        config.queue.batch_size = n.clamp(1, 10);
    }
    if let Some(secs) = cli.fetch_timeout {
        config.source.timeout_secs = secs;
    }
    config.log_summary();

    info!("Starting Transnet tender processing run");

    // A fetch failure is fatal: nothing was obtained, so there is no
    // partial processing to attempt.
    let client = TransnetClient::new(&config.source)?;
    let raws = client
        .fetch_advertised()
        .await
        .context("failed to fetch tender listing from source API")?;

    let dispatcher = if cli.dry_run {
        None
    } else {
        let publisher = SqsPublisher::new(&config.aws, &config.queue).await?;
        Some(Dispatcher::new(Box::new(publisher)))
    };

    let summary = pipeline::process(raws, &config.queue, dispatcher.as_ref()).await;
    summary.log();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("Run complete");
    Ok(())
}
