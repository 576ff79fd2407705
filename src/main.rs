use std::io;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wallet_store::filter::{Filter, PaymentField};
use wallet_store::{run, Error, PaymentQuery, SortDirection, WorkerConfig};

#[derive(Parser)]
#[command(name = "wallet-store", about = "Query a wallet data snapshot and print one page as CSV")]
struct Cli {
    /// JSON snapshot with payments, channels, metadata, trades and wallets.
    snapshot: PathBuf,

    #[arg(long, default_value_t = 0)]
    offset: usize,

    #[arg(long, default_value_t = 50)]
    limit: usize,

    /// Payment field to sort by (e.g. "timestamp", "data.payIndex").
    #[arg(long, default_value = "timestamp")]
    sort: String,

    /// Sort ascending instead of newest first.
    #[arg(long)]
    asc: bool,

    /// JSON array of filters, e.g. '[{"type":"exists","key":"data.payIndex"}]'.
    #[arg(long)]
    filters: Option<String>,

    /// Fail a request after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run_cli(Cli::parse()).await {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

async fn run_cli(cli: Cli) -> Result<(), Error> {
    let key: PaymentField = cli.sort.parse()?;
    let direction = if cli.asc {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };

    let mut query = PaymentQuery::new(cli.offset, cli.limit).sort_by(key, direction);
    if let Some(filters) = cli.filters {
        query.filters = serde_json::from_str::<Vec<Filter>>(&filters)?;
    }

    let mut config = WorkerConfig::default();
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }

    run(cli.snapshot, query, &config, io::stdout().lock()).await
}
