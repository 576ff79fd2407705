use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::WorkerConfig;
use crate::csv_utils::write_csv;
use crate::dto::{Channel, Metadata, Payment, PaymentRow, Trade, Wallet};
use crate::query::PaymentQuery;
use crate::stores::{MemoryStore, TableRecords};
use crate::worker::spawn_worker;
use crate::{Engine, Error};

/// Contents of every table, as exported by the app.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub payments: Vec<Payment>,
    pub channels: Vec<Channel>,
    pub metadata: Vec<Metadata>,
    pub trades: Vec<Trade>,
    pub wallets: Vec<Wallet>,
}

impl Snapshot {
    fn into_tables(self) -> [TableRecords; 5] {
        [
            TableRecords::Wallets(self.wallets),
            TableRecords::Payments(self.payments),
            TableRecords::Channels(self.channels),
            TableRecords::Metadata(self.metadata),
            TableRecords::Trades(self.trades),
        ]
    }
}

pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Snapshot, Error> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Runs `query` against the snapshot at `snapshot_path` and writes the
/// resulting page to the provided writer.
///
/// # Arguments
/// * `snapshot_path` - Path to the JSON snapshot
/// * `query` - Page, sort and filters to apply
/// * `config` - Worker queue capacity and request timeout
/// * `writer` - Where to write the page (e.g. stdout)
///
/// # Errors
/// Returns an error if:
/// * The snapshot cannot be read or parsed
/// * The worker rejects a table or the query
/// * Writing to the output fails
pub async fn run<P, W>(
    snapshot_path: P,
    query: PaymentQuery,
    config: &WorkerConfig,
    writer: W,
) -> Result<(), Error>
where
    P: AsRef<Path>,
    W: Write,
{
    let snapshot = load_snapshot(snapshot_path).await?;
    let engine = Engine::new(Arc::new(MemoryStore::new()));
    let (bridge, worker) = spawn_worker(engine, config);

    for records in snapshot.into_tables() {
        if records.is_empty() {
            continue;
        }
        info!(table = records.table(), count = records.len(), "loading table");
        bridge.bulk_put(records).await?;
    }

    let page = bridge.payments(query).await?;

    // Let the worker drain and stop
    drop(bridge);
    worker.await.map_err(|_| Error::WorkerClosed)?;

    write_csv(writer, page.into_iter().map(PaymentRow::from))?;
    Ok(())
}
