//! The runner loads a JSON snapshot of every table into a fresh worker,
//! runs one payments query through the bridge and writes the page as CSV.

mod async_runner;

pub use async_runner::{load_snapshot, run, Snapshot};
