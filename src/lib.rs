pub mod config;
pub mod connect;
pub mod csv_utils;
pub mod dto;
mod engine;
mod error;
pub mod filter;
pub mod query;
pub mod reconcile;
mod runner;
pub mod stores;
pub mod summary;
mod utils;
pub mod worker;

pub use config::WorkerConfig;
pub use dto::{Channel, Payment, PaymentType};
pub use engine::{ChannelOutcome, Engine};
pub use error::{Error, StoreError};
pub use query::{PaymentQuery, SortDirection};
pub use runner::{load_snapshot, run, Snapshot};
pub use worker::{spawn_worker, Bridge};
