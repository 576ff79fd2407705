//! Record store used by the worker. Provides storage for:
//! - Payments keyed by type and id ([`PaymentsTable`])
//! - Channels keyed by id and wallet ([`ChannelsTable`])
//! - Metadata, trades and wallets keyed by id
//!
//! The worker only sees the [`RecordStore`] trait, so any transactional
//! embedded database can stand behind it. [`MemoryStore`] is the in-process
//! implementation.

mod channels;
mod memory;
mod payments;

pub use channels::ChannelsTable;
pub use memory::MemoryStore;
pub use payments::PaymentsTable;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::dto::{
    Channel, ChannelKey, Metadata, Payment, PaymentKey, PaymentType, Trade, Wallet,
};
use crate::error::StoreError;

/// In-place mutation applied to a stored payment.
pub type PaymentUpdate = Box<dyn FnOnce(&mut Payment) + Send>;
/// In-place mutation applied to a stored channel.
pub type ChannelUpdate = Box<dyn FnOnce(&mut Channel) + Send>;

/// A batch of records for one table, as carried by `bulk_put`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "table", content = "data", rename_all = "snake_case")]
pub enum TableRecords {
    Payments(Vec<Payment>),
    Channels(Vec<Channel>),
    Metadata(Vec<Metadata>),
    Trades(Vec<Trade>),
    Wallets(Vec<Wallet>),
}

impl TableRecords {
    pub fn table(&self) -> &'static str {
        match self {
            TableRecords::Payments(_) => "payments",
            TableRecords::Channels(_) => "channels",
            TableRecords::Metadata(_) => "metadata",
            TableRecords::Trades(_) => "trades",
            TableRecords::Wallets(_) => "wallets",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TableRecords::Payments(records) => records.len(),
            TableRecords::Channels(records) => records.len(),
            TableRecords::Metadata(records) => records.len(),
            TableRecords::Trades(records) => records.len(),
            TableRecords::Wallets(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All payments in natural storage order (primary key order).
    async fn payments(&self) -> Result<Vec<Payment>, StoreError>;

    /// Payments of one type belonging to `wallet_id`, in natural order.
    async fn wallet_payments(
        &self,
        wallet_id: &str,
        kind: PaymentType,
    ) -> Result<Vec<Payment>, StoreError>;

    /// Applies `update` to the payment stored under `key`.
    /// Returns `false` when no such payment exists.
    async fn update_payment(
        &self,
        key: &PaymentKey,
        update: PaymentUpdate,
    ) -> Result<bool, StoreError>;

    async fn channels(&self) -> Result<Vec<Channel>, StoreError>;

    /// Applies `update` to the channel stored under `key`.
    /// Returns `false` when no such channel exists.
    async fn modify_channel(
        &self,
        key: &ChannelKey,
        update: ChannelUpdate,
    ) -> Result<bool, StoreError>;

    /// Inserts a new channel. Fails with [`StoreError::Constraint`] if the key is taken.
    async fn add_channel(&self, channel: Channel) -> Result<(), StoreError>;

    async fn metadata(&self) -> Result<Vec<Metadata>, StoreError>;

    async fn trades(&self) -> Result<Vec<Trade>, StoreError>;

    async fn wallets(&self) -> Result<Vec<Wallet>, StoreError>;

    /// Inserts a new wallet. Fails with [`StoreError::Constraint`] if the id is taken.
    async fn add_wallet(&self, wallet: Wallet) -> Result<(), StoreError>;

    /// Inserts or replaces every record of the batch. The batch is rejected
    /// as a whole if any record has an invalid key.
    async fn bulk_put(&self, records: TableRecords) -> Result<(), StoreError>;
}
