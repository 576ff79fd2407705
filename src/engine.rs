use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{join_all, try_join_all};
use tracing::{debug, warn};

use crate::dto::{Channel, Direction, Payment, PaymentType};
use crate::query::PaymentQuery;
use crate::reconcile::link_addresses;
use crate::stores::{RecordStore, TableRecords};
use crate::summary::{BasicSummaries, PaymentSummary, SummaryDeriver};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOutcome {
    Merged,
    Inserted,
}

/// Data access operations served by the worker. Holds no state of its own
/// besides the injected store and summary deriver.
pub struct Engine<S> {
    store: Arc<S>,
    summaries: Arc<dyn SummaryDeriver>,
}

impl<S: RecordStore> Engine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            summaries: Arc::new(BasicSummaries),
        }
    }

    pub fn with_summaries(mut self, summaries: impl SummaryDeriver + 'static) -> Self {
        self.summaries = Arc::new(summaries);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Merges every channel into the store concurrently. Every channel is
    /// attempted; if any fail, the first failure in batch order is returned.
    pub async fn update_channels(&self, channels: Vec<Channel>) -> Result<(), Error> {
        let results = join_all(channels.into_iter().map(|channel| async move {
            let key = channel.key();
            (key, self.merge_channel(channel).await)
        }))
        .await;

        let mut first_error = None;
        for (key, result) in results {
            match result {
                Ok(outcome) => {
                    debug!(channel = %key.id, wallet = %key.wallet_id, ?outcome, "channel stored")
                }
                Err(err) => {
                    warn!(channel = %key.id, wallet = %key.wallet_id, error = %err, "channel update failed");
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Modifies the stored channel in place, or inserts it when nothing
    /// matched its key. Modify and insert are separate store calls.
    async fn merge_channel(&self, channel: Channel) -> Result<ChannelOutcome, Error> {
        let key = channel.key();
        let incoming = channel.clone();
        let modified = self
            .store
            .modify_channel(&key, Box::new(move |existing: &mut Channel| existing.merge(&incoming)))
            .await?;
        if modified {
            return Ok(ChannelOutcome::Merged);
        }
        self.store.add_channel(channel).await?;
        Ok(ChannelOutcome::Inserted)
    }

    /// Links the wallet's waiting addresses to the transactions paying them,
    /// then stores the transactions. All transactions must belong to one wallet.
    pub async fn update_transactions(&self, transactions: Vec<Payment>) -> Result<(), Error> {
        let Some(first) = transactions.first() else {
            return Ok(());
        };
        let wallet_id = first.wallet_id.clone();

        let addresses = self
            .store
            .wallet_payments(&wallet_id, PaymentType::Address)
            .await?;
        let links = link_addresses(&addresses, &transactions);
        debug!(wallet = %wallet_id, linked = links.len(), "reconciled addresses");

        try_join_all(links.into_iter().map(|link| async move {
            let key = link.address.clone();
            self.store
                .update_payment(&key, Box::new(move |payment: &mut Payment| link.apply(payment)))
                .await
        }))
        .await?;

        self.store
            .bulk_put(TableRecords::Payments(transactions))
            .await?;
        Ok(())
    }

    pub async fn bulk_put(&self, records: TableRecords) -> Result<(), Error> {
        debug!(table = records.table(), count = records.len(), "bulk put");
        self.store.bulk_put(records).await?;
        Ok(())
    }

    /// The received invoice with the highest pay index, optionally limited to one wallet.
    pub async fn last_paid_invoice(&self, wallet_id: Option<&str>) -> Result<Option<Payment>, Error> {
        let invoices = match wallet_id {
            Some(wallet_id) => {
                self.store
                    .wallet_payments(wallet_id, PaymentType::Invoice)
                    .await?
            }
            None => self.store.payments().await?,
        };

        Ok(invoices
            .into_iter()
            .filter_map(|payment| {
                let invoice = payment.as_invoice()?;
                if invoice.direction != Direction::Receive {
                    return None;
                }
                let pay_index = invoice.pay_index?;
                Some((pay_index, payment))
            })
            .max_by_key(|(pay_index, _)| *pay_index)
            .map(|(_, payment)| payment))
    }

    pub fn payment_summary(&self, payment: &Payment) -> Result<PaymentSummary, Error> {
        self.summaries.derive(payment)
    }

    /// Every tag used in metadata, without duplicates, in first-seen order.
    pub async fn all_tags(&self) -> Result<Vec<String>, Error> {
        let metadata = self.store.metadata().await?;
        let mut seen = HashSet::new();
        Ok(metadata
            .into_iter()
            .flat_map(|metadata| metadata.tags)
            .filter(|tag| seen.insert(tag.clone()))
            .collect())
    }

    pub async fn payments(&self, query: &PaymentQuery) -> Result<Vec<Payment>, Error> {
        let payments = self.store.payments().await?;
        Ok(query.apply(payments))
    }
}
