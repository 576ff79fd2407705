use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    ChannelUpdate, ChannelsTable, PaymentUpdate, PaymentsTable, RecordStore, TableRecords,
};
use crate::dto::{Channel, ChannelKey, Metadata, Payment, PaymentKey, PaymentType, Trade, Wallet};
use crate::error::StoreError;

#[derive(Default)]
struct Tables {
    payments: PaymentsTable,
    channels: ChannelsTable,
    metadata: BTreeMap<String, Metadata>,
    trades: BTreeMap<String, Trade>,
    wallets: BTreeMap<String, Wallet>,
}

/// In-process [`RecordStore`]. Each call takes the table lock once, so a
/// single call is atomic but consecutive calls are not.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn payments(&self) -> Result<Vec<Payment>, StoreError> {
        Ok(self.tables.read().await.payments.iter().cloned().collect())
    }

    async fn wallet_payments(
        &self,
        wallet_id: &str,
        kind: PaymentType,
    ) -> Result<Vec<Payment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.payments.for_wallet(wallet_id, kind).cloned().collect())
    }

    async fn update_payment(
        &self,
        key: &PaymentKey,
        update: PaymentUpdate,
    ) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.payments.update(key, update))
    }

    async fn channels(&self) -> Result<Vec<Channel>, StoreError> {
        Ok(self.tables.read().await.channels.iter().cloned().collect())
    }

    async fn modify_channel(
        &self,
        key: &ChannelKey,
        update: ChannelUpdate,
    ) -> Result<bool, StoreError> {
        Ok(self.tables.write().await.channels.modify(key, update))
    }

    async fn add_channel(&self, channel: Channel) -> Result<(), StoreError> {
        self.tables.write().await.channels.add(channel)
    }

    async fn metadata(&self) -> Result<Vec<Metadata>, StoreError> {
        Ok(self.tables.read().await.metadata.values().cloned().collect())
    }

    async fn trades(&self) -> Result<Vec<Trade>, StoreError> {
        Ok(self.tables.read().await.trades.values().cloned().collect())
    }

    async fn wallets(&self) -> Result<Vec<Wallet>, StoreError> {
        Ok(self.tables.read().await.wallets.values().cloned().collect())
    }

    async fn add_wallet(&self, wallet: Wallet) -> Result<(), StoreError> {
        if wallet.id.is_empty() {
            return Err(StoreError::InvalidKey { table: "wallets" });
        }
        let mut tables = self.tables.write().await;
        if tables.wallets.contains_key(&wallet.id) {
            return Err(StoreError::Constraint {
                table: "wallets",
                key: wallet.id,
            });
        }
        tables.wallets.insert(wallet.id.clone(), wallet);
        Ok(())
    }

    async fn bulk_put(&self, records: TableRecords) -> Result<(), StoreError> {
        let table = records.table();
        let mut tables = self.tables.write().await;
        match records {
            TableRecords::Payments(payments) => tables.payments.bulk_put(payments),
            TableRecords::Channels(channels) => tables.channels.bulk_put(channels),
            TableRecords::Metadata(metadata) => put_by_id(
                &mut tables.metadata,
                table,
                metadata,
                |record| record.id.clone(),
            ),
            TableRecords::Trades(trades) => {
                put_by_id(&mut tables.trades, table, trades, |record| record.id.clone())
            }
            TableRecords::Wallets(wallets) => {
                put_by_id(&mut tables.wallets, table, wallets, |record| record.id.clone())
            }
        }
    }
}

fn put_by_id<T>(
    map: &mut BTreeMap<String, T>,
    table: &'static str,
    records: Vec<T>,
    id: impl Fn(&T) -> String,
) -> Result<(), StoreError> {
    if records.iter().any(|record| id(record).is_empty()) {
        return Err(StoreError::InvalidKey { table });
    }
    for record in records {
        map.insert(id(&record), record);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{ChannelStatus, TradeSide, WalletType};
    use rust_decimal_macros::dec;

    fn wallet(id: &str) -> Wallet {
        Wallet {
            id: id.to_string(),
            label: "Node".to_string(),
            kind: WalletType::CoreLn,
            created_at: 1,
            modified_at: 1,
            configuration: None,
            last_sync: None,
            syncing: false,
        }
    }

    #[tokio::test]
    async fn test_bulk_put_metadata() {
        let store = MemoryStore::new();
        store
            .bulk_put(TableRecords::Metadata(vec![
                Metadata {
                    id: "p2".to_string(),
                    tags: vec!["b".to_string()],
                    note: None,
                },
                Metadata {
                    id: "p1".to_string(),
                    tags: vec!["a".to_string()],
                    note: None,
                },
            ]))
            .await
            .unwrap();

        let ids: Vec<_> = store
            .metadata()
            .await
            .unwrap()
            .into_iter()
            .map(|metadata| metadata.id)
            .collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_bulk_put_trades_last_write_wins() {
        let trade = |id: &str, amount: u64| Trade {
            id: id.to_string(),
            timestamp: 1_700_000_000,
            wallet_id: "w1".to_string(),
            amount,
            price: dec!(37000.50),
            fee: 120,
            fiat_denomination: "usd".to_string(),
            side: TradeSide::Buy,
            trade_id: None,
            order_id: None,
            metadata: None,
        };
        let store = MemoryStore::new();
        store
            .bulk_put(TableRecords::Trades(vec![trade("tr2", 10), trade("tr1", 20)]))
            .await
            .unwrap();
        store
            .bulk_put(TableRecords::Trades(vec![trade("tr2", 30)]))
            .await
            .unwrap();

        let trades = store.trades().await.unwrap();
        assert_eq!(trades, vec![trade("tr1", 20), trade("tr2", 30)]);

        let result = store.bulk_put(TableRecords::Trades(vec![trade("", 1)])).await;
        assert_eq!(result, Err(StoreError::InvalidKey { table: "trades" }));
        assert_eq!(store.trades().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_put_rejects_invalid_key() {
        let store = MemoryStore::new();
        let result = store
            .bulk_put(TableRecords::Wallets(vec![wallet("w1"), wallet("")]))
            .await;

        assert_eq!(result, Err(StoreError::InvalidKey { table: "wallets" }));
        assert!(store.wallets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_wallet_twice_fails() {
        let store = MemoryStore::new();
        store.add_wallet(wallet("w1")).await.unwrap();

        let result = store.add_wallet(wallet("w1")).await;
        assert!(matches!(result, Err(StoreError::Constraint { .. })));
    }

    #[tokio::test]
    async fn test_modify_channel_through_store() {
        let store = MemoryStore::new();
        let channel = Channel::new("c1", "w1", ChannelStatus::Active);
        store.add_channel(channel.clone()).await.unwrap();

        let modified = store
            .modify_channel(
                &channel.key(),
                Box::new(|channel: &mut Channel| channel.status = ChannelStatus::Closing),
            )
            .await
            .unwrap();

        assert!(modified);
        assert_eq!(store.channels().await.unwrap()[0].status, ChannelStatus::Closing);
    }
}
