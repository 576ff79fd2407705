use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rust_decimal_macros::dec;
use tokio::runtime::Runtime;
use wallet_store::dto::{
    Direction, InvoiceData, InvoiceType, Network, Payment, PaymentData, PaymentStatus,
};
use wallet_store::filter::{Filter, PaymentField};
use wallet_store::stores::{MemoryStore, RecordStore, TableRecords};
use wallet_store::{Engine, PaymentQuery, SortDirection};

const PAYMENTS: u64 = 10_000;

fn invoices() -> Vec<Payment> {
    (0..PAYMENTS)
        .map(|i| Payment {
            id: format!("inv{}", i),
            wallet_id: format!("w{}", i % 4),
            status: PaymentStatus::Complete,
            timestamp: 1_700_000_000 + (i * 7919) % PAYMENTS,
            amount: Some(1_000 + i % 500),
            fee: None,
            network: Network::Bitcoin,
            data: PaymentData::Invoice(InvoiceData {
                direction: if i % 3 == 0 {
                    Direction::Send
                } else {
                    Direction::Receive
                },
                kind: InvoiceType::Bolt11,
                created_at: 1_700_000_000,
                completed_at: None,
                expires_at: None,
                hash: format!("{:064x}", i),
                request: None,
                node_id: "02ab".to_string(),
                description: None,
                preimage: None,
                pay_index: (i % 2 == 0).then_some(i),
                offer: None,
            }),
        })
        .collect()
}

fn query_payments(c: &mut Criterion) {
    let mut group = c.benchmark_group("query");

    group.throughput(Throughput::Elements(PAYMENTS));
    group.measurement_time(Duration::from_secs(20));
    group.sample_size(50);

    let payments = invoices();
    let query = PaymentQuery::new(100, 50)
        .sort_by(PaymentField::Amount, SortDirection::Asc)
        .filter(Filter::Exists {
            key: PaymentField::PayIndex,
        })
        .filter(Filter::AmountRange {
            key: PaymentField::Amount,
            gt: Some(dec!(1100)),
            lt: None,
        });

    group.bench_function("apply_10K_payments", |b| {
        b.iter_batched(
            || payments.clone(),
            |payments| query.apply(payments),
            BatchSize::LargeInput,
        );
    });

    group.bench_function("engine_10K_payments", |b| {
        let rt = Runtime::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        rt.block_on(store.bulk_put(TableRecords::Payments(payments.clone())))
            .unwrap();
        let engine = Engine::new(store);
        b.to_async(rt)
            .iter(|| async { engine.payments(&query).await.unwrap() });
    });

    group.finish();
}

criterion_group!(benches, query_payments);
criterion_main!(benches);
