//! Payment storage keyed by payment type and id.
//!
//! Iteration follows primary key order, which is the natural storage order
//! the query engine falls back to for ties.

use std::collections::BTreeMap;

use crate::dto::{Payment, PaymentKey, PaymentType};
use crate::error::StoreError;

const TABLE: &str = "payments";

#[derive(Default)]
pub struct PaymentsTable {
    payments: BTreeMap<PaymentKey, Payment>,
}

impl PaymentsTable {
    /// Inserts or replaces every payment. Validates all keys before writing,
    /// so a rejected batch leaves the table untouched.
    pub fn bulk_put(&mut self, payments: Vec<Payment>) -> Result<(), StoreError> {
        if payments.iter().any(|payment| payment.id.is_empty()) {
            return Err(StoreError::InvalidKey { table: TABLE });
        }
        for payment in payments {
            self.payments.insert(payment.key(), payment);
        }
        Ok(())
    }

    /// Applies `update` to the stored payment, if any.
    /// The update must not change the payment's key.
    pub fn update(&mut self, key: &PaymentKey, update: impl FnOnce(&mut Payment)) -> bool {
        match self.payments.get_mut(key) {
            Some(payment) => {
                update(payment);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Payment> {
        self.payments.values()
    }

    pub fn for_wallet<'a>(
        &'a self,
        wallet_id: &'a str,
        kind: PaymentType,
    ) -> impl Iterator<Item = &'a Payment> + 'a {
        self.payments
            .iter()
            .filter(move |(key, payment)| key.kind == kind && payment.wallet_id == wallet_id)
            .map(|(_, payment)| payment)
    }
}
