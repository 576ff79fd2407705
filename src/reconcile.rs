//! Links receiving addresses to the on-chain transactions that paid them.

use crate::dto::{Payment, PaymentData, PaymentKey};

/// An address payment paid by a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressLink {
    pub address: PaymentKey,
    pub txid: String,
    pub completed_at: u64,
}

impl AddressLink {
    /// Records the paying transaction on the address, leaving its other fields as they are.
    pub fn apply(&self, payment: &mut Payment) {
        if let PaymentData::Address(address) = &mut payment.data {
            address.txid = Some(self.txid.clone());
            address.completed_at = Some(self.completed_at);
        }
    }
}

/// For every address not yet linked to a transaction, finds the first
/// transaction in `transactions` with an output paying to the address id.
/// Addresses with no match produce no link.
pub fn link_addresses(addresses: &[Payment], transactions: &[Payment]) -> Vec<AddressLink> {
    addresses
        .iter()
        .filter(|payment| {
            payment
                .as_address()
                .is_some_and(|address| address.txid.is_none())
        })
        .filter_map(|address| {
            transactions
                .iter()
                .find(|payment| {
                    payment
                        .as_transaction()
                        .is_some_and(|tx| tx.pays_to(&address.id))
                })
                .map(|tx| AddressLink {
                    address: address.key(),
                    txid: tx.id.clone(),
                    completed_at: tx.timestamp,
                })
        })
        .collect()
}
