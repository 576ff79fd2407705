//! Display-ready summaries of payments.

use serde::{Deserialize, Serialize};

use crate::dto::{ChannelTxType, Direction, Payment, PaymentData, PaymentStatus, PaymentType};
use crate::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PaymentType,
    pub status: PaymentStatus,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Sats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Node, offer issuer or address on the other side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<String>,
}

/// Maps a payment to its summary. Must not touch the store.
pub trait SummaryDeriver: Send + Sync {
    fn derive(&self, payment: &Payment) -> Result<PaymentSummary, Error>;
}

/// Summaries computed from the payment record alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicSummaries;

impl SummaryDeriver for BasicSummaries {
    fn derive(&self, payment: &Payment) -> Result<PaymentSummary, Error> {
        let mut summary = PaymentSummary {
            id: payment.id.clone(),
            kind: payment.payment_type(),
            status: payment.status,
            timestamp: payment.timestamp,
            direction: None,
            amount: payment.amount,
            fee: payment.fee,
            description: None,
            counterparty: None,
        };

        match &payment.data {
            PaymentData::Transaction(tx) => {
                let first = tx.outputs.first().ok_or_else(|| Error::Summary {
                    id: payment.id.clone(),
                    reason: "transaction has no outputs",
                })?;
                summary.amount = summary
                    .amount
                    .or_else(|| Some(tx.outputs.iter().map(|output| output.amount).sum()));
                summary.counterparty = Some(first.address.clone());
                summary.description = tx.channel.as_ref().map(|channel| {
                    match channel.kind {
                        ChannelTxType::Open => "Channel open",
                        ChannelTxType::Close => "Channel close",
                        ChannelTxType::ForceClose => "Channel force close",
                    }
                    .to_string()
                });
            }
            PaymentData::Invoice(invoice) => {
                let offer = invoice.offer.as_ref();
                summary.direction = Some(invoice.direction);
                summary.description = invoice
                    .description
                    .clone()
                    .filter(|description| !description.is_empty())
                    .or_else(|| offer.and_then(|offer| offer.description.clone()));
                summary.counterparty = offer
                    .and_then(|offer| offer.issuer.clone())
                    .or_else(|| Some(invoice.node_id.clone()));
            }
            PaymentData::Address(address) => {
                summary.direction = Some(Direction::Receive);
                summary.description = address.label.clone();
                summary.counterparty = Some(payment.id.clone());
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{
        AddressData, ChannelRef, InvoiceData, InvoiceType, Network, Offer, TransactionData,
        TxOutput,
    };

    fn base(data: PaymentData) -> Payment {
        Payment {
            id: "p1".to_string(),
            wallet_id: "w1".to_string(),
            status: PaymentStatus::Complete,
            timestamp: 42,
            amount: None,
            fee: Some(3),
            network: Network::Bitcoin,
            data,
        }
    }

    fn invoice(description: Option<&str>, offer: Option<Offer>) -> InvoiceData {
        InvoiceData {
            direction: Direction::Send,
            kind: InvoiceType::Bolt12,
            created_at: 40,
            completed_at: Some(42),
            expires_at: None,
            hash: "h".to_string(),
            request: None,
            node_id: "02node".to_string(),
            description: description.map(str::to_string),
            preimage: None,
            pay_index: None,
            offer,
        }
    }

    #[test]
    fn test_transaction_summary_sums_outputs() {
        let payment = base(PaymentData::Transaction(TransactionData {
            inputs: vec![],
            outputs: vec![
                TxOutput {
                    address: "bc1qa".to_string(),
                    amount: 700,
                },
                TxOutput {
                    address: "bc1qb".to_string(),
                    amount: 300,
                },
            ],
            blockheight: Some(1),
            channel: Some(ChannelRef {
                id: "c1".to_string(),
                kind: ChannelTxType::Open,
            }),
        }));

        let summary = BasicSummaries.derive(&payment).unwrap();
        assert_eq!(summary.kind, PaymentType::Transaction);
        assert_eq!(summary.amount, Some(1000));
        assert_eq!(summary.fee, Some(3));
        assert_eq!(summary.counterparty.as_deref(), Some("bc1qa"));
        assert_eq!(summary.description.as_deref(), Some("Channel open"));
    }

    #[test]
    fn test_transaction_without_outputs_fails() {
        let payment = base(PaymentData::Transaction(TransactionData {
            inputs: vec![],
            outputs: vec![],
            blockheight: None,
            channel: None,
        }));

        let result = BasicSummaries.derive(&payment);
        assert!(matches!(result, Err(Error::Summary { id, .. }) if id == "p1"));
    }

    #[test]
    fn test_invoice_prefers_offer_details() {
        let offer = Offer {
            id: None,
            issuer: Some("Bitcoin Shop".to_string()),
            payer_note: None,
            description: Some("Coffee".to_string()),
        };
        let payment = base(PaymentData::Invoice(invoice(Some(""), Some(offer))));

        let summary = BasicSummaries.derive(&payment).unwrap();
        assert_eq!(summary.direction, Some(Direction::Send));
        assert_eq!(summary.description.as_deref(), Some("Coffee"));
        assert_eq!(summary.counterparty.as_deref(), Some("Bitcoin Shop"));
    }

    #[test]
    fn test_invoice_without_offer_uses_node() {
        let payment = base(PaymentData::Invoice(invoice(Some("Rent"), None)));

        let summary = BasicSummaries.derive(&payment).unwrap();
        assert_eq!(summary.description.as_deref(), Some("Rent"));
        assert_eq!(summary.counterparty.as_deref(), Some("02node"));
    }

    #[test]
    fn test_address_summary_is_receive() {
        let payment = base(PaymentData::Address(AddressData {
            value: "bitcoin:p1".to_string(),
            label: Some("Donations".to_string()),
            created_at: 42,
            txid: None,
            completed_at: None,
        }));

        let summary = BasicSummaries.derive(&payment).unwrap();
        assert_eq!(summary.direction, Some(Direction::Receive));
        assert_eq!(summary.description.as_deref(), Some("Donations"));
        assert_eq!(summary.amount, None);
    }
}
