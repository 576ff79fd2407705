use serde::Serialize;

use super::{Payment, PaymentStatus, PaymentType};

/// One exported line per payment.
#[derive(Debug, Serialize, PartialEq)]
pub struct PaymentRow {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PaymentType,
    pub wallet_id: String,
    pub status: PaymentStatus,
    pub timestamp: u64,
    pub amount: Option<u64>,
    pub fee: Option<u64>,
}

impl From<Payment> for PaymentRow {
    fn from(payment: Payment) -> Self {
        Self {
            kind: payment.payment_type(),
            id: payment.id,
            wallet_id: payment.wallet_id,
            status: payment.status,
            timestamp: payment.timestamp,
            amount: payment.amount,
            fee: payment.fee,
        }
    }
}
