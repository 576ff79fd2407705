use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Transaction,
    Invoice,
    Address,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Transaction => "transaction",
            PaymentType::Invoice => "invoice",
            PaymentType::Address => "address",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Complete,
    Failed,
    Expired,
    Waiting,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Complete => "complete",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Waiting => "waiting",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Bitcoin,
    Testnet,
    Signet,
    Regtest,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Bitcoin => "bitcoin",
            Network::Testnet => "testnet",
            Network::Signet => "signet",
            Network::Regtest => "regtest",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Send,
    Receive,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Send => "send",
            Direction::Receive => "receive",
        }
    }
}

/// A transaction, invoice or address tracked by a wallet.
///
/// Serialized with the variant name under `type` and the variant fields
/// under `data`, next to the common fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub wallet_id: String,
    pub status: PaymentStatus,
    /// Unix seconds.
    pub timestamp: u64,
    /// Sats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,
    pub network: Network,
    #[serde(flatten)]
    pub data: PaymentData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PaymentData {
    Transaction(TransactionData),
    Invoice(InvoiceData),
    Address(AddressData),
}

impl Payment {
    pub fn payment_type(&self) -> PaymentType {
        match self.data {
            PaymentData::Transaction(_) => PaymentType::Transaction,
            PaymentData::Invoice(_) => PaymentType::Invoice,
            PaymentData::Address(_) => PaymentType::Address,
        }
    }

    pub fn key(&self) -> PaymentKey {
        PaymentKey {
            kind: self.payment_type(),
            id: self.id.clone(),
        }
    }

    pub fn as_transaction(&self) -> Option<&TransactionData> {
        match &self.data {
            PaymentData::Transaction(tx) => Some(tx),
            _ => None,
        }
    }

    pub fn as_invoice(&self) -> Option<&InvoiceData> {
        match &self.data {
            PaymentData::Invoice(invoice) => Some(invoice),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<&AddressData> {
        match &self.data {
            PaymentData::Address(address) => Some(address),
            _ => None,
        }
    }
}

/// Primary key of the payments table. Ids are only unique per payment type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaymentKey {
    pub kind: PaymentType,
    pub id: String,
}

impl PaymentKey {
    pub fn new(kind: PaymentType, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockheight: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelRef>,
}

impl TransactionData {
    /// Whether any output pays to `address`.
    pub fn pays_to(&self, address: &str) -> bool {
        self.outputs.iter().any(|output| output.address == address)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TxInput {
    pub txid: String,
    pub index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TxOutput {
    pub address: String,
    /// Sats.
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChannelTxType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelTxType {
    Open,
    Close,
    ForceClose,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Keysend,
    Bolt11,
    LightningAddress,
    Lnurl,
    Bolt12,
}

impl InvoiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceType::Keysend => "keysend",
            InvoiceType::Bolt11 => "bolt11",
            InvoiceType::LightningAddress => "lightning_address",
            InvoiceType::Lnurl => "lnurl",
            InvoiceType::Bolt12 => "bolt12",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    pub direction: Direction,
    #[serde(rename = "type")]
    pub kind: InvoiceType,
    pub created_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    pub hash: String,
    /// BOLT11 or BOLT12 request string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    /// The receiving node id.
    pub node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preimage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer: Option<Offer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A receiving address handed out by the wallet. The payment id is the
/// address itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddressData {
    /// Address or BIP21 string shown to the payer.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub created_at: u64,
    /// Transaction that paid this address, once seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invoice_payment() {
        let json = r#"{
            "id": "inv1",
            "walletId": "w1",
            "status": "complete",
            "timestamp": 1700000000,
            "amount": 2100,
            "network": "bitcoin",
            "type": "invoice",
            "data": {
                "direction": "receive",
                "type": "bolt11",
                "createdAt": 1699999000,
                "completedAt": 1700000000,
                "hash": "abc",
                "nodeId": "02aa",
                "payIndex": 7
            }
        }"#;
        let payment: Payment = serde_json::from_str(json).unwrap();

        assert_eq!(payment.payment_type(), PaymentType::Invoice);
        assert_eq!(payment.amount, Some(2100));
        let invoice = payment.as_invoice().unwrap();
        assert_eq!(invoice.direction, Direction::Receive);
        assert_eq!(invoice.kind, InvoiceType::Bolt11);
        assert_eq!(invoice.pay_index, Some(7));
        assert_eq!(invoice.description, None);
    }

    #[test]
    fn test_serialize_keeps_type_and_data_at_top_level() {
        let payment = Payment {
            id: "bc1qaddr".to_string(),
            wallet_id: "w1".to_string(),
            status: PaymentStatus::Waiting,
            timestamp: 10,
            amount: None,
            fee: None,
            network: Network::Regtest,
            data: PaymentData::Address(AddressData {
                value: "bitcoin:bc1qaddr".to_string(),
                label: None,
                created_at: 10,
                txid: None,
                completed_at: None,
            }),
        };

        let value = serde_json::to_value(&payment).unwrap();
        assert_eq!(value["type"], "address");
        assert_eq!(value["walletId"], "w1");
        assert_eq!(value["data"]["value"], "bitcoin:bc1qaddr");
        assert!(value.get("amount").is_none());
    }

    #[test]
    fn test_unknown_payment_type_is_rejected() {
        let json = r#"{
            "id": "x", "walletId": "w1", "status": "pending", "timestamp": 1,
            "network": "bitcoin", "type": "utxo", "data": {}
        }"#;
        assert!(serde_json::from_str::<Payment>(json).is_err());
    }

    #[test]
    fn test_key_uses_type_and_id() {
        let payment: Payment = serde_json::from_str(
            r#"{
                "id": "t1", "walletId": "w1", "status": "pending", "timestamp": 1,
                "network": "bitcoin", "type": "transaction",
                "data": { "outputs": [{ "address": "a1", "amount": 5 }] }
            }"#,
        )
        .unwrap();

        assert_eq!(payment.key(), PaymentKey::new(PaymentType::Transaction, "t1"));
        assert!(payment.as_transaction().unwrap().pays_to("a1"));
        assert!(!payment.as_transaction().unwrap().pays_to("a2"));
    }
}
