use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tags and a note attached to a payment or trade with the same `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub id: String,
    /// Stored unordered, displayed in the order given.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Randomly generated by the app.
    pub id: String,
    pub timestamp: u64,
    /// The wallet that made this trade.
    pub wallet_id: String,
    /// Sats.
    pub amount: u64,
    /// Price of one bitcoin in `fiat_denomination`.
    pub price: Decimal,
    /// Sats.
    pub fee: u64,
    pub fiat_denomination: String,
    pub side: TradeSide,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    CoreLn,
    Lnd,
}

/// Connection details for a node wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletConfiguration {
    pub address: String,
    /// Rune or macaroon. Stored sealed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: WalletType,
    pub created_at: u64,
    pub modified_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<WalletConfiguration>,
    #[serde(default)]
    pub last_sync: Option<u64>,
    #[serde(default)]
    pub syncing: bool,
}
