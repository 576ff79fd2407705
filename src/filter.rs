//! Declarative filters over payment fields.
//!
//! Fields are addressed with the dotted paths callers already use
//! (`status`, `data.payIndex`, ...), but every path is parsed into a
//! [`PaymentField`] up front, so an unknown path is rejected when the filter
//! is built rather than silently matching nothing.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dto::{Payment, PaymentData};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PaymentField {
    Id,
    WalletId,
    Type,
    Status,
    Timestamp,
    Amount,
    Fee,
    Network,
    Direction,
    InvoiceType,
    PayIndex,
    Hash,
    Request,
    NodeId,
    Description,
    Preimage,
    Offer,
    OfferId,
    OfferIssuer,
    OfferPayerNote,
    OfferDescription,
    CreatedAt,
    CompletedAt,
    ExpiresAt,
    Txid,
    Label,
    AddressValue,
    Blockheight,
    Channel,
    ChannelId,
    ChannelType,
}

const FIELD_PATHS: &[(PaymentField, &str)] = &[
    (PaymentField::Id, "id"),
    (PaymentField::WalletId, "walletId"),
    (PaymentField::Type, "type"),
    (PaymentField::Status, "status"),
    (PaymentField::Timestamp, "timestamp"),
    (PaymentField::Amount, "amount"),
    (PaymentField::Fee, "fee"),
    (PaymentField::Network, "network"),
    (PaymentField::Direction, "data.direction"),
    (PaymentField::InvoiceType, "data.type"),
    (PaymentField::PayIndex, "data.payIndex"),
    (PaymentField::Hash, "data.hash"),
    (PaymentField::Request, "data.request"),
    (PaymentField::NodeId, "data.nodeId"),
    (PaymentField::Description, "data.description"),
    (PaymentField::Preimage, "data.preimage"),
    (PaymentField::Offer, "data.offer"),
    (PaymentField::OfferId, "data.offer.id"),
    (PaymentField::OfferIssuer, "data.offer.issuer"),
    (PaymentField::OfferPayerNote, "data.offer.payerNote"),
    (PaymentField::OfferDescription, "data.offer.description"),
    (PaymentField::CreatedAt, "data.createdAt"),
    (PaymentField::CompletedAt, "data.completedAt"),
    (PaymentField::ExpiresAt, "data.expiresAt"),
    (PaymentField::Txid, "data.txid"),
    (PaymentField::Label, "data.label"),
    (PaymentField::AddressValue, "data.value"),
    (PaymentField::Blockheight, "data.blockheight"),
    (PaymentField::Channel, "data.channel"),
    (PaymentField::ChannelId, "data.channel.id"),
    (PaymentField::ChannelType, "data.channel.type"),
];

impl PaymentField {
    pub fn path(&self) -> &'static str {
        FIELD_PATHS
            .iter()
            .find(|(field, _)| field == self)
            .map(|(_, path)| *path)
            .unwrap_or_default()
    }

    /// Reads this field from `payment`. Fields that do not exist on the
    /// payment's variant, or are unset, resolve to [`FieldValue::Absent`].
    pub fn resolve(&self, payment: &Payment) -> FieldValue {
        let invoice = payment.as_invoice();
        let address = payment.as_address();
        let transaction = payment.as_transaction();
        let offer = invoice.and_then(|i| i.offer.as_ref());

        match self {
            PaymentField::Id => FieldValue::text(&payment.id),
            PaymentField::WalletId => FieldValue::text(&payment.wallet_id),
            PaymentField::Type => FieldValue::text(payment.payment_type().as_str()),
            PaymentField::Status => FieldValue::text(payment.status.as_str()),
            PaymentField::Timestamp => FieldValue::number(payment.timestamp),
            PaymentField::Amount => payment.amount.into(),
            PaymentField::Fee => payment.fee.into(),
            PaymentField::Network => FieldValue::text(payment.network.as_str()),
            PaymentField::Direction => invoice.map(|i| i.direction.as_str()).into(),
            PaymentField::InvoiceType => invoice.map(|i| i.kind.as_str()).into(),
            PaymentField::PayIndex => invoice.and_then(|i| i.pay_index).into(),
            PaymentField::Hash => invoice.map(|i| i.hash.as_str()).into(),
            PaymentField::Request => invoice.and_then(|i| i.request.as_deref()).into(),
            PaymentField::NodeId => invoice.map(|i| i.node_id.as_str()).into(),
            PaymentField::Description => invoice.and_then(|i| i.description.as_deref()).into(),
            PaymentField::Preimage => invoice.and_then(|i| i.preimage.as_deref()).into(),
            PaymentField::Offer => FieldValue::present(offer),
            PaymentField::OfferId => offer.and_then(|o| o.id.as_deref()).into(),
            PaymentField::OfferIssuer => offer.and_then(|o| o.issuer.as_deref()).into(),
            PaymentField::OfferPayerNote => offer.and_then(|o| o.payer_note.as_deref()).into(),
            PaymentField::OfferDescription => offer.and_then(|o| o.description.as_deref()).into(),
            PaymentField::CreatedAt => match &payment.data {
                PaymentData::Invoice(invoice) => FieldValue::number(invoice.created_at),
                PaymentData::Address(address) => FieldValue::number(address.created_at),
                PaymentData::Transaction(_) => FieldValue::Absent,
            },
            PaymentField::CompletedAt => match &payment.data {
                PaymentData::Invoice(invoice) => invoice.completed_at.into(),
                PaymentData::Address(address) => address.completed_at.into(),
                PaymentData::Transaction(_) => FieldValue::Absent,
            },
            PaymentField::ExpiresAt => invoice.and_then(|i| i.expires_at).into(),
            PaymentField::Txid => address.and_then(|a| a.txid.as_deref()).into(),
            PaymentField::Label => address.and_then(|a| a.label.as_deref()).into(),
            PaymentField::AddressValue => address.map(|a| a.value.as_str()).into(),
            PaymentField::Blockheight => transaction.and_then(|t| t.blockheight).into(),
            PaymentField::Channel => {
                FieldValue::present(transaction.and_then(|t| t.channel.as_ref()))
            }
            PaymentField::ChannelId => transaction
                .and_then(|t| t.channel.as_ref())
                .map(|channel| channel.id.as_str())
                .into(),
            PaymentField::ChannelType => transaction
                .and_then(|t| t.channel.as_ref())
                .map(|channel| match channel.kind {
                    crate::dto::ChannelTxType::Open => "open",
                    crate::dto::ChannelTxType::Close => "close",
                    crate::dto::ChannelTxType::ForceClose => "force_close",
                })
                .into(),
        }
    }
}

impl FromStr for PaymentField {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        FIELD_PATHS
            .iter()
            .find(|(_, candidate)| *candidate == path)
            .map(|(field, _)| *field)
            .ok_or_else(|| Error::UnknownField(path.to_string()))
    }
}

impl TryFrom<String> for PaymentField {
    type Error = Error;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        path.parse()
    }
}

impl From<PaymentField> for String {
    fn from(field: PaymentField) -> Self {
        field.path().to_string()
    }
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A resolved field value. Ordering is `Absent < Bool < Number < Text`,
/// which is what sorting uses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawValue", into = "RawValue")]
pub enum FieldValue {
    Absent,
    Bool(bool),
    Number(Decimal),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn number(value: u64) -> Self {
        FieldValue::Number(Decimal::from(value))
    }

    fn present<T>(value: Option<T>) -> Self {
        FieldValue::Bool(value.is_some())
    }

    /// `false` for absent values, `false`, zero and the empty string.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Absent => false,
            FieldValue::Bool(value) => *value,
            FieldValue::Number(value) => !value.is_zero(),
            FieldValue::Text(value) => !value.is_empty(),
        }
    }
}

impl From<Option<u64>> for FieldValue {
    fn from(value: Option<u64>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::number)
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::text)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl From<RawValue> for FieldValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Bool(value) => FieldValue::Bool(value),
            RawValue::Int(value) => FieldValue::Number(Decimal::from(value)),
            RawValue::Float(value) => Decimal::from_f64_retain(value)
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Absent),
            RawValue::Text(value) => FieldValue::Text(value),
            RawValue::Null => FieldValue::Absent,
        }
    }
}

impl From<FieldValue> for RawValue {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Absent => RawValue::Null,
            FieldValue::Bool(value) => RawValue::Bool(value),
            FieldValue::Number(value) if value.fract().is_zero() => value
                .to_i64()
                .map(RawValue::Int)
                .unwrap_or_else(|| RawValue::Text(value.to_string())),
            FieldValue::Number(value) => value
                .to_f64()
                .map(RawValue::Float)
                .unwrap_or_else(|| RawValue::Text(value.to_string())),
            FieldValue::Text(value) => RawValue::Text(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Filter {
    Exists {
        key: PaymentField,
    },
    OneOf {
        key: PaymentField,
        values: Vec<FieldValue>,
    },
    /// Exclusive bounds, in sats.
    AmountRange {
        key: PaymentField,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gt: Option<Decimal>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lt: Option<Decimal>,
    },
    /// Exclusive bounds, in unix seconds.
    DateRange {
        key: PaymentField,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gt: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lt: Option<u64>,
    },
}

impl Filter {
    pub fn key(&self) -> PaymentField {
        match self {
            Filter::Exists { key }
            | Filter::OneOf { key, .. }
            | Filter::AmountRange { key, .. }
            | Filter::DateRange { key, .. } => *key,
        }
    }

    pub fn matches(&self, payment: &Payment) -> bool {
        let value = self.key().resolve(payment);
        match self {
            Filter::Exists { .. } => value.is_truthy(),
            Filter::OneOf { values, .. } => {
                value != FieldValue::Absent && values.contains(&value)
            }
            Filter::AmountRange { gt, lt, .. } => in_range(&value, *gt, *lt),
            Filter::DateRange { gt, lt, .. } => {
                in_range(&value, gt.map(Decimal::from), lt.map(Decimal::from))
            }
        }
    }
}

/// Whether `payment` passes every filter.
pub fn matches_all(filters: &[Filter], payment: &Payment) -> bool {
    filters.iter().all(|filter| filter.matches(payment))
}

fn in_range(value: &FieldValue, gt: Option<Decimal>, lt: Option<Decimal>) -> bool {
    if gt.is_none() && lt.is_none() {
        return true;
    }
    let FieldValue::Number(value) = value else {
        return false;
    };
    gt.map_or(true, |gt| *value > gt) && lt.map_or(true, |lt| *value < lt)
}
