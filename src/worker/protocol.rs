//! Messages exchanged between callers and the worker.
//!
//! A message is `{ "id": ..., "type": <operation>, ...fields }` and a
//! response is `{ "id": ..., "result"?: ..., "error"?: ... }`. A response
//! with neither `result` nor `error` is a successful void reply.

use serde::{Deserialize, Serialize};

use crate::dto::{Channel, Payment};
use crate::query::PaymentQuery;
use crate::stores::TableRecords;
use crate::summary::PaymentSummary;

/// Random token echoed in the response to match it with its request.
pub type CorrelationId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    UpdateChannels {
        channels: Vec<Channel>,
    },
    UpdateTransactions {
        transactions: Vec<Payment>,
    },
    BulkPut(TableRecords),
    #[serde(rename = "get_lastpay_index", rename_all = "camelCase")]
    GetLastPayIndex {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wallet_id: Option<String>,
    },
    GetPaymentSummary {
        payment: Box<Payment>,
    },
    GetAllTags,
    GetPayments(PaymentQuery),
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::UpdateChannels { .. } => "update_channels",
            Request::UpdateTransactions { .. } => "update_transactions",
            Request::BulkPut(_) => "bulk_put",
            Request::GetLastPayIndex { .. } => "get_lastpay_index",
            Request::GetPaymentSummary { .. } => "get_payment_summary",
            Request::GetAllTags => "get_all_tags",
            Request::GetPayments(_) => "get_payments",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: CorrelationId,
    #[serde(flatten)]
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Payment(Box<Payment>),
    Payments(Vec<Payment>),
    Summary(Box<PaymentSummary>),
    Tags(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub id: CorrelationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(id: CorrelationId, result: Option<Reply>) -> Self {
        Self {
            id,
            result,
            error: None,
        }
    }

    pub fn err(id: CorrelationId, error: impl ToString) -> Self {
        Self {
            id,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::ChannelStatus;
    use crate::filter::PaymentField;
    use crate::query::SortDirection;
    use serde_json::json;

    #[test]
    fn test_message_shape() {
        let message = Message {
            id: "abc".to_string(),
            request: Request::GetLastPayIndex {
                wallet_id: Some("w1".to_string()),
            },
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "id": "abc", "type": "get_lastpay_index", "walletId": "w1" })
        );
    }

    #[test]
    fn test_parse_get_payments() {
        let message: Message = serde_json::from_value(json!({
            "id": "1",
            "type": "get_payments",
            "offset": 10,
            "limit": 5,
            "sort": { "key": "data.payIndex", "direction": "asc" },
            "filters": [{ "type": "exists", "key": "data.payIndex" }]
        }))
        .unwrap();

        let Request::GetPayments(query) = message.request else {
            panic!("expected get_payments");
        };
        assert_eq!(query.offset, 10);
        assert_eq!(query.limit, 5);
        assert_eq!(query.sort.key, PaymentField::PayIndex);
        assert_eq!(query.sort.direction, SortDirection::Asc);
        assert_eq!(query.filters.len(), 1);
    }

    #[test]
    fn test_parse_bulk_put_and_channels() {
        let message: Message = serde_json::from_value(json!({
            "id": "2",
            "type": "bulk_put",
            "table": "metadata",
            "data": [{ "id": "p1", "tags": ["x"] }]
        }))
        .unwrap();
        assert!(matches!(message.request, Request::BulkPut(TableRecords::Metadata(ref m)) if m.len() == 1));

        let message: Message = serde_json::from_value(json!({
            "id": "3",
            "type": "update_channels",
            "channels": [{ "id": "c1", "walletId": "w1", "status": "active" }]
        }))
        .unwrap();
        assert_eq!(
            message.request,
            Request::UpdateChannels {
                channels: vec![Channel::new("c1", "w1", ChannelStatus::Active)]
            }
        );
        assert_eq!(message.request.name(), "update_channels");
    }

    #[test]
    fn test_response_shape() {
        let void = Response::ok("1".to_string(), None);
        assert_eq!(serde_json::to_value(&void).unwrap(), json!({ "id": "1" }));

        let tags = Response::ok("2".to_string(), Some(Reply::Tags(vec!["a".to_string()])));
        assert_eq!(
            serde_json::to_value(&tags).unwrap(),
            json!({ "id": "2", "result": ["a"] })
        );

        let failed = Response::err("3".to_string(), "boom");
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "id": "3", "error": "boom" })
        );
    }
}
