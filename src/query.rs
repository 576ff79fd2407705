//! Sorting, filtering, de-duplication and pagination of payments.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dto::{Payment, PaymentKey};
use crate::filter::{matches_all, FieldValue, Filter, PaymentField};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sort {
    pub key: PaymentField,
    pub direction: SortDirection,
}

impl Default for Sort {
    /// Newest first.
    fn default() -> Self {
        Self {
            key: PaymentField::Timestamp,
            direction: SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentQuery {
    pub offset: usize,
    pub limit: usize,
    #[serde(default)]
    pub sort: Sort,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
}

impl PaymentQuery {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            sort: Sort::default(),
            filters: Vec::new(),
        }
    }

    pub fn sort_by(mut self, key: PaymentField, direction: SortDirection) -> Self {
        self.sort = Sort { key, direction };
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Runs the query over `payments`, given in natural storage order.
    pub fn apply(&self, mut payments: Vec<Payment>) -> Vec<Payment> {
        sort_payments(&mut payments, &self.sort);
        payments.retain(|payment| matches_all(&self.filters, payment));
        dedup(payments)
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect()
    }
}

/// Stable sort on the resolved key. Ties keep their incoming order in both
/// directions; absent values sort before present ones when ascending.
pub fn sort_payments(payments: &mut Vec<Payment>, sort: &Sort) {
    let mut keyed: Vec<(FieldValue, Payment)> = payments
        .drain(..)
        .map(|payment| (sort.key.resolve(&payment), payment))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match sort.direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });
    payments.extend(keyed.into_iter().map(|(_, payment)| payment));
}

/// Drops records structurally identical to an earlier one, keeping the first.
pub fn dedup(payments: Vec<Payment>) -> Vec<Payment> {
    let mut seen: HashMap<PaymentKey, Vec<usize>> = HashMap::new();
    let mut unique: Vec<Payment> = Vec::with_capacity(payments.len());
    for payment in payments {
        let kept = seen.entry(payment.key()).or_default();
        if kept.iter().any(|&index| unique[index] == payment) {
            continue;
        }
        kept.push(unique.len());
        unique.push(payment);
    }
    unique
}
