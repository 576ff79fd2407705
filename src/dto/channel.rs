use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    Opening,
    Active,
    Closing,
    Closed,
    ForceClosed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Local,
    Remote,
}

/// Locally cached state of a Lightning channel.
///
/// Backends report less detail for a closed channel once its closing
/// transaction is ~100 blocks deep, so most fields are optional and
/// [`Channel::merge`] never clears a field the incoming record omits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub wallet_id: String,
    pub status: ChannelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_id: Option<String>,
    /// Sats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_local: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_remote: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve_local: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve_remote: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opener: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closer: Option<Party>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_output: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_txid: Option<String>,
    /// Msats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_base: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_ppm: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelKey {
    pub id: String,
    pub wallet_id: String,
}

impl Channel {
    pub fn new(id: impl Into<String>, wallet_id: impl Into<String>, status: ChannelStatus) -> Self {
        Self {
            id: id.into(),
            wallet_id: wallet_id.into(),
            status,
            short_id: None,
            peer_id: None,
            balance_local: None,
            balance_remote: None,
            reserve_local: None,
            reserve_remote: None,
            opener: None,
            closer: None,
            funding_txid: None,
            funding_output: None,
            closing_txid: None,
            fee_base: None,
            fee_ppm: None,
        }
    }

    pub fn key(&self) -> ChannelKey {
        ChannelKey {
            id: self.id.clone(),
            wallet_id: self.wallet_id.clone(),
        }
    }

    /// Applies `incoming` field by field. Fields the incoming record does
    /// not carry keep their current value.
    pub fn merge(&mut self, incoming: &Channel) {
        self.status = incoming.status;
        merge_field(&mut self.short_id, &incoming.short_id);
        merge_field(&mut self.peer_id, &incoming.peer_id);
        merge_field(&mut self.balance_local, &incoming.balance_local);
        merge_field(&mut self.balance_remote, &incoming.balance_remote);
        merge_field(&mut self.reserve_local, &incoming.reserve_local);
        merge_field(&mut self.reserve_remote, &incoming.reserve_remote);
        merge_field(&mut self.opener, &incoming.opener);
        merge_field(&mut self.closer, &incoming.closer);
        merge_field(&mut self.funding_txid, &incoming.funding_txid);
        merge_field(&mut self.funding_output, &incoming.funding_output);
        merge_field(&mut self.closing_txid, &incoming.closing_txid);
        merge_field(&mut self.fee_base, &incoming.fee_base);
        merge_field(&mut self.fee_ppm, &incoming.fee_ppm);
    }
}

fn merge_field<T: Clone>(current: &mut Option<T>, incoming: &Option<T>) {
    if let Some(value) = incoming {
        *current = Some(value.clone());
    }
}
