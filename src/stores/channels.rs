use std::collections::BTreeMap;

use crate::dto::{Channel, ChannelKey};
use crate::error::StoreError;

const TABLE: &str = "channels";

#[derive(Default)]
pub struct ChannelsTable {
    channels: BTreeMap<ChannelKey, Channel>,
}

impl ChannelsTable {
    /// Inserts a new channel. The composite key must not exist yet.
    pub fn add(&mut self, channel: Channel) -> Result<(), StoreError> {
        validate(&channel)?;
        let key = channel.key();
        if self.channels.contains_key(&key) {
            return Err(StoreError::Constraint {
                table: TABLE,
                key: format!("{}/{}", key.wallet_id, key.id),
            });
        }
        self.channels.insert(key, channel);
        Ok(())
    }

    /// Applies `update` to the stored channel, if any.
    pub fn modify(&mut self, key: &ChannelKey, update: impl FnOnce(&mut Channel)) -> bool {
        match self.channels.get_mut(key) {
            Some(channel) => {
                update(channel);
                true
            }
            None => false,
        }
    }

    /// Inserts or replaces every channel, rejecting the whole batch on an invalid key.
    pub fn bulk_put(&mut self, channels: Vec<Channel>) -> Result<(), StoreError> {
        channels.iter().try_for_each(validate)?;
        for channel in channels {
            self.channels.insert(channel.key(), channel);
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }
}

fn validate(channel: &Channel) -> Result<(), StoreError> {
    if channel.id.is_empty() || channel.wallet_id.is_empty() {
        return Err(StoreError::InvalidKey { table: TABLE });
    }
    Ok(())
}
