use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Persisted welcome channel overrides, keyed by guild id.
///
/// Serialized as a flat JSON object: `{"<guild id>": <channel id>}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ServerWelcomeConfig {
    channels: BTreeMap<String, u64>,
}

impl ServerWelcomeConfig {
    /// Configured welcome channel for a guild, if any
    pub fn welcome_channel(&self, guild_id: u64) -> Option<u64> {
        self.channels.get(&guild_id.to_string()).copied()
    }

    /// Set or overwrite the welcome channel for a guild
    pub fn set_welcome_channel(&mut self, guild_id: u64, channel_id: u64) {
        self.channels.insert(guild_id.to_string(), channel_id);
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// A text channel as seen by the channel resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: u64,
    pub name: String,
}

impl ChannelRef {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Discord channel mention, e.g. `<#123>`
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

/// Everything a member join needs from the cached guild.
///
/// Copied out of the cache up front so no cache guard lives across an await.
#[derive(Debug, Clone, Default)]
pub struct GuildSnapshot {
    pub id: u64,
    pub name: String,
    pub owner_id: u64,
    /// Owner display name, when the owner is in the member cache
    pub cached_owner: Option<String>,
    /// Text channels in the order Discord lists them
    pub text_channels: Vec<ChannelRef>,
    /// Rendered decorative custom emoji, when the guild has one
    pub emoji: Option<String>,
}

impl GuildSnapshot {
    pub fn channel(&self, id: u64) -> Option<&ChannelRef> {
        self.text_channels.iter().find(|c| c.id == id)
    }
}

/// Channels resolved for a single join event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedChannels {
    pub welcome: Option<ChannelRef>,
    pub rules: Option<ChannelRef>,
    pub announcements: Option<ChannelRef>,
    pub general: Option<ChannelRef>,
}

/// Where the owner's display name came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerName {
    Cached(String),
    Fetched(String),
    Unknown,
}

impl OwnerName {
    pub fn name(&self) -> Option<&str> {
        match self {
            OwnerName::Cached(name) | OwnerName::Fetched(name) => Some(name),
            OwnerName::Unknown => None,
        }
    }
}
