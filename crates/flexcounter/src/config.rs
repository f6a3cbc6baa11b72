//! Flex counter configuration.
//!
//! Instance configuration arrives as flat `(field, value)` pairs (see
//! [`fields`]); process-level defaults live in [`FlexCounterConfig`].

use serde::{Deserialize, Serialize};
use sonic_sai::StatsMode;
use std::str::FromStr;

use crate::error::{FlexCounterError, Result};

/// Field names understood by flex counter instances.
pub mod fields {
    pub const POLL_INTERVAL: &str = "POLL_INTERVAL";
    pub const STATUS: &str = "FLEX_COUNTER_STATUS";
    pub const STATUS_ENABLE: &str = "enable";
    pub const STATUS_DISABLE: &str = "disable";
    pub const STATS_MODE: &str = "STATS_MODE";
    pub const BULK_CHUNK_SIZE: &str = "BULK_CHUNK_SIZE";
    pub const BULK_CHUNK_SIZE_PER_PREFIX: &str = "BULK_CHUNK_SIZE_PER_PREFIX";

    pub const PORT_PLUGIN: &str = "PORT_PLUGIN_LIST";
    pub const QUEUE_PLUGIN: &str = "QUEUE_PLUGIN_LIST";
    pub const PG_PLUGIN: &str = "PG_PLUGIN_LIST";
    pub const RIF_PLUGIN: &str = "RIF_PLUGIN_LIST";
    pub const BUFFER_POOL_PLUGIN: &str = "BUFFER_POOL_PLUGIN_LIST";
    pub const TUNNEL_PLUGIN: &str = "TUNNEL_PLUGIN_LIST";
    pub const FLOW_COUNTER_PLUGIN: &str = "FLOW_COUNTER_PLUGIN_FIELD";
    pub const WRED_QUEUE_PLUGIN: &str = "WRED_QUEUE_PLUGIN_LIST";
    pub const WRED_PORT_PLUGIN: &str = "WRED_PORT_PLUGIN_LIST";

    pub const PORT_COUNTER_ID_LIST: &str = "PORT_COUNTER_ID_LIST";
    pub const PORT_DEBUG_COUNTER_ID_LIST: &str = "PORT_DEBUG_COUNTER_ID_LIST";
    pub const QUEUE_COUNTER_ID_LIST: &str = "QUEUE_COUNTER_ID_LIST";
    pub const QUEUE_ATTR_ID_LIST: &str = "QUEUE_ATTR_ID_LIST";
    pub const PG_COUNTER_ID_LIST: &str = "PG_COUNTER_ID_LIST";
    pub const PG_ATTR_ID_LIST: &str = "PG_ATTR_ID_LIST";
    pub const RIF_COUNTER_ID_LIST: &str = "RIF_COUNTER_ID_LIST";
    pub const SWITCH_DEBUG_COUNTER_ID_LIST: &str = "SWITCH_DEBUG_COUNTER_ID_LIST";
    pub const MACSEC_FLOW_COUNTER_ID_LIST: &str = "MACSEC_FLOW_COUNTER_ID_LIST";
    pub const MACSEC_SA_COUNTER_ID_LIST: &str = "MACSEC_SA_COUNTER_ID_LIST";
    pub const MACSEC_SA_ATTR_ID_LIST: &str = "MACSEC_SA_ATTR_ID_LIST";
    pub const ACL_COUNTER_ATTR_ID_LIST: &str = "ACL_COUNTER_ATTR_ID_LIST";
    pub const TUNNEL_COUNTER_ID_LIST: &str = "TUNNEL_COUNTER_ID_LIST";
    pub const BUFFER_POOL_COUNTER_ID_LIST: &str = "BUFFER_POOL_COUNTER_ID_LIST";
    pub const FLOW_COUNTER_ID_LIST: &str = "FLOW_COUNTER_ID_LIST";
    pub const POLICER_COUNTER_ID_LIST: &str = "POLICER_COUNTER_ID_LIST";
    pub const ENI_COUNTER_ID_LIST: &str = "DASH_ENI_COUNTER_ID_LIST";
    pub const METER_BUCKET_COUNTER_ID_LIST: &str = "DASH_METER_COUNTER_ID_LIST";
    pub const WRED_ECN_QUEUE_COUNTER_ID_LIST: &str = "WRED_ECN_QUEUE_COUNTER_ID_LIST";
    pub const WRED_ECN_PORT_COUNTER_ID_LIST: &str = "WRED_ECN_PORT_COUNTER_ID_LIST";
}

/// Name of the partition holding counters no prefix matched.
pub const DEFAULT_PARTITION: &str = "default";

/// Process-level settings for flex counter instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlexCounterConfig {
    /// Counters database name handed to plugins.
    pub counters_db: String,
    /// Counters table name handed to plugins.
    pub counters_table: String,
    /// Poll interval before any POLL_INTERVAL field arrives.
    pub poll_interval_ms: u32,
    /// Stats mode before any STATS_MODE field arrives.
    pub stats_mode: StatsMode,
    /// Scheduler threads are named `<prefix>-<instance>`.
    pub thread_name_prefix: String,
}

impl Default for FlexCounterConfig {
    fn default() -> Self {
        Self {
            counters_db: "COUNTERS_DB".to_string(),
            counters_table: "COUNTERS".to_string(),
            poll_interval_ms: 0,
            stats_mode: StatsMode::Read,
            thread_name_prefix: "flexcnt".to_string(),
        }
    }
}

/// One `prefix[|prefix...]:size` item of BULK_CHUNK_SIZE_PER_PREFIX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixGroup {
    /// Partition name, the item's prefix list as written.
    pub name: String,
    pub prefixes: Vec<String>,
    pub chunk_size: u32,
}

impl PrefixGroup {
    /// Returns true if `counter_name` starts with one of the prefixes.
    pub fn matches(&self, counter_name: &str) -> bool {
        self.prefixes.iter().any(|p| counter_name.starts_with(p.as_str()))
    }
}

/// Parsed BULK_CHUNK_SIZE_PER_PREFIX value.
///
/// Format: `prefixA|prefixB:32;prefixC:16`. Items are matched in order; a
/// counter belongs to the first item with a matching prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefixChunkConfig {
    groups: Vec<PrefixGroup>,
}

impl PrefixChunkConfig {
    /// Returns true if no prefix items are configured.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the configured prefix items in order.
    pub fn groups(&self) -> &[PrefixGroup] {
        &self.groups
    }

    /// Returns the first item matching `counter_name` with its position.
    pub fn classify(&self, counter_name: &str) -> Option<(usize, &PrefixGroup)> {
        self.groups
            .iter()
            .enumerate()
            .find(|(_, g)| g.matches(counter_name))
    }

    /// Returns the chunk size configured for a partition name.
    pub fn chunk_size_of(&self, partition: &str) -> Option<u32> {
        self.groups
            .iter()
            .find(|g| g.name == partition)
            .map(|g| g.chunk_size)
    }

    /// Returns true if both configs split counters the same way.
    ///
    /// Chunk sizes are ignored.
    pub fn same_prefixes(&self, other: &Self) -> bool {
        self.groups.len() == other.groups.len()
            && self
                .groups
                .iter()
                .zip(&other.groups)
                .all(|(a, b)| a.prefixes == b.prefixes)
    }
}

impl FromStr for PrefixChunkConfig {
    type Err = FlexCounterError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FlexCounterError::InvalidBulkChunkSizePerPrefix(s.to_string());
        let mut groups = Vec::new();

        for item in s.split(';').map(str::trim).filter(|i| !i.is_empty()) {
            let (prefix_list, size) = item.rsplit_once(':').ok_or_else(invalid)?;
            let chunk_size: u32 = size.trim().parse().map_err(|_| invalid())?;
            let prefixes: Vec<String> = prefix_list
                .split('|')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if prefixes.is_empty() {
                return Err(invalid());
            }
            groups.push(PrefixGroup {
                name: prefixes.join("|"),
                prefixes,
                chunk_size,
            });
        }

        Ok(Self { groups })
    }
}

/// Parses a FLEX_COUNTER_STATUS value.
pub fn parse_status(value: &str) -> Result<bool> {
    match value {
        fields::STATUS_ENABLE => Ok(true),
        fields::STATUS_DISABLE => Ok(false),
        other => Err(FlexCounterError::InvalidStatus(other.to_string())),
    }
}

/// Splits a comma-separated plugin list.
pub fn parse_plugin_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
