//! Core SAI types used by stats collection.
//!
//! Covers the object types that carry counters, the VID encoding that lets
//! the object type be recovered from a virtual id, the key shapes bulk stats
//! calls accept, and the stats read modes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw SAI object ID type (matches sai_object_id_t in C).
pub type RawSaiObjectId = u64;

/// The null object ID (SAI_NULL_OBJECT_ID).
pub const SAI_NULL_OBJECT_ID: RawSaiObjectId = 0;

const VID_OBJECT_TYPE_SHIFT: u32 = 48;
const VID_OBJECT_TYPE_MASK: u64 = 0xff;

/// SAI object types that expose statistics or attributes for polling.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SaiObjectType {
    Port = 1,
    RouterInterface = 6,
    AclCounter = 9,
    Policer = 18,
    Queue = 21,
    BufferPool = 24,
    IngressPriorityGroup = 26,
    Switch = 33,
    Tunnel = 42,
    Counter = 80,
    MacsecFlow = 84,
    MacsecSa = 86,
    Eni = 200,
    MeterBucketEntry = 201,
}

impl SaiObjectType {
    /// Returns all object types known to this crate.
    pub fn all() -> &'static [SaiObjectType] {
        &[
            Self::Port,
            Self::RouterInterface,
            Self::AclCounter,
            Self::Policer,
            Self::Queue,
            Self::BufferPool,
            Self::IngressPriorityGroup,
            Self::Switch,
            Self::Tunnel,
            Self::Counter,
            Self::MacsecFlow,
            Self::MacsecSa,
            Self::Eni,
            Self::MeterBucketEntry,
        ]
    }

    /// Creates an object type from its raw value.
    pub fn from_raw(raw: u8) -> Option<Self> {
        Self::all().iter().copied().find(|t| *t as u8 == raw)
    }

    /// Returns the SAI name of this object type.
    pub fn sai_name(&self) -> &'static str {
        match self {
            Self::Port => "SAI_OBJECT_TYPE_PORT",
            Self::RouterInterface => "SAI_OBJECT_TYPE_ROUTER_INTERFACE",
            Self::AclCounter => "SAI_OBJECT_TYPE_ACL_COUNTER",
            Self::Policer => "SAI_OBJECT_TYPE_POLICER",
            Self::Queue => "SAI_OBJECT_TYPE_QUEUE",
            Self::BufferPool => "SAI_OBJECT_TYPE_BUFFER_POOL",
            Self::IngressPriorityGroup => "SAI_OBJECT_TYPE_INGRESS_PRIORITY_GROUP",
            Self::Switch => "SAI_OBJECT_TYPE_SWITCH",
            Self::Tunnel => "SAI_OBJECT_TYPE_TUNNEL",
            Self::Counter => "SAI_OBJECT_TYPE_COUNTER",
            Self::MacsecFlow => "SAI_OBJECT_TYPE_MACSEC_FLOW",
            Self::MacsecSa => "SAI_OBJECT_TYPE_MACSEC_SA",
            Self::Eni => "SAI_OBJECT_TYPE_ENI",
            Self::MeterBucketEntry => "SAI_OBJECT_TYPE_METER_BUCKET_ENTRY",
        }
    }
}

impl fmt::Display for SaiObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sai_name())
    }
}

/// Decodes the object type carried in bits 48..56 of a virtual id.
pub fn object_type_of_vid(vid: RawSaiObjectId) -> Option<SaiObjectType> {
    let raw = (vid >> VID_OBJECT_TYPE_SHIFT) & VID_OBJECT_TYPE_MASK;
    SaiObjectType::from_raw(raw as u8)
}

/// Builds a virtual id for `object_type` with the given per-type index.
///
/// The index occupies the low 48 bits; higher bits are discarded.
pub fn make_vid(object_type: SaiObjectType, index: u64) -> RawSaiObjectId {
    ((object_type as u64) << VID_OBJECT_TYPE_SHIFT) | (index & ((1 << VID_OBJECT_TYPE_SHIFT) - 1))
}

/// Serializes an object id the way counter tables key their rows.
pub fn serialize_object_id(oid: RawSaiObjectId) -> String {
    format!("oid:0x{:x}", oid)
}

/// Key of one row in a bulk stats call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKey {
    /// A regular object addressed by its real id.
    Oid(RawSaiObjectId),
    /// One meter bucket of an ENI.
    MeterBucket {
        switch_id: RawSaiObjectId,
        eni_id: RawSaiObjectId,
        meter_class: u32,
    },
}

/// Whether reading a counter also clears it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum StatsMode {
    #[default]
    #[serde(rename = "STATS_MODE_READ")]
    Read,
    #[serde(rename = "STATS_MODE_READ_AND_CLEAR")]
    ReadAndClear,
}

impl StatsMode {
    /// Configuration string for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "STATS_MODE_READ",
            Self::ReadAndClear => "STATS_MODE_READ_AND_CLEAR",
        }
    }

    /// Parses a configuration string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "STATS_MODE_READ" => Some(Self::Read),
            "STATS_MODE_READ_AND_CLEAR" => Some(Self::ReadAndClear),
            _ => None,
        }
    }

    /// Bit of this mode inside a [`StatCapability::modes`] mask.
    pub const fn mask_bit(&self) -> u32 {
        match self {
            Self::Read => 1,
            Self::ReadAndClear => 2,
        }
    }
}

impl fmt::Display for StatsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a stats capability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCapability {
    /// Raw stat enum value.
    pub stat_enum: i32,
    /// Bitmask of supported [`StatsMode`]s.
    pub modes: u32,
}

impl StatCapability {
    /// Returns true if the stat can be read in `mode`.
    pub fn supports(&self, mode: StatsMode) -> bool {
        self.modes & mode.mask_bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vid_object_type_roundtrip() {
        let vid = make_vid(SaiObjectType::Queue, 0x1234);
        assert_eq!(object_type_of_vid(vid), Some(SaiObjectType::Queue));
        assert_eq!(vid & 0xffff, 0x1234);
    }

    #[test]
    fn test_vid_unknown_object_type() {
        assert_eq!(object_type_of_vid(0x00ff_0000_0000_0001), None);
        assert_eq!(object_type_of_vid(SAI_NULL_OBJECT_ID), None);
    }

    #[test]
    fn test_serialize_object_id() {
        assert_eq!(serialize_object_id(0x1000000000001), "oid:0x1000000000001");
    }

    #[test]
    fn test_stats_mode_parse() {
        assert_eq!(StatsMode::parse("STATS_MODE_READ"), Some(StatsMode::Read));
        assert_eq!(
            StatsMode::parse("STATS_MODE_READ_AND_CLEAR"),
            Some(StatsMode::ReadAndClear)
        );
        assert_eq!(StatsMode::parse("READ"), None);
    }

    #[test]
    fn test_stats_mode_serde_names() {
        let mode: StatsMode = serde_json::from_str("\"STATS_MODE_READ_AND_CLEAR\"").unwrap();
        assert_eq!(mode, StatsMode::ReadAndClear);
        assert_eq!(
            serde_json::to_string(&StatsMode::Read).unwrap(),
            "\"STATS_MODE_READ\""
        );
    }

    #[test]
    fn test_capability_modes() {
        let cap = StatCapability {
            stat_enum: 3,
            modes: StatsMode::Read.mask_bit(),
        };
        assert!(cap.supports(StatsMode::Read));
        assert!(!cap.supports(StatsMode::ReadAndClear));
    }
}
