//! Type-safe stat and attribute identifiers.
//!
//! Every SAI stat or attribute enum (`sai_port_stat_t`, `sai_queue_attr_t`,
//! ...) is described by a marker type implementing [`SaiIdKind`], which
//! carries the object type the ids apply to and a `(name, value)` table.
//! [`SaiId<K>`] wraps one raw enum value, so a queue stat can never be
//! passed where a port stat is expected, and a single generic pair of
//! functions converts between names and ids for every kind.

use log::error;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::types::SaiObjectType;

/// Marker trait for one SAI stat or attribute enum.
pub trait SaiIdKind: Send + Sync + 'static {
    /// Name of the SAI enum, for diagnostics.
    fn kind_name() -> &'static str;

    /// Object type whose stats or attributes this enum enumerates.
    fn object_type() -> SaiObjectType;

    /// `(name, value)` table of every known id.
    fn table() -> &'static [(&'static str, i32)];
}

/// A stat or attribute id of kind `K`.
///
/// Ordering follows the raw enum value, so sorted id sets are stable keys.
pub struct SaiId<K: SaiIdKind> {
    raw: i32,
    _marker: PhantomData<K>,
}

impl<K: SaiIdKind> SaiId<K> {
    /// Creates an id from a raw enum value.
    ///
    /// Returns `None` if the value is not in the kind's table.
    pub fn from_raw(raw: i32) -> Option<Self> {
        K::table()
            .iter()
            .any(|(_, v)| *v == raw)
            .then_some(Self {
                raw,
                _marker: PhantomData,
            })
    }

    /// Resolves an id from its SAI name.
    pub fn parse(name: &str) -> Option<Self> {
        K::table()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, raw)| Self {
                raw: *raw,
                _marker: PhantomData,
            })
    }

    /// Returns the raw enum value.
    pub const fn as_raw(&self) -> i32 {
        self.raw
    }

    /// Returns the SAI name of this id.
    pub fn name(&self) -> &'static str {
        K::table()
            .iter()
            .find(|(_, v)| *v == self.raw)
            .map(|(n, _)| *n)
            .unwrap_or("UNKNOWN")
    }
}

/// Parses a comma-separated list of id names.
///
/// Unknown names are logged and dropped; duplicates are kept as given.
pub fn parse_id_list<K: SaiIdKind>(names: &[String]) -> Vec<SaiId<K>> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .filter_map(|n| {
            let id = SaiId::<K>::parse(n);
            if id.is_none() {
                error!("Unknown {} name: {}", K::kind_name(), n);
            }
            id
        })
        .collect()
}

/// Splits a comma-separated field value into id names.
pub fn split_id_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl<K: SaiIdKind> Clone for SaiId<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: SaiIdKind> Copy for SaiId<K> {}

impl<K: SaiIdKind> PartialEq for SaiId<K> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<K: SaiIdKind> Eq for SaiId<K> {}

impl<K: SaiIdKind> PartialOrd for SaiId<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: SaiIdKind> Ord for SaiId<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<K: SaiIdKind> Hash for SaiId<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<K: SaiIdKind> fmt::Debug for SaiId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.raw)
    }
}

impl<K: SaiIdKind> fmt::Display for SaiId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Defines a marker type for one SAI enum and an alias for its ids.
#[macro_export]
macro_rules! define_id_kind {
    (
        $name:ident,
        $kind_name:literal,
        $object_type:expr,
        $id_alias:ident,
        [$(($n:literal, $v:expr)),* $(,)?]
    ) => {
        #[doc = concat!("Marker type for `", $kind_name, "`.")]
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $crate::ids::SaiIdKind for $name {
            fn kind_name() -> &'static str {
                $kind_name
            }

            fn object_type() -> $crate::types::SaiObjectType {
                $object_type
            }

            fn table() -> &'static [(&'static str, i32)] {
                &[$(($n, $v)),*]
            }
        }

        #[doc = concat!("Id of a `", $kind_name, "` value.")]
        pub type $id_alias = $crate::ids::SaiId<$name>;
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{PortStatId, QueueStat, QueueStatId};

    #[test]
    fn test_parse_and_name() {
        let id = PortStatId::parse("SAI_PORT_STAT_IF_IN_OCTETS").unwrap();
        assert_eq!(id.as_raw(), 0);
        assert_eq!(id.name(), "SAI_PORT_STAT_IF_IN_OCTETS");
        assert!(PortStatId::parse("SAI_QUEUE_STAT_PACKETS").is_none());
    }

    #[test]
    fn test_from_raw_checks_table() {
        assert!(QueueStatId::from_raw(0).is_some());
        assert!(QueueStatId::from_raw(-1).is_none());
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        let mut ids = parse_id_list::<QueueStat>(&[
            "SAI_QUEUE_STAT_BYTES".to_string(),
            "SAI_QUEUE_STAT_PACKETS".to_string(),
        ]);
        ids.sort();
        assert_eq!(ids[0].name(), "SAI_QUEUE_STAT_PACKETS");
        assert_eq!(ids[1].name(), "SAI_QUEUE_STAT_BYTES");
    }

    #[test]
    fn test_parse_list_drops_unknown() {
        let names = split_id_names("SAI_QUEUE_STAT_PACKETS, BOGUS ,,SAI_QUEUE_STAT_BYTES");
        assert_eq!(names.len(), 3);
        let ids = parse_id_list::<QueueStat>(&names);
        assert_eq!(ids.len(), 2);
    }
}
