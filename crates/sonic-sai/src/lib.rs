//! SAI (Switch Abstraction Interface) vocabulary for stats collection.
//!
//! This crate provides the type-safe pieces the flex counter engine needs to
//! talk about switch statistics without depending on the SAI C headers.
//!
//! # Architecture
//!
//! - [`types`]: object types, VID encoding, bulk row keys and stats modes
//! - [`error`]: status codes and error handling
//! - [`ids`]: typed stat/attribute identifiers and name resolution
//! - [`stats`]: the stat and attribute enums polled by flex counters
//!
//! # Example
//!
//! ```
//! use sonic_sai::stats::{PortStat, PortStatId};
//! use sonic_sai::ids::parse_id_list;
//!
//! let id = PortStatId::parse("SAI_PORT_STAT_IF_IN_OCTETS").unwrap();
//! assert_eq!(id.name(), "SAI_PORT_STAT_IF_IN_OCTETS");
//!
//! let ids = parse_id_list::<PortStat>(&["SAI_PORT_STAT_IF_OUT_OCTETS".to_string()]);
//! assert_eq!(ids.len(), 1);
//! ```

pub mod error;
pub mod ids;
pub mod stats;
pub mod types;

pub use error::{SaiError, SaiResult, SaiStatus};
pub use ids::{parse_id_list, split_id_names, SaiId, SaiIdKind};
pub use types::{
    make_vid, object_type_of_vid, serialize_object_id, ObjectKey, RawSaiObjectId,
    SaiObjectType, StatCapability, StatsMode, SAI_NULL_OBJECT_ID,
};
