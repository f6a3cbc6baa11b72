//! SONiC flex counter engine.
//!
//! Periodically reads switch counters and attributes for registered objects
//! (ports, queues, priority groups, tunnels, ACL counters, ENIs, ...) and
//! writes them to a counters table.
//!
//! # Architecture
//!
//! ```text
//! control path ──> FlexCounterManager ──> FlexCounter (one per instance)
//!                                            │  scheduler thread
//!                                            ├──> CounterGroupContext (per group)
//!                                            │       ├── per-object reads
//!                                            │       └── BulkBatch partitions
//!                                            ├──> CounterSink
//!                                            └──> PluginRunner
//! ```
//!
//! - [`registry`]: which group a configuration field feeds
//! - [`context`]: per-group object tracking and collection
//! - [`bulk`]: bulk partitions and chunked bulk calls
//! - [`flex_counter`]: the polling instance and its scheduler
//! - [`manager`]: instance ownership keyed by name
//! - [`driver`]: collaborator traits (stats driver, sink, plugin runner)

pub mod bulk;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod flex_counter;
pub mod manager;
pub mod registry;

pub use config::{FlexCounterConfig, PrefixChunkConfig, DEFAULT_PARTITION};
pub use context::{CounterGroupContext, PartitionInfo};
pub use driver::{CounterSink, PluginRunner, StatsDriver};
pub use error::{FlexCounterError, Result};
pub use flex_counter::FlexCounter;
pub use manager::FlexCounterManager;
pub use registry::{CounterKindRegistry, GroupDescriptor};
