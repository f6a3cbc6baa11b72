//! Counter group contexts.
//!
//! A context owns every object one counter group polls within one flex
//! counter instance. Three implementations share the [`CounterGroupContext`]
//! contract:
//!
//! - [`CounterContext`]: stats with bulk or per-object collection
//! - [`AttrContext`]: attribute values read per object
//! - [`MeterBucketContext`]: per-ENI meter buckets, bulk only, sparse rows

mod attr;
mod counter;
mod meter;

pub use attr::AttrContext;
pub use counter::CounterContext;
pub use meter::MeterBucketContext;

use log::{debug, info};
use sonic_sai::{
    serialize_object_id, RawSaiObjectId, SaiId, SaiIdKind, SaiObjectType, StatsMode,
};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::PrefixChunkConfig;
use crate::driver::{query_capabilities, CounterSink, PluginRunner, StatsDriver};
use crate::error::Result;
use crate::registry::GroupDescriptor;

/// Snapshot of one bulk partition, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionInfo {
    pub name: String,
    pub chunk_size: u32,
    pub counter_ids: Vec<String>,
    pub vids: Vec<RawSaiObjectId>,
}

/// State every context carries regardless of its key shape.
pub struct ContextBase {
    descriptor: &'static GroupDescriptor,
    instance_id: String,
    driver: Arc<dyn StatsDriver>,
    stats_mode: StatsMode,
    plugins: BTreeSet<String>,
    default_chunk_size: u32,
    prefixes: PrefixChunkConfig,
}

impl ContextBase {
    pub fn new(
        descriptor: &'static GroupDescriptor,
        instance_id: impl Into<String>,
        driver: Arc<dyn StatsDriver>,
    ) -> Self {
        Self {
            descriptor,
            instance_id: instance_id.into(),
            driver,
            stats_mode: StatsMode::Read,
            plugins: BTreeSet::new(),
            default_chunk_size: 0,
            prefixes: PrefixChunkConfig::default(),
        }
    }

    pub fn descriptor(&self) -> &'static GroupDescriptor {
        self.descriptor
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn object_type(&self) -> SaiObjectType {
        self.descriptor.object_type
    }

    pub fn driver(&self) -> &dyn StatsDriver {
        &*self.driver
    }

    pub fn stats_mode(&self) -> StatsMode {
        self.stats_mode
    }

    pub fn default_chunk_size(&self) -> u32 {
        self.default_chunk_size
    }

    pub fn prefixes(&self) -> &PrefixChunkConfig {
        &self.prefixes
    }

    /// Mode for an object, honoring a per-object override when the group
    /// supports one.
    pub fn effective_mode(&self, per_object: Option<StatsMode>) -> StatsMode {
        match per_object {
            Some(mode) if self.descriptor.supports_stats_mode => mode,
            _ => self.stats_mode,
        }
    }
}

/// Per-group registry of tracked objects and their collection strategy.
///
/// All methods run under the owning instance's lock.
pub trait CounterGroupContext: Send {
    fn base(&self) -> &ContextBase;

    fn base_mut(&mut self) -> &mut ContextBase;

    /// Starts tracking `vid`; a prior registration of `vid` is replaced.
    fn add_object(
        &mut self,
        vid: RawSaiObjectId,
        rid: RawSaiObjectId,
        counter_ids: &[String],
        stats_mode: Option<StatsMode>,
    );

    /// Batched [`add_object`](Self::add_object) sharing one counter list.
    fn bulk_add_objects(
        &mut self,
        vids: &[RawSaiObjectId],
        rids: &[RawSaiObjectId],
        counter_ids: &[String],
        stats_mode: Option<StatsMode>,
    ) {
        for (vid, rid) in vids.iter().zip(rids) {
            self.add_object(*vid, *rid, counter_ids, stats_mode);
        }
    }

    /// Stops tracking `vid`. Unknown vids are a no-op.
    fn remove_object(&mut self, vid: RawSaiObjectId);

    fn remove_all_objects(&mut self);

    /// Reads every tracked object and writes one row per object.
    fn collect(&mut self, sink: &dyn CounterSink);

    fn has_object(&self) -> bool;

    /// Distinct tracked vids in ascending order.
    fn object_vids(&self) -> Vec<RawSaiObjectId>;

    /// Vids collected one object at a time.
    fn per_object_vids(&self) -> Vec<RawSaiObjectId> {
        Vec::new()
    }

    fn bulk_partitions(&self) -> Vec<PartitionInfo> {
        Vec::new()
    }

    fn set_bulk_chunk_size(&mut self, chunk_size: u32) {
        self.base_mut().default_chunk_size = chunk_size;
    }

    fn set_bulk_chunk_size_per_prefix(&mut self, prefixes: PrefixChunkConfig) -> Result<()> {
        self.base_mut().prefixes = prefixes;
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.base().name()
    }

    fn object_type(&self) -> SaiObjectType {
        self.base().object_type()
    }

    fn set_stats_mode(&mut self, mode: StatsMode) {
        self.base_mut().stats_mode = mode;
    }

    fn add_plugins(&mut self, plugins: &[String]) {
        let base = self.base_mut();
        for plugin in plugins {
            debug!("{}: {} plugin {}", base.instance_id, base.name(), plugin);
            base.plugins.insert(plugin.clone());
        }
    }

    fn remove_plugins(&mut self) {
        self.base_mut().plugins.clear();
    }

    fn has_plugins(&self) -> bool {
        !self.base().plugins.is_empty()
    }

    /// Runs each plugin over the tracked vids; skipped when nothing is tracked.
    fn run_plugins(&self, runner: &dyn PluginRunner, args: &[String]) {
        let base = self.base();
        if base.plugins.is_empty() {
            return;
        }
        let ids: Vec<String> = self
            .object_vids()
            .into_iter()
            .map(serialize_object_id)
            .collect();
        if ids.is_empty() {
            return;
        }
        for plugin in &base.plugins {
            runner.run(plugin, &ids, args);
        }
    }
}

/// Supported-counter cache of one context.
///
/// Capability is learnt from the driver's capability query when the group
/// allows it, otherwise by reading each not-yet-checked id once. A failed
/// query is not repeated until the next re-validation.
pub(crate) struct SupportedCounters<K: SaiIdKind> {
    supported: BTreeSet<SaiId<K>>,
    checked: BTreeSet<SaiId<K>>,
    from_capability: bool,
    capability_failed: bool,
}

impl<K: SaiIdKind> SupportedCounters<K> {
    pub(crate) fn new() -> Self {
        Self {
            supported: BTreeSet::new(),
            checked: BTreeSet::new(),
            from_capability: false,
            capability_failed: false,
        }
    }

    /// Refreshes the cache for a registration of `rid`.
    ///
    /// `probe` answers whether one id can be read on `rid`.
    pub(crate) fn update<F>(
        &mut self,
        base: &ContextBase,
        rid: RawSaiObjectId,
        requested: &[SaiId<K>],
        mode: StatsMode,
        mut probe: F,
    ) where
        F: FnMut(SaiId<K>) -> bool,
    {
        let descriptor = base.descriptor();

        if descriptor.always_check_supported_counters {
            self.checked.clear();
            self.from_capability = false;
            self.capability_failed = false;
            if !descriptor.dont_clear_supported_counters {
                self.supported.clear();
            }
        }

        if self.from_capability {
            return;
        }

        if descriptor.use_capability_query && !self.capability_failed {
            let switch_id = base.driver().switch_id(rid);
            match query_capabilities(base.driver(), switch_id, K::object_type()) {
                Ok(caps) => {
                    self.supported.extend(
                        caps.iter()
                            .filter(|cap| cap.supports(mode))
                            .filter_map(|cap| SaiId::<K>::from_raw(cap.stat_enum)),
                    );
                    self.from_capability = true;
                    debug!(
                        "{}: {} capability query reported {} supported {}",
                        base.instance_id(),
                        base.name(),
                        self.supported.len(),
                        K::kind_name()
                    );
                    return;
                }
                Err(e) => {
                    self.capability_failed = true;
                    info!(
                        "{}: {} capability query failed ({}), probing counters",
                        base.instance_id(),
                        base.name(),
                        e
                    );
                }
            }
        }

        for id in requested {
            if self.checked.insert(*id) && probe(*id) {
                self.supported.insert(*id);
            }
        }
    }

    /// Requested ids that are supported, sorted and deduplicated.
    pub(crate) fn filter(&self, requested: &[SaiId<K>]) -> Vec<SaiId<K>> {
        let ids: BTreeSet<_> = requested
            .iter()
            .filter(|id| self.supported.contains(id))
            .copied()
            .collect();
        ids.into_iter().collect()
    }
}

/// Builds `(name, value)` fields of one row.
pub(crate) fn counter_fields<K: SaiIdKind>(
    ids: &[SaiId<K>],
    values: &[u64],
) -> Vec<(String, String)> {
    ids.iter()
        .zip(values)
        .map(|(id, value)| (id.name().to_string(), value.to_string()))
        .collect()
}

pub(crate) fn raw_ids<K: SaiIdKind>(ids: &[SaiId<K>]) -> Vec<i32> {
    ids.iter().map(|id| id.as_raw()).collect()
}

#[cfg(test)]
pub(crate) mod test_support;
