use log::{debug, error, info, warn};
use sonic_sai::{
    parse_id_list, serialize_object_id, ObjectKey, RawSaiObjectId, SaiId, SaiIdKind,
    SaiObjectType, StatsMode,
};
use std::collections::{BTreeMap, BTreeSet};

use super::{
    counter_fields, raw_ids, ContextBase, CounterGroupContext, PartitionInfo, SupportedCounters,
};
use crate::bulk::{probe_bulk, split_counter_ids, BulkBatch};
use crate::config::{PrefixChunkConfig, DEFAULT_PARTITION};
use crate::driver::{CounterSink, StatsDriver};
use crate::error::{FlexCounterError, Result};

/// Per-object registration: the rid plus the ids read on each pass.
struct ObjectCounters<K: SaiIdKind> {
    rid: RawSaiObjectId,
    counter_ids: Vec<SaiId<K>>,
    stats_mode: Option<StatsMode>,
}

/// Bulk partitions are keyed by the per-object mode override and the sorted
/// counter set.
type PartitionKey<K> = (Option<StatsMode>, Vec<SaiId<K>>);

/// Merged view of every partition: one counter set over one row list.
struct Unsplit<K: SaiIdKind> {
    stats_mode: Option<StatsMode>,
    counter_ids: Vec<SaiId<K>>,
    rows: Vec<(RawSaiObjectId, ObjectKey)>,
}

/// Stats context generic over the counter id kind.
///
/// Objects whose bulk trial succeeds are grouped into partitions keyed by
/// their counter set; the rest are read one by one.
pub struct CounterContext<K: SaiIdKind> {
    base: ContextBase,
    supported: SupportedCounters<K>,
    objects: BTreeMap<RawSaiObjectId, ObjectCounters<K>>,
    partitions: BTreeMap<PartitionKey<K>, BulkBatch<K>>,
}

impl<K: SaiIdKind> CounterContext<K> {
    pub fn new(base: ContextBase) -> Self {
        Self {
            base,
            supported: SupportedCounters::new(),
            objects: BTreeMap::new(),
            partitions: BTreeMap::new(),
        }
    }

    /// Resolves the requested names to the supported subset.
    fn supported_ids(
        &mut self,
        rid: RawSaiObjectId,
        counter_ids: &[String],
        mode: StatsMode,
    ) -> Vec<SaiId<K>> {
        let requested = parse_id_list::<K>(counter_ids);
        let driver = self.base.driver();
        let object_type = self.base.object_type();
        self.supported
            .update(&self.base, rid, &requested, mode, |id| {
                probe_counter(driver, object_type, rid, id, mode)
            });
        self.supported.filter(&requested)
    }

    /// Drops `vid` from every collection structure; returns whether it was tracked.
    fn forget(&mut self, vid: RawSaiObjectId) -> bool {
        if self.objects.remove(&vid).is_some() {
            return true;
        }
        let mut removed = 0;
        for batch in self.partitions.values_mut() {
            removed += batch.remove(vid);
        }
        self.partitions.retain(|(_, ids), batch| {
            if batch.is_empty() {
                debug!(
                    "{}: {} dropping empty partition {} ({} counters)",
                    self.base.instance_id(),
                    self.base.name(),
                    batch.name(),
                    ids.len()
                );
            }
            !batch.is_empty()
        });
        removed > 0
    }

    /// Single-object path: one bulk trial decides where the object lands.
    fn add_single(
        &mut self,
        vid: RawSaiObjectId,
        rid: RawSaiObjectId,
        counter_ids: &[SaiId<K>],
        stats_mode: Option<StatsMode>,
    ) {
        let mode = self.base.effective_mode(stats_mode);
        let trial = probe_bulk(
            self.base.driver(),
            self.base.object_type(),
            &[ObjectKey::Oid(rid)],
            &raw_ids(counter_ids),
            mode,
        );

        match trial {
            Ok(statuses) if statuses.iter().all(|s| s.is_success()) => {
                self.insert_bulk(vid, rid, counter_ids, stats_mode);
            }
            outcome => {
                debug!(
                    "{}: {} bulk trial for {} unsuccessful ({:?}), polling per object",
                    self.base.instance_id(),
                    self.base.name(),
                    serialize_object_id(vid),
                    outcome.err()
                );
                self.objects.insert(
                    vid,
                    ObjectCounters {
                        rid,
                        counter_ids: counter_ids.to_vec(),
                        stats_mode,
                    },
                );
            }
        }
    }

    /// Places `vid` into the partitions its counter set splits into.
    fn insert_bulk(
        &mut self,
        vid: RawSaiObjectId,
        rid: RawSaiObjectId,
        counter_ids: &[SaiId<K>],
        stats_mode: Option<StatsMode>,
    ) {
        let specs = split_counter_ids(
            counter_ids,
            self.base.prefixes(),
            self.base.default_chunk_size(),
        );
        for spec in specs {
            let key = (stats_mode, spec.counter_ids.clone());
            let batch = self.partitions.entry(key).or_insert_with(|| {
                debug!(
                    "{}: {} new partition {} with {} counters",
                    self.base.instance_id(),
                    self.base.name(),
                    spec.name,
                    spec.counter_ids.len()
                );
                BulkBatch::new(spec.name.as_str(), spec.chunk_size, spec.counter_ids)
            });
            batch.push(vid, ObjectKey::Oid(rid));
        }
    }

    /// Collapses the current partitions into unsplit counter sets.
    ///
    /// Without prefix config every partition already holds its full set.
    /// Otherwise all partitions must hold the same objects.
    fn unsplit(&mut self) -> Result<Vec<Unsplit<K>>> {
        let partitions = std::mem::take(&mut self.partitions);

        if self.base.prefixes().is_empty() {
            return Ok(partitions
                .into_iter()
                .map(|((stats_mode, counter_ids), batch)| Unsplit {
                    stats_mode,
                    counter_ids,
                    rows: batch.rows().collect(),
                })
                .collect());
        }

        let consistent = {
            let mut members = partitions.iter().map(|((mode, _), batch)| {
                (*mode, batch.vids().iter().copied().collect::<BTreeSet<_>>())
            });
            match members.next() {
                Some(first) => members.all(|other| other == first),
                None => true,
            }
        };
        if !consistent {
            self.partitions = partitions;
            return Err(FlexCounterError::InconsistentMerge {
                group: self.base.name().to_string(),
            });
        }

        let Some(((stats_mode, _), first)) = partitions.iter().next() else {
            return Ok(Vec::new());
        };
        let counter_ids: BTreeSet<SaiId<K>> = partitions
            .keys()
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect();
        Ok(vec![Unsplit {
            stats_mode: *stats_mode,
            counter_ids: counter_ids.into_iter().collect(),
            rows: first.rows().collect(),
        }])
    }

    /// Re-inserts unsplit sets under the current prefix config.
    fn resplit(&mut self, sets: Vec<Unsplit<K>>) {
        for set in sets {
            let specs = split_counter_ids(
                &set.counter_ids,
                self.base.prefixes(),
                self.base.default_chunk_size(),
            );
            for spec in specs {
                let batch = self
                    .partitions
                    .entry((set.stats_mode, spec.counter_ids.clone()))
                    .or_insert_with(|| {
                        BulkBatch::new(spec.name.as_str(), spec.chunk_size, spec.counter_ids)
                    });
                for (vid, key) in &set.rows {
                    batch.push(*vid, *key);
                }
            }
        }
    }
}

/// Reads one id on `rid`, and clears it too in read-and-clear mode.
fn probe_counter<K: SaiIdKind>(
    driver: &dyn StatsDriver,
    object_type: SaiObjectType,
    rid: RawSaiObjectId,
    id: SaiId<K>,
    mode: StatsMode,
) -> bool {
    let raw = [id.as_raw()];
    if driver.get_stats(object_type, rid, &raw).is_err() {
        return false;
    }
    mode != StatsMode::ReadAndClear || driver.clear_stats(object_type, rid, &raw).is_ok()
}

impl<K: SaiIdKind> CounterGroupContext for CounterContext<K> {
    fn base(&self) -> &ContextBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ContextBase {
        &mut self.base
    }

    fn add_object(
        &mut self,
        vid: RawSaiObjectId,
        rid: RawSaiObjectId,
        counter_ids: &[String],
        stats_mode: Option<StatsMode>,
    ) {
        let stats_mode = stats_mode.filter(|_| self.base.descriptor().supports_stats_mode);
        let mode = self.base.effective_mode(stats_mode);
        let ids = self.supported_ids(rid, counter_ids, mode);
        if ids.is_empty() {
            info!(
                "{}: {} has no supported counters for {}, not tracking",
                self.base.instance_id(),
                self.base.name(),
                serialize_object_id(vid)
            );
            return;
        }

        self.forget(vid);
        self.add_single(vid, rid, &ids, stats_mode);
    }

    fn bulk_add_objects(
        &mut self,
        vids: &[RawSaiObjectId],
        rids: &[RawSaiObjectId],
        counter_ids: &[String],
        stats_mode: Option<StatsMode>,
    ) {
        if vids.len() != rids.len() {
            error!(
                "{}: {} bulk add with {} vids but {} rids",
                self.base.instance_id(),
                self.base.name(),
                vids.len(),
                rids.len()
            );
            return;
        }
        let Some(first_rid) = rids.first().copied() else {
            return;
        };

        let stats_mode = stats_mode.filter(|_| self.base.descriptor().supports_stats_mode);
        let mode = self.base.effective_mode(stats_mode);
        let ids = self.supported_ids(first_rid, counter_ids, mode);
        if ids.is_empty() {
            info!(
                "{}: {} has no supported counters for {} objects, not tracking",
                self.base.instance_id(),
                self.base.name(),
                vids.len()
            );
            return;
        }

        for vid in vids {
            self.forget(*vid);
        }

        let keys: Vec<ObjectKey> = rids.iter().map(|rid| ObjectKey::Oid(*rid)).collect();
        let specs = split_counter_ids(&ids, self.base.prefixes(), self.base.default_chunk_size());
        let mut fallback: BTreeSet<RawSaiObjectId> = BTreeSet::new();

        for spec in &specs {
            match probe_bulk(
                self.base.driver(),
                self.base.object_type(),
                &keys,
                &raw_ids(&spec.counter_ids),
                mode,
            ) {
                Ok(statuses) => {
                    for (vid, status) in vids.iter().zip(&statuses) {
                        if !status.is_success() {
                            fallback.insert(*vid);
                        }
                    }
                }
                Err(e) => {
                    debug!(
                        "{}: {} group bulk trial for partition {} failed: {}",
                        self.base.instance_id(),
                        self.base.name(),
                        spec.name,
                        e
                    );
                    fallback.extend(vids.iter().copied());
                    break;
                }
            }
        }

        for (vid, rid) in vids.iter().zip(rids) {
            if fallback.contains(vid) {
                self.add_single(*vid, *rid, &ids, stats_mode);
            } else {
                self.insert_bulk(*vid, *rid, &ids, stats_mode);
            }
        }
    }

    fn remove_object(&mut self, vid: RawSaiObjectId) {
        if !self.forget(vid) {
            info!(
                "{}: {} is not tracking {}, nothing to remove",
                self.base.instance_id(),
                self.base.name(),
                serialize_object_id(vid)
            );
        }
    }

    fn remove_all_objects(&mut self) {
        self.objects.clear();
        self.partitions.clear();
    }

    fn collect(&mut self, sink: &dyn CounterSink) {
        let driver = self.base.driver();
        let object_type = self.base.object_type();

        for (vid, object) in &self.objects {
            let raw = raw_ids(&object.counter_ids);
            let values = match driver.get_stats(object_type, object.rid, &raw) {
                Ok(values) if values.len() == raw.len() => values,
                Ok(values) => {
                    warn!(
                        "{}: {} read of {} returned {} values for {} counters",
                        self.base.instance_id(),
                        self.base.name(),
                        serialize_object_id(*vid),
                        values.len(),
                        raw.len()
                    );
                    continue;
                }
                Err(e) => {
                    warn!(
                        "{}: {} failed to read {}: {}",
                        self.base.instance_id(),
                        self.base.name(),
                        serialize_object_id(*vid),
                        e
                    );
                    continue;
                }
            };

            if self.base.effective_mode(object.stats_mode) == StatsMode::ReadAndClear {
                if let Err(e) = driver.clear_stats(object_type, object.rid, &raw) {
                    warn!(
                        "{}: {} failed to clear {}: {}",
                        self.base.instance_id(),
                        self.base.name(),
                        serialize_object_id(*vid),
                        e
                    );
                }
            }

            sink.write_row(
                &serialize_object_id(*vid),
                &counter_fields(&object.counter_ids, &values),
            );
        }

        for ((stats_mode, _), batch) in self.partitions.iter_mut() {
            let mode = self.base.effective_mode(*stats_mode);
            batch.poll(driver, object_type, mode, |vid, _, ids, values| {
                sink.write_row(&serialize_object_id(vid), &counter_fields(ids, values));
            });
        }
    }

    fn has_object(&self) -> bool {
        !self.objects.is_empty() || self.partitions.values().any(|b| !b.is_empty())
    }

    fn object_vids(&self) -> Vec<RawSaiObjectId> {
        let vids: BTreeSet<RawSaiObjectId> = self
            .objects
            .keys()
            .copied()
            .chain(self.partitions.values().flat_map(|b| b.vids().iter().copied()))
            .collect();
        vids.into_iter().collect()
    }

    fn per_object_vids(&self) -> Vec<RawSaiObjectId> {
        self.objects.keys().copied().collect()
    }

    fn bulk_partitions(&self) -> Vec<PartitionInfo> {
        self.partitions
            .values()
            .map(|batch| PartitionInfo {
                name: batch.name().to_string(),
                chunk_size: batch.chunk_size(),
                counter_ids: batch
                    .counter_ids()
                    .iter()
                    .map(|id| id.name().to_string())
                    .collect(),
                vids: batch.vids().to_vec(),
            })
            .collect()
    }

    fn set_bulk_chunk_size(&mut self, chunk_size: u32) {
        self.base.default_chunk_size = chunk_size;
        for batch in self.partitions.values_mut() {
            if batch.name() == DEFAULT_PARTITION {
                batch.set_chunk_size(chunk_size);
            }
        }
    }

    fn set_bulk_chunk_size_per_prefix(&mut self, prefixes: PrefixChunkConfig) -> Result<()> {
        if self.base.prefixes().same_prefixes(&prefixes) {
            for batch in self.partitions.values_mut() {
                if let Some(size) = prefixes.chunk_size_of(batch.name()) {
                    batch.set_chunk_size(size);
                }
            }
            self.base.prefixes = prefixes;
            return Ok(());
        }

        let sets = self.unsplit()?;
        self.base.prefixes = prefixes;
        self.resplit(sets);
        debug!(
            "{}: {} repartitioned into {} partitions",
            self.base.instance_id(),
            self.base.name(),
            self.partitions.len()
        );
        Ok(())
    }
}
