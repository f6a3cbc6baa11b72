//! Bulk collection partitions.
//!
//! A [`BulkBatch`] holds every object polled with one counter-id set. Its
//! parallel arrays (vids, driver keys, per-row statuses, row-major counter
//! values) are handed to the driver chunk by chunk.

use log::{debug, warn};
use sonic_sai::{
    ObjectKey, RawSaiObjectId, SaiId, SaiIdKind, SaiObjectType, SaiResult, SaiStatus, StatsMode,
};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::config::{PrefixChunkConfig, DEFAULT_PARTITION};
use crate::driver::StatsDriver;

/// One partition produced by splitting a counter set by prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionSpec<K: SaiIdKind> {
    pub name: String,
    pub chunk_size: u32,
    pub counter_ids: Vec<SaiId<K>>,
}

/// Splits a counter set into per-prefix partitions plus the default one.
///
/// Partitions come out in configuration order with the default partition
/// last; empty partitions are omitted. The result is a set partition of
/// `counter_ids`.
pub fn split_counter_ids<K: SaiIdKind>(
    counter_ids: &[SaiId<K>],
    prefixes: &PrefixChunkConfig,
    default_chunk_size: u32,
) -> Vec<PartitionSpec<K>> {
    let mut by_group: BTreeMap<usize, Vec<SaiId<K>>> = BTreeMap::new();
    let mut unmatched = Vec::new();

    for id in counter_ids {
        match prefixes.classify(id.name()) {
            Some((index, _)) => by_group.entry(index).or_default().push(*id),
            None => unmatched.push(*id),
        }
    }

    let mut specs: Vec<PartitionSpec<K>> = by_group
        .into_iter()
        .map(|(index, mut ids)| {
            ids.sort();
            let group = &prefixes.groups()[index];
            PartitionSpec {
                name: group.name.clone(),
                chunk_size: group.chunk_size,
                counter_ids: ids,
            }
        })
        .collect();

    if !unmatched.is_empty() {
        unmatched.sort();
        specs.push(PartitionSpec {
            name: DEFAULT_PARTITION.to_string(),
            chunk_size: default_chunk_size,
            counter_ids: unmatched,
        });
    }

    specs
}

/// Issues a single bulk call over `keys` and returns the per-row statuses.
///
/// Used to find out whether bulk collection works for a set of objects.
pub fn probe_bulk(
    driver: &dyn StatsDriver,
    object_type: SaiObjectType,
    keys: &[ObjectKey],
    ids: &[i32],
    mode: StatsMode,
) -> SaiResult<Vec<SaiStatus>> {
    let mut statuses = vec![SaiStatus::Success; keys.len()];
    let mut counters = vec![0u64; keys.len() * ids.len()];
    driver.bulk_get_stats(object_type, keys, ids, mode, &mut statuses, &mut counters)?;
    Ok(statuses)
}

/// Objects polled together with one counter-id set.
#[derive(Debug)]
pub struct BulkBatch<K: SaiIdKind> {
    name: String,
    chunk_size: u32,
    counter_ids: Vec<SaiId<K>>,
    raw_ids: Vec<i32>,
    object_vids: Vec<RawSaiObjectId>,
    object_keys: Vec<ObjectKey>,
    object_statuses: Vec<SaiStatus>,
    counters: Vec<u64>,
}

impl<K: SaiIdKind> BulkBatch<K> {
    /// Creates an empty batch. `counter_ids` must be sorted.
    pub fn new(name: impl Into<String>, chunk_size: u32, counter_ids: Vec<SaiId<K>>) -> Self {
        let raw_ids = counter_ids.iter().map(|id| id.as_raw()).collect();
        Self {
            name: name.into(),
            chunk_size,
            counter_ids,
            raw_ids,
            object_vids: Vec::new(),
            object_keys: Vec::new(),
            object_statuses: Vec::new(),
            counters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    pub fn set_chunk_size(&mut self, chunk_size: u32) {
        self.chunk_size = chunk_size;
    }

    pub fn counter_ids(&self) -> &[SaiId<K>] {
        &self.counter_ids
    }

    /// Number of rows (a row is one driver key).
    pub fn len(&self) -> usize {
        self.object_vids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_vids.is_empty()
    }

    /// Row vids in insertion order (a vid repeats if it owns several rows).
    pub fn vids(&self) -> &[RawSaiObjectId] {
        &self.object_vids
    }

    /// Rows as `(vid, key)` pairs.
    pub fn rows(&self) -> impl Iterator<Item = (RawSaiObjectId, ObjectKey)> + '_ {
        self.object_vids
            .iter()
            .copied()
            .zip(self.object_keys.iter().copied())
    }

    /// Appends one row.
    pub fn push(&mut self, vid: RawSaiObjectId, key: ObjectKey) {
        self.object_vids.push(vid);
        self.object_keys.push(key);
    }

    /// Removes every row of `vid`; returns how many were removed.
    pub fn remove(&mut self, vid: RawSaiObjectId) -> usize {
        let before = self.object_vids.len();
        let mut index = 0;
        while index < self.object_vids.len() {
            if self.object_vids[index] == vid {
                self.object_vids.remove(index);
                self.object_keys.remove(index);
            } else {
                index += 1;
            }
        }
        before - self.object_vids.len()
    }

    /// Row ranges of one collection pass, one per bulk call.
    ///
    /// A chunk size of 0 means one call for all rows.
    pub fn chunk_ranges(&self) -> Vec<Range<usize>> {
        let len = self.len();
        if len == 0 {
            return Vec::new();
        }
        let step = match self.chunk_size as usize {
            0 => len,
            n => n.min(len),
        };
        (0..len)
            .step_by(step)
            .map(|start| start..(start + step).min(len))
            .collect()
    }

    /// Polls every row, one bulk call per chunk.
    ///
    /// `on_row` receives each row whose status was success together with its
    /// counter values, in `counter_ids` order. A failed call skips its chunk.
    /// Returns the number of bulk calls issued.
    pub fn poll<F>(
        &mut self,
        driver: &dyn StatsDriver,
        object_type: SaiObjectType,
        mode: StatsMode,
        mut on_row: F,
    ) -> usize
    where
        F: FnMut(RawSaiObjectId, ObjectKey, &[SaiId<K>], &[u64]),
    {
        let width = self.raw_ids.len();
        let ranges = self.chunk_ranges();

        for range in &ranges {
            let rows = range.len();
            self.object_statuses.clear();
            self.object_statuses.resize(rows, SaiStatus::Failure);
            self.counters.clear();
            self.counters.resize(rows * width, 0);

            if let Err(e) = driver.bulk_get_stats(
                object_type,
                &self.object_keys[range.clone()],
                &self.raw_ids,
                mode,
                &mut self.object_statuses,
                &mut self.counters,
            ) {
                warn!(
                    "{}: bulk get of {} rows [{}..{}) in partition {} failed: {}",
                    object_type, rows, range.start, range.end, self.name, e
                );
                continue;
            }

            for (offset, status) in self.object_statuses.iter().enumerate() {
                let row = range.start + offset;
                if !status.is_success() {
                    debug!(
                        "{}: skipping {} in partition {}: {}",
                        object_type,
                        sonic_sai::serialize_object_id(self.object_vids[row]),
                        self.name,
                        status
                    );
                    continue;
                }
                let values = &self.counters[offset * width..(offset + 1) * width];
                on_row(self.object_vids[row], self.object_keys[row], &self.counter_ids, values);
            }
        }

        ranges.len()
    }
}
