use log::{debug, error, info};
use sonic_sai::stats::{MeterBucketEntryStat, SwitchAttrId};
use sonic_sai::{
    parse_id_list, serialize_object_id, ObjectKey, RawSaiObjectId, SaiId, SaiObjectType,
    SaiStatus, StatsMode,
};
use std::collections::BTreeMap;

use super::{
    counter_fields, raw_ids, ContextBase, CounterGroupContext, PartitionInfo, SupportedCounters,
};
use crate::bulk::{probe_bulk, BulkBatch};
use crate::config::DEFAULT_PARTITION;
use crate::driver::CounterSink;

const MAX_BUCKETS_ATTR: &str = "SAI_SWITCH_ATTR_DASH_CAPS_MAX_METER_BUCKET_COUNT_PER_ENI";

type BucketStatId = SaiId<MeterBucketEntryStat>;

/// Meter bucket context: every ENI contributes one bulk row per meter class.
///
/// Collection is bulk only; an ENI whose bulk trial fails is not tracked.
/// Rows whose counters are all zero are not written.
pub struct MeterBucketContext {
    base: ContextBase,
    supported: SupportedCounters<MeterBucketEntryStat>,
    bucket_counts: BTreeMap<RawSaiObjectId, u32>,
    enis: BTreeMap<RawSaiObjectId, RawSaiObjectId>,
    partitions: BTreeMap<Vec<BucketStatId>, BulkBatch<MeterBucketEntryStat>>,
}

impl MeterBucketContext {
    pub fn new(base: ContextBase) -> Self {
        Self {
            base,
            supported: SupportedCounters::new(),
            bucket_counts: BTreeMap::new(),
            enis: BTreeMap::new(),
            partitions: BTreeMap::new(),
        }
    }

    /// Meter classes per ENI on `switch_id`, read once per switch.
    fn bucket_count(&mut self, switch_id: RawSaiObjectId) -> Option<u32> {
        if let Some(count) = self.bucket_counts.get(&switch_id) {
            return Some(*count);
        }

        let attr = SwitchAttrId::parse(MAX_BUCKETS_ATTR)?;
        let count = match self
            .base
            .driver()
            .get_attributes(SaiObjectType::Switch, switch_id, &[attr.as_raw()])
        {
            Ok(values) => values.first().and_then(|v| v.parse::<u32>().ok()),
            Err(e) => {
                error!(
                    "{}: failed to read meter bucket count of switch {}: {}",
                    self.base.instance_id(),
                    serialize_object_id(switch_id),
                    e
                );
                return None;
            }
        }?;

        self.bucket_counts.insert(switch_id, count);
        Some(count)
    }

    fn forget(&mut self, vid: RawSaiObjectId) -> bool {
        if self.enis.remove(&vid).is_none() {
            return false;
        }
        for batch in self.partitions.values_mut() {
            batch.remove(vid);
        }
        self.partitions.retain(|_, batch| !batch.is_empty());
        true
    }
}

fn bucket_keys(switch_id: RawSaiObjectId, eni_id: RawSaiObjectId, count: u32) -> Vec<ObjectKey> {
    (0..count)
        .map(|meter_class| ObjectKey::MeterBucket {
            switch_id,
            eni_id,
            meter_class,
        })
        .collect()
}

impl CounterGroupContext for MeterBucketContext {
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
        _stats_mode: Option<StatsMode>,
    ) {
        let switch_id = self.base.driver().switch_id(rid);
        let Some(count) = self.bucket_count(switch_id).filter(|c| *c > 0) else {
            error!(
                "{}: {} has no meter buckets for {}, not tracking",
                self.base.instance_id(),
                self.base.name(),
                serialize_object_id(vid)
            );
            return;
        };

        let mode = self.base.stats_mode();
        let requested = parse_id_list::<MeterBucketEntryStat>(counter_ids);
        let driver = self.base.driver();
        let probe_key = [ObjectKey::MeterBucket {
            switch_id,
            eni_id: rid,
            meter_class: 0,
        }];
        self.supported.update(&self.base, rid, &requested, mode, |id| {
            probe_bulk(
                driver,
                SaiObjectType::MeterBucketEntry,
                &probe_key,
                &[id.as_raw()],
                mode,
            )
            .map_or(false, |statuses| statuses.iter().all(SaiStatus::is_success))
        });
        let ids = self.supported.filter(&requested);
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

        let keys = bucket_keys(switch_id, rid, count);
        match probe_bulk(
            self.base.driver(),
            SaiObjectType::MeterBucketEntry,
            &keys,
            &raw_ids(&ids),
            mode,
        ) {
            Ok(statuses) if statuses.iter().all(SaiStatus::is_success) => {}
            Ok(statuses) => {
                error!(
                    "{}: {} bulk read failed on {} of {} meter buckets of {}",
                    self.base.instance_id(),
                    self.base.name(),
                    statuses.iter().filter(|s| !s.is_success()).count(),
                    statuses.len(),
                    serialize_object_id(vid)
                );
                return;
            }
            Err(e) => {
                error!(
                    "{}: {} bulk read of meter buckets unsupported for {}: {}",
                    self.base.instance_id(),
                    self.base.name(),
                    serialize_object_id(vid),
                    e
                );
                return;
            }
        }

        let chunk_size = self.base.default_chunk_size();
        let batch = self
            .partitions
            .entry(ids.clone())
            .or_insert_with(|| BulkBatch::new(DEFAULT_PARTITION, chunk_size, ids));
        for key in keys {
            batch.push(vid, key);
        }
        self.enis.insert(vid, rid);
        debug!(
            "{}: {} tracking {} with {} buckets",
            self.base.instance_id(),
            self.base.name(),
            serialize_object_id(vid),
            count
        );
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
        self.enis.clear();
        self.partitions.clear();
    }

    fn collect(&mut self, sink: &dyn CounterSink) {
        let driver = self.base.driver();
        let mode = self.base.stats_mode();

        for batch in self.partitions.values_mut() {
            batch.poll(driver, SaiObjectType::MeterBucketEntry, mode, |vid, key, ids, values| {
                if values.iter().all(|v| *v == 0) {
                    return;
                }
                if let ObjectKey::MeterBucket { meter_class, .. } = key {
                    let row = format!("{}:{}", serialize_object_id(vid), meter_class);
                    sink.write_row(&row, &counter_fields(ids, values));
                }
            });
        }
    }

    fn has_object(&self) -> bool {
        !self.enis.is_empty()
    }

    fn object_vids(&self) -> Vec<RawSaiObjectId> {
        self.enis.keys().copied().collect()
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
            batch.set_chunk_size(chunk_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::{descriptor, MockDriver, VecSink};
    use crate::registry::METER_BUCKET_COUNTER;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const OUTBOUND: &str = "SAI_METER_BUCKET_ENTRY_STAT_OUTBOUND_BYTES";

    fn context(driver: Arc<MockDriver>) -> MeterBucketContext {
        let base = ContextBase::new(descriptor(METER_BUCKET_COUNTER), "DASH_METER", driver);
        MeterBucketContext::new(base)
    }

    #[test]
    fn test_only_non_zero_buckets_are_written() {
        let driver = Arc::new(MockDriver::default());
        driver.set_bucket_count(4);
        let mut ctx = context(driver);
        ctx.add_object(5, 50, &[OUTBOUND.to_string()], None);
        assert_eq!(ctx.bulk_partitions()[0].vids, vec![5, 5, 5, 5]);

        let sink = VecSink::default();
        ctx.collect(&sink);
        assert_eq!(sink.keys(), vec!["oid:0x5:1", "oid:0x5:3"]);
    }

    #[test]
    fn test_eni_not_tracked_without_bulk() {
        let driver = Arc::new(MockDriver::default());
        driver.set_bucket_count(2);
        driver.disable_bulk();
        let mut ctx = context(driver);
        ctx.add_object(5, 50, &[OUTBOUND.to_string()], None);
        assert!(!ctx.has_object());
    }

    #[test]
    fn test_eni_not_tracked_when_a_bucket_row_fails() {
        let driver = Arc::new(MockDriver::default());
        driver.set_bucket_count(3);
        driver.fail_meter_class(2);
        let mut ctx = context(driver);
        ctx.add_object(5, 50, &[OUTBOUND.to_string()], None);
        assert!(!ctx.has_object());
        assert!(ctx.bulk_partitions().is_empty());
    }

    #[test]
    fn test_counter_with_failed_row_status_is_unsupported() {
        let driver = Arc::new(MockDriver::default());
        driver.set_bucket_count(2);
        driver.fail_meter_class(0);
        let mut ctx = context(driver);
        ctx.add_object(5, 50, &[OUTBOUND.to_string()], None);
        assert!(!ctx.has_object());
        let requested = parse_id_list::<MeterBucketEntryStat>(&[OUTBOUND.to_string()]);
        assert!(ctx.supported.filter(&requested).is_empty());
    }

    #[test]
    fn test_eni_not_tracked_without_buckets() {
        let mut ctx = context(Arc::new(MockDriver::default()));
        ctx.add_object(5, 50, &[OUTBOUND.to_string()], None);
        assert!(!ctx.has_object());
    }

    #[test]
    fn test_remove_drops_every_bucket() {
        let driver = Arc::new(MockDriver::default());
        driver.set_bucket_count(3);
        let mut ctx = context(driver);
        ctx.add_object(5, 50, &[OUTBOUND.to_string()], None);
        ctx.add_object(6, 60, &[OUTBOUND.to_string()], None);
        ctx.remove_object(5);
        assert_eq!(ctx.object_vids(), vec![6]);
        assert_eq!(ctx.bulk_partitions()[0].vids, vec![6, 6, 6]);

        ctx.remove_object(6);
        assert!(ctx.bulk_partitions().is_empty());
    }
}
