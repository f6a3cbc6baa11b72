//! In-memory driver and sink for context unit tests.

use parking_lot::Mutex;
use sonic_sai::{
    ObjectKey, RawSaiObjectId, SaiError, SaiObjectType, SaiResult, SaiStatus, StatCapability,
    StatsMode,
};
use std::collections::BTreeSet;

use crate::driver::{CounterSink, StatsDriver};
use crate::registry::{CounterKindRegistry, GroupDescriptor};

pub(crate) fn descriptor(name: &str) -> &'static GroupDescriptor {
    CounterKindRegistry::global().group(name).unwrap()
}

/// Counter value the mock reports for `(rid, id)`.
pub(crate) fn value_of(rid: RawSaiObjectId, id: i32) -> u64 {
    rid * 1000 + id as u64
}

#[derive(Default)]
struct State {
    unsupported: BTreeSet<i32>,
    no_bulk: bool,
    fail_clear: bool,
    bucket_count: u32,
    failing_meter_classes: BTreeSet<u32>,
}

/// Supports every stat except those marked unsupported; capability query is
/// not implemented.
#[derive(Default)]
pub(crate) struct MockDriver {
    state: Mutex<State>,
}

impl MockDriver {
    pub(crate) fn unsupport_stat(&self, id: i32) {
        self.state.lock().unsupported.insert(id);
    }

    pub(crate) fn disable_bulk(&self) {
        self.state.lock().no_bulk = true;
    }

    pub(crate) fn fail_clear(&self, fail: bool) {
        self.state.lock().fail_clear = fail;
    }

    pub(crate) fn set_bucket_count(&self, count: u32) {
        self.state.lock().bucket_count = count;
    }

    /// Bulk rows of `meter_class` report not supported.
    pub(crate) fn fail_meter_class(&self, meter_class: u32) {
        self.state.lock().failing_meter_classes.insert(meter_class);
    }
}

impl StatsDriver for MockDriver {
    fn get_stats(
        &self,
        _object_type: SaiObjectType,
        rid: RawSaiObjectId,
        ids: &[i32],
    ) -> SaiResult<Vec<u64>> {
        let state = self.state.lock();
        if ids.iter().any(|id| state.unsupported.contains(id)) {
            return Err(SaiError::not_supported("stat"));
        }
        Ok(ids.iter().map(|id| value_of(rid, *id)).collect())
    }

    fn clear_stats(
        &self,
        _object_type: SaiObjectType,
        _rid: RawSaiObjectId,
        _ids: &[i32],
    ) -> SaiResult<()> {
        if self.state.lock().fail_clear {
            return Err(SaiError::not_supported("clear"));
        }
        Ok(())
    }

    fn bulk_get_stats(
        &self,
        _object_type: SaiObjectType,
        keys: &[ObjectKey],
        ids: &[i32],
        _mode: StatsMode,
        statuses: &mut [SaiStatus],
        counters: &mut [u64],
    ) -> SaiResult<()> {
        let state = self.state.lock();
        if state.no_bulk {
            return Err(SaiError::not_supported("bulk"));
        }
        for (row, key) in keys.iter().enumerate() {
            let base = match key {
                ObjectKey::Oid(rid) => *rid,
                ObjectKey::MeterBucket { meter_class, .. } => {
                    if state.failing_meter_classes.contains(meter_class) {
                        statuses[row] = SaiStatus::NotSupported;
                        continue;
                    }
                    u64::from(*meter_class % 2)
                }
            };
            statuses[row] = SaiStatus::Success;
            for (col, id) in ids.iter().enumerate() {
                counters[row * ids.len() + col] = value_of(base, *id);
            }
        }
        Ok(())
    }

    fn query_stats_capability(
        &self,
        _switch_id: RawSaiObjectId,
        _object_type: SaiObjectType,
        _capacity: usize,
    ) -> SaiResult<Vec<StatCapability>> {
        Err(SaiError::not_supported("capability query"))
    }

    fn get_attributes(
        &self,
        object_type: SaiObjectType,
        rid: RawSaiObjectId,
        ids: &[i32],
    ) -> SaiResult<Vec<String>> {
        if object_type == SaiObjectType::Switch {
            return Ok(vec![self.state.lock().bucket_count.to_string()]);
        }
        Ok(ids.iter().map(|id| format!("{}:{}", rid, id)).collect())
    }

    fn switch_id(&self, _rid: RawSaiObjectId) -> RawSaiObjectId {
        0x21_0000_0000_0000
    }
}

/// Sink that keeps every written row in order.
#[derive(Default)]
pub(crate) struct VecSink {
    pub(crate) rows: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl VecSink {
    pub(crate) fn keys(&self) -> Vec<String> {
        self.rows.lock().iter().map(|(k, _)| k.clone()).collect()
    }
}

impl CounterSink for VecSink {
    fn write_row(&self, key: &str, fields: &[(String, String)]) {
        self.rows.lock().push((key.to_string(), fields.to_vec()));
    }

    fn flush(&self) {}
}
