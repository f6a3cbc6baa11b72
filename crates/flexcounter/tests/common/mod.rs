//! Shared mock collaborators for flex counter integration tests.
//!
//! `MockDriver` answers every stat with a value derived from the object and
//! stat id, and can be scripted to reject stats, bulk calls, rows, or whole
//! objects. Every call is recorded.

#![allow(dead_code)]

use sonic_flexcounter::{CounterSink, PluginRunner, StatsDriver};
use sonic_sai::{
    ObjectKey, RawSaiObjectId, SaiError, SaiObjectType, SaiResult, SaiStatus, StatCapability,
    StatsMode,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const SWITCH_ID: RawSaiObjectId = 0x21_0000_0000_0000;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(f, v)| (f.to_string(), v.to_string()))
        .collect()
}

/// Value the mock reports for stat `id` of `rid`.
pub fn value_of(rid: RawSaiObjectId, id: i32) -> u64 {
    rid * 1000 + id as u64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetStats { rid: RawSaiObjectId, ids: Vec<i32> },
    ClearStats { rid: RawSaiObjectId, ids: Vec<i32> },
    BulkGetStats { keys: Vec<ObjectKey>, ids: Vec<i32>, mode: StatsMode },
    QueryCapability { object_type: SaiObjectType, capacity: usize },
    GetAttributes { object_type: SaiObjectType, rid: RawSaiObjectId },
}

#[derive(Default)]
struct Script {
    unsupported_stats: BTreeSet<i32>,
    capabilities: Option<Vec<StatCapability>>,
    bulk_disabled: bool,
    bulk_failing_rids: BTreeSet<RawSaiObjectId>,
    read_failing_rids: BTreeSet<RawSaiObjectId>,
    meter_bucket_count: u32,
    zero_meter_classes: BTreeSet<u32>,
}

/// Scripted stats driver.
#[derive(Default)]
pub struct MockDriver {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

impl MockDriver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reads of `id` fail on every object.
    pub fn unsupport_stat(&self, id: i32) {
        self.script.lock().unsupported_stats.insert(id);
    }

    /// Answers the capability query with `caps`.
    pub fn set_capabilities(&self, caps: Vec<StatCapability>) {
        self.script.lock().capabilities = Some(caps);
    }

    /// Every bulk call fails.
    pub fn disable_bulk(&self) {
        self.script.lock().bulk_disabled = true;
    }

    /// Bulk rows of `rid` report a failure status.
    pub fn fail_bulk_row(&self, rid: RawSaiObjectId) {
        self.script.lock().bulk_failing_rids.insert(rid);
    }

    /// Per-object reads of `rid` fail.
    pub fn fail_reads(&self, rid: RawSaiObjectId) {
        self.script.lock().read_failing_rids.insert(rid);
    }

    pub fn set_meter_bucket_count(&self, count: u32) {
        self.script.lock().meter_bucket_count = count;
    }

    /// Meter class whose counters read as zero.
    pub fn zero_meter_class(&self, meter_class: u32) {
        self.script.lock().zero_meter_classes.insert(meter_class);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Bulk calls as `(row count, stat ids)`.
    pub fn bulk_calls(&self) -> Vec<(usize, Vec<i32>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::BulkGetStats { keys, ids, .. } => Some((keys.len(), ids)),
                _ => None,
            })
            .collect()
    }

    pub fn get_stats_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::GetStats { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl StatsDriver for MockDriver {
    fn get_stats(
        &self,
        _object_type: SaiObjectType,
        rid: RawSaiObjectId,
        ids: &[i32],
    ) -> SaiResult<Vec<u64>> {
        self.record(Call::GetStats {
            rid,
            ids: ids.to_vec(),
        });
        let script = self.script.lock();
        if script.read_failing_rids.contains(&rid) {
            return Err(SaiError::from_status(SaiStatus::Failure));
        }
        if ids.iter().any(|id| script.unsupported_stats.contains(id)) {
            return Err(SaiError::not_supported("stat"));
        }
        Ok(ids.iter().map(|id| value_of(rid, *id)).collect())
    }

    fn clear_stats(
        &self,
        _object_type: SaiObjectType,
        rid: RawSaiObjectId,
        ids: &[i32],
    ) -> SaiResult<()> {
        self.record(Call::ClearStats {
            rid,
            ids: ids.to_vec(),
        });
        Ok(())
    }

    fn bulk_get_stats(
        &self,
        _object_type: SaiObjectType,
        keys: &[ObjectKey],
        ids: &[i32],
        mode: StatsMode,
        statuses: &mut [SaiStatus],
        counters: &mut [u64],
    ) -> SaiResult<()> {
        self.record(Call::BulkGetStats {
            keys: keys.to_vec(),
            ids: ids.to_vec(),
            mode,
        });
        let script = self.script.lock();
        if script.bulk_disabled {
            return Err(SaiError::not_supported("bulk stats"));
        }

        for (row, key) in keys.iter().enumerate() {
            let (rid, zero) = match key {
                ObjectKey::Oid(rid) => (*rid, false),
                ObjectKey::MeterBucket {
                    eni_id,
                    meter_class,
                    ..
                } => (
                    *eni_id + u64::from(*meter_class),
                    script.zero_meter_classes.contains(meter_class),
                ),
            };
            if script.bulk_failing_rids.contains(&rid) {
                statuses[row] = SaiStatus::Failure;
                continue;
            }
            statuses[row] = SaiStatus::Success;
            for (col, id) in ids.iter().enumerate() {
                counters[row * ids.len() + col] = if zero { 0 } else { value_of(rid, *id) };
            }
        }
        Ok(())
    }

    fn query_stats_capability(
        &self,
        _switch_id: RawSaiObjectId,
        object_type: SaiObjectType,
        capacity: usize,
    ) -> SaiResult<Vec<StatCapability>> {
        self.record(Call::QueryCapability {
            object_type,
            capacity,
        });
        let script = self.script.lock();
        match &script.capabilities {
            None => Err(SaiError::not_supported("stats capability")),
            Some(caps) if capacity < caps.len() => Err(SaiError::BufferOverflow {
                required: caps.len(),
            }),
            Some(caps) => Ok(caps.clone()),
        }
    }

    fn get_attributes(
        &self,
        object_type: SaiObjectType,
        rid: RawSaiObjectId,
        ids: &[i32],
    ) -> SaiResult<Vec<String>> {
        self.record(Call::GetAttributes { object_type, rid });
        if object_type == SaiObjectType::Switch {
            return Ok(vec![self.script.lock().meter_bucket_count.to_string()]);
        }
        Ok(ids.iter().map(|id| format!("attr-{}-{}", rid, id)).collect())
    }

    fn switch_id(&self, _rid: RawSaiObjectId) -> RawSaiObjectId {
        SWITCH_ID
    }
}

/// Sink that records rows and flushes.
#[derive(Default)]
pub struct RecordingSink {
    rows: Mutex<Vec<(String, Vec<(String, String)>)>>,
    flushes: Mutex<usize>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn rows(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.rows.lock().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.rows().into_iter().map(|(k, _)| k).collect()
    }

    /// Fields of every write to `key`, merged in write order.
    pub fn row(&self, key: &str) -> Option<BTreeMap<String, String>> {
        let rows = self.rows.lock();
        let mut merged: Option<BTreeMap<String, String>> = None;
        for (_, fields) in rows.iter().filter(|(k, _)| k == key) {
            merged.get_or_insert_with(BTreeMap::new).extend(fields.iter().cloned());
        }
        merged
    }

    pub fn flushes(&self) -> usize {
        *self.flushes.lock()
    }

    pub fn clear(&self) {
        self.rows.lock().clear();
    }

    /// Polls until a row for `key` appears or `timeout` elapses.
    pub fn wait_for_row(&self, key: &str, timeout: Duration) -> Option<BTreeMap<String, String>> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(row) = self.row(key) {
                return Some(row);
            }
            if Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }
}

impl CounterSink for RecordingSink {
    fn write_row(&self, key: &str, fields: &[(String, String)]) {
        self.rows.lock().push((key.to_string(), fields.to_vec()));
    }

    fn flush(&self) {
        *self.flushes.lock() += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginRun {
    pub plugin: String,
    pub object_ids: Vec<String>,
    pub args: Vec<String>,
}

/// Plugin runner that records each invocation.
#[derive(Default)]
pub struct RecordingPluginRunner {
    runs: Mutex<Vec<PluginRun>>,
}

impl RecordingPluginRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn runs(&self) -> Vec<PluginRun> {
        self.runs.lock().clone()
    }
}

impl PluginRunner for RecordingPluginRunner {
    fn run(&self, plugin: &str, object_ids: &[String], args: &[String]) {
        self.runs.lock().push(PluginRun {
            plugin: plugin.to_string(),
            object_ids: object_ids.to_vec(),
            args: args.to_vec(),
        });
    }
}
