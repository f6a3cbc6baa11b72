//! Flex counter polling instance.
//!
//! A [`FlexCounter`] owns the counter group contexts of one instance (e.g.
//! `PORT_STAT_COUNTER`) and a scheduler thread that collects them every poll
//! interval. Control-path calls and collection passes share one lock: a pass
//! holds it from the first group to the last, and releases it while the
//! scheduler sleeps.

use log::{debug, error, info, warn};
use parking_lot::{Condvar, Mutex};
use sonic_sai::{
    object_type_of_vid, serialize_object_id, split_id_names, RawSaiObjectId, SaiObjectType,
    StatsMode,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::config::{
    fields, parse_plugin_list, parse_status, FlexCounterConfig, PrefixChunkConfig,
};
use crate::context::{CounterGroupContext, PartitionInfo};
use crate::driver::{CounterSink, PluginRunner, StatsDriver};
use crate::error::{FlexCounterError, Result};
use crate::registry::{CounterKindRegistry, GroupDescriptor};

/// Mutable state guarded by the instance lock.
struct State {
    enabled: bool,
    poll_interval_ms: u32,
    stats_mode: StatsMode,
    bulk_chunk_size: Option<u32>,
    prefixes: PrefixChunkConfig,
    groups: BTreeMap<&'static str, Box<dyn CounterGroupContext>>,
    discarded: bool,
    stop: bool,
    cycles: u64,
}

impl State {
    fn ready(&self) -> bool {
        self.enabled && self.poll_interval_ms > 0 && self.groups.values().any(|g| g.has_object())
    }

    fn is_empty(&self) -> bool {
        self.groups
            .values()
            .all(|g| !g.has_object() && !g.has_plugins())
    }
}

struct Shared {
    instance_id: String,
    counters_db: String,
    counters_table: String,
    driver: Arc<dyn StatsDriver>,
    sink: Arc<dyn CounterSink>,
    plugins: Arc<dyn PluginRunner>,
    state: Mutex<State>,
    wake: Condvar,
}

impl Shared {
    /// Returns the group's context, creating it with the instance's current
    /// chunking and stats mode.
    fn context<'a>(
        &self,
        state: &'a mut State,
        descriptor: &'static GroupDescriptor,
    ) -> &'a mut dyn CounterGroupContext {
        let stats_mode = state.stats_mode;
        let chunk_size = state.bulk_chunk_size;
        let prefixes = &state.prefixes;

        state
            .groups
            .entry(descriptor.name)
            .or_insert_with(|| {
                debug!("{}: creating context {}", self.instance_id, descriptor.name);
                let mut context =
                    descriptor.create_context(&self.instance_id, Arc::clone(&self.driver));
                context.set_stats_mode(stats_mode);
                if let Some(size) = chunk_size {
                    context.set_bulk_chunk_size(size);
                }
                if !prefixes.is_empty() {
                    if let Err(e) = context.set_bulk_chunk_size_per_prefix(prefixes.clone()) {
                        error!("{}: {}", self.instance_id, e);
                    }
                }
                context
            })
            .as_mut()
    }

    /// One collection pass: every group, one flush, then plugins.
    fn collect_all(&self, state: &mut State) {
        for context in state.groups.values_mut() {
            context.collect(&*self.sink);
        }
        self.sink.flush();

        let args = [
            self.counters_db.clone(),
            self.counters_table.clone(),
            (u64::from(state.poll_interval_ms) * 1000).to_string(),
        ];
        for context in state.groups.values() {
            context.run_plugins(&*self.plugins, &args);
        }
        state.cycles += 1;
    }

    fn run(&self) {
        info!("{}: flex counter thread started", self.instance_id);
        let mut state = self.state.lock();

        while !state.stop {
            if !state.ready() {
                self.wake.wait(&mut state);
                continue;
            }

            let interval_ms = state.poll_interval_ms;
            let start = Instant::now();
            self.collect_all(&mut state);
            let elapsed = start.elapsed();
            let interval = Duration::from_millis(u64::from(interval_ms));
            debug!(
                "{}: pass took {:?} of {:?}",
                self.instance_id, elapsed, interval
            );
            if elapsed > interval {
                warn!(
                    "{}: collection took {:?}, longer than poll interval {:?}",
                    self.instance_id, elapsed, interval
                );
            }

            let overrun = elapsed.as_nanos() % interval.as_nanos();
            let deadline = Instant::now() + (interval - Duration::from_nanos(overrun as u64));
            while !state.stop {
                if self.wake.wait_until(&mut state, deadline).timed_out() {
                    break;
                }
                if !state.ready() || state.poll_interval_ms != interval_ms {
                    break;
                }
            }
        }

        info!("{}: flex counter thread stopped", self.instance_id);
    }
}

/// One polling instance.
pub struct FlexCounter {
    shared: Arc<Shared>,
    thread_name: String,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl FlexCounter {
    pub fn new(
        instance_id: impl Into<String>,
        config: &FlexCounterConfig,
        driver: Arc<dyn StatsDriver>,
        sink: Arc<dyn CounterSink>,
        plugins: Arc<dyn PluginRunner>,
    ) -> Self {
        let instance_id = instance_id.into();
        let thread_name = format!("{}-{}", config.thread_name_prefix, instance_id);
        Self {
            shared: Arc::new(Shared {
                instance_id,
                counters_db: config.counters_db.clone(),
                counters_table: config.counters_table.clone(),
                driver,
                sink,
                plugins,
                state: Mutex::new(State {
                    enabled: false,
                    poll_interval_ms: config.poll_interval_ms,
                    stats_mode: config.stats_mode,
                    bulk_chunk_size: None,
                    prefixes: PrefixChunkConfig::default(),
                    groups: BTreeMap::new(),
                    discarded: false,
                    stop: false,
                    cycles: 0,
                }),
                wake: Condvar::new(),
            }),
            thread_name,
            thread: Mutex::new(None),
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.shared.instance_id
    }

    /// Applies instance configuration fields.
    ///
    /// Bad values are logged and skipped; the remaining fields still apply.
    pub fn configure(&self, config: &[(String, String)]) {
        let registry = CounterKindRegistry::global();
        let id = &self.shared.instance_id;
        let mut state = self.shared.state.lock();

        for (field, value) in config {
            match field.as_str() {
                fields::POLL_INTERVAL => match value.parse::<u32>() {
                    Ok(ms) => state.poll_interval_ms = ms,
                    Err(_) => error!(
                        "{}: {}",
                        id,
                        FlexCounterError::InvalidPollInterval(value.clone())
                    ),
                },
                fields::STATUS => match parse_status(value) {
                    Ok(enabled) => {
                        info!(
                            "{}: {}",
                            id,
                            if enabled { "enabled" } else { "disabled" }
                        );
                        state.enabled = enabled;
                    }
                    Err(e) => error!("{}: {}", id, e),
                },
                fields::STATS_MODE => match StatsMode::parse(value) {
                    Some(mode) => {
                        state.stats_mode = mode;
                        for context in state.groups.values_mut() {
                            context.set_stats_mode(mode);
                        }
                    }
                    None => error!(
                        "{}: {}",
                        id,
                        FlexCounterError::InvalidStatsMode(value.clone())
                    ),
                },
                fields::BULK_CHUNK_SIZE => match value.parse::<u32>() {
                    Ok(size) => {
                        state.bulk_chunk_size = Some(size);
                        for context in state.groups.values_mut() {
                            context.set_bulk_chunk_size(size);
                        }
                    }
                    Err(_) => error!(
                        "{}: {}",
                        id,
                        FlexCounterError::InvalidBulkChunkSize(value.clone())
                    ),
                },
                fields::BULK_CHUNK_SIZE_PER_PREFIX => match value.parse::<PrefixChunkConfig>() {
                    Ok(prefixes) => {
                        let mut accepted = true;
                        for context in state.groups.values_mut() {
                            let result = context.set_bulk_chunk_size_per_prefix(prefixes.clone());
                            if let Err(e) = result {
                                error!("{}: {}", id, e);
                                accepted = false;
                            }
                        }
                        // Groups created later inherit only a config every group took.
                        if accepted {
                            state.prefixes = prefixes;
                        }
                    }
                    Err(e) => error!("{}: {}", id, e),
                },
                other => match registry.group_for_plugin_field(other) {
                    Some(descriptor) => {
                        let plugins = parse_plugin_list(value);
                        self.shared
                            .context(&mut state, descriptor)
                            .add_plugins(&plugins);
                    }
                    None => error!("{}: unknown configuration field {}", id, other),
                },
            }
        }

        drop(state);
        self.shared.wake.notify_all();
    }

    /// Registers one object with every group its fields name.
    pub fn add_counter(
        &self,
        vid: RawSaiObjectId,
        rid: RawSaiObjectId,
        config: &[(String, String)],
    ) {
        let Some(object_type) = object_type_of_vid(vid) else {
            error!(
                "{}: cannot derive object type of {}",
                self.shared.instance_id,
                serialize_object_id(vid)
            );
            return;
        };
        self.register(object_type, &[vid], &[rid], config);
    }

    /// Registers objects of one type that share the same fields.
    pub fn bulk_add_counter(
        &self,
        object_type: SaiObjectType,
        vids: &[RawSaiObjectId],
        rids: &[RawSaiObjectId],
        config: &[(String, String)],
    ) {
        if vids.len() != rids.len() {
            error!(
                "{}: bulk add of {} with {} vids but {} rids",
                self.shared.instance_id,
                object_type,
                vids.len(),
                rids.len()
            );
            return;
        }
        if vids.is_empty() {
            return;
        }
        self.register(object_type, vids, rids, config);
    }

    fn register(
        &self,
        object_type: SaiObjectType,
        vids: &[RawSaiObjectId],
        rids: &[RawSaiObjectId],
        config: &[(String, String)],
    ) {
        let registry = CounterKindRegistry::global();
        let id = &self.shared.instance_id;

        let mut stats_mode = None;
        for (field, value) in config.iter().filter(|(f, _)| f == fields::STATS_MODE) {
            match StatsMode::parse(value) {
                Some(mode) => stats_mode = Some(mode),
                None => error!(
                    "{}: {} ({})",
                    id,
                    FlexCounterError::InvalidStatsMode(value.clone()),
                    field
                ),
            }
        }

        let mut state = self.shared.state.lock();
        for (field, value) in config.iter().filter(|(f, _)| f != fields::STATS_MODE) {
            let Some(descriptor) = registry.group_for_field(object_type, field) else {
                error!(
                    "{}: {}",
                    id,
                    FlexCounterError::UnknownGroup(format!("{} for {}", field, object_type))
                );
                continue;
            };
            if descriptor.supports_stats_mode && stats_mode.is_none() {
                error!(
                    "{}: {} needs {} alongside {}",
                    id,
                    descriptor.name,
                    fields::STATS_MODE,
                    field
                );
                continue;
            }
            let counter_ids = split_id_names(value);
            if counter_ids.is_empty() {
                info!("{}: empty {} for {}, skipping", id, field, descriptor.name);
                continue;
            }

            let context = self.shared.context(&mut state, descriptor);
            match vids {
                [vid] => context.add_object(*vid, rids[0], &counter_ids, stats_mode),
                _ => context.bulk_add_objects(vids, rids, &counter_ids, stats_mode),
            }
        }

        drop(state);
        self.shared.wake.notify_all();
    }

    /// Stops tracking `vid` in every group of its object type.
    pub fn remove_counter(&self, vid: RawSaiObjectId) {
        let Some(object_type) = object_type_of_vid(vid) else {
            error!(
                "{}: cannot derive object type of {}",
                self.shared.instance_id,
                serialize_object_id(vid)
            );
            return;
        };

        let mut state = self.shared.state.lock();
        let mut found = false;
        for descriptor in CounterKindRegistry::global().groups_for_object_type(object_type) {
            if let Some(context) = state.groups.get_mut(descriptor.name) {
                found = true;
                context.remove_object(vid);
            }
        }
        if !found {
            info!(
                "{}: no group tracks {} objects, nothing to remove for {}",
                self.shared.instance_id,
                object_type,
                serialize_object_id(vid)
            );
        }
    }

    /// Drops every plugin and marks the instance discarded.
    pub fn remove_counter_plugins(&self) {
        let mut state = self.shared.state.lock();
        for context in state.groups.values_mut() {
            context.remove_plugins();
        }
        state.discarded = true;
    }

    pub fn remove_all_counters(&self) {
        let mut state = self.shared.state.lock();
        for context in state.groups.values_mut() {
            context.remove_all_objects();
        }
    }

    /// Spawns the scheduler thread; a running thread is left alone.
    pub fn start(&self) -> Result<()> {
        let mut thread = self.thread.lock();
        if thread.is_some() {
            return Ok(());
        }

        self.shared.state.lock().stop = false;
        let shared = Arc::clone(&self.shared);
        let handle = std::thread::Builder::new()
            .name(self.thread_name.clone())
            .spawn(move || shared.run())
            .map_err(FlexCounterError::Thread)?;
        *thread = Some(handle);
        Ok(())
    }

    /// Stops and joins the scheduler thread. Safe to call repeatedly.
    pub fn stop(&self) {
        let Some(handle) = self.thread.lock().take() else {
            return;
        };

        {
            let mut state = self.shared.state.lock();
            state.stop = true;
            self.shared.wake.notify_all();
        }

        if handle.join().is_err() {
            error!("{}: flex counter thread panicked", self.shared.instance_id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.lock().is_some()
    }

    /// No group tracks an object and no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().is_empty()
    }

    /// Empty after an explicit plugin removal.
    pub fn is_discardable(&self) -> bool {
        let state = self.shared.state.lock();
        state.discarded && state.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.state.lock().enabled
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.shared.state.lock().poll_interval_ms))
    }

    pub fn stats_mode(&self) -> StatsMode {
        self.shared.state.lock().stats_mode
    }

    /// Completed collection passes.
    pub fn cycle_count(&self) -> u64 {
        self.shared.state.lock().cycles
    }

    pub fn group_names(&self) -> Vec<String> {
        self.shared
            .state
            .lock()
            .groups
            .keys()
            .map(|name| name.to_string())
            .collect()
    }

    /// Distinct objects tracked by `group`; 0 if the group does not exist.
    pub fn group_object_count(&self, group: &str) -> usize {
        self.shared
            .state
            .lock()
            .groups
            .get(group)
            .map_or(0, |g| g.object_vids().len())
    }

    pub fn group_per_object_vids(&self, group: &str) -> Vec<RawSaiObjectId> {
        self.shared
            .state
            .lock()
            .groups
            .get(group)
            .map(|g| g.per_object_vids())
            .unwrap_or_default()
    }

    pub fn group_partitions(&self, group: &str) -> Vec<PartitionInfo> {
        self.shared
            .state
            .lock()
            .groups
            .get(group)
            .map(|g| g.bulk_partitions())
            .unwrap_or_default()
    }

    /// Runs one collection pass on the calling thread.
    pub fn collect_now(&self) {
        let mut state = self.shared.state.lock();
        self.shared.collect_all(&mut state);
    }
}

impl Drop for FlexCounter {
    fn drop(&mut self) {
        self.stop();
    }
}
