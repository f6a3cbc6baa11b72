//! Owner of the flex counter instances of a process.

use log::{error, info};
use parking_lot::Mutex;
use sonic_sai::{RawSaiObjectId, SaiObjectType};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::FlexCounterConfig;
use crate::driver::{CounterSink, PluginRunner, StatsDriver};
use crate::flex_counter::FlexCounter;

/// Routes control-path calls to named [`FlexCounter`] instances.
///
/// Instances are created and started on first use. An instance that becomes
/// discardable after a removal is stopped and dropped.
pub struct FlexCounterManager {
    config: FlexCounterConfig,
    driver: Arc<dyn StatsDriver>,
    sink: Arc<dyn CounterSink>,
    plugins: Arc<dyn PluginRunner>,
    instances: Mutex<BTreeMap<String, Arc<FlexCounter>>>,
}

impl FlexCounterManager {
    pub fn new(
        config: FlexCounterConfig,
        driver: Arc<dyn StatsDriver>,
        sink: Arc<dyn CounterSink>,
        plugins: Arc<dyn PluginRunner>,
    ) -> Self {
        Self {
            config,
            driver,
            sink,
            plugins,
            instances: Mutex::new(BTreeMap::new()),
        }
    }

    fn get_or_create(&self, instance: &str) -> Arc<FlexCounter> {
        let mut instances = self.instances.lock();
        if let Some(fc) = instances.get(instance) {
            return Arc::clone(fc);
        }

        let fc = Arc::new(FlexCounter::new(
            instance,
            &self.config,
            Arc::clone(&self.driver),
            Arc::clone(&self.sink),
            Arc::clone(&self.plugins),
        ));
        if let Err(e) = fc.start() {
            error!("{}: failed to start flex counter thread: {}", instance, e);
        }
        info!("{}: flex counter instance created", instance);
        instances.insert(instance.to_string(), Arc::clone(&fc));
        fc
    }

    fn drop_if_discardable(&self, instance: &str) {
        let removed = {
            let mut instances = self.instances.lock();
            match instances.get(instance) {
                Some(fc) if fc.is_discardable() => instances.remove(instance),
                _ => None,
            }
        };
        if let Some(fc) = removed {
            fc.stop();
            info!("{}: flex counter instance removed", instance);
        }
    }

    pub fn instance(&self, instance: &str) -> Option<Arc<FlexCounter>> {
        self.instances.lock().get(instance).cloned()
    }

    pub fn instance_names(&self) -> Vec<String> {
        self.instances.lock().keys().cloned().collect()
    }

    pub fn configure(&self, instance: &str, fields: &[(String, String)]) {
        self.get_or_create(instance).configure(fields);
    }

    pub fn add_counter(
        &self,
        instance: &str,
        vid: RawSaiObjectId,
        rid: RawSaiObjectId,
        fields: &[(String, String)],
    ) {
        self.get_or_create(instance).add_counter(vid, rid, fields);
    }

    pub fn bulk_add_counter(
        &self,
        instance: &str,
        object_type: SaiObjectType,
        vids: &[RawSaiObjectId],
        rids: &[RawSaiObjectId],
        fields: &[(String, String)],
    ) {
        self.get_or_create(instance)
            .bulk_add_counter(object_type, vids, rids, fields);
    }

    pub fn remove_counter(&self, instance: &str, vid: RawSaiObjectId) {
        let Some(fc) = self.instance(instance) else {
            info!("{}: no such flex counter instance", instance);
            return;
        };
        fc.remove_counter(vid);
        self.drop_if_discardable(instance);
    }

    pub fn remove_counter_plugins(&self, instance: &str) {
        let Some(fc) = self.instance(instance) else {
            info!("{}: no such flex counter instance", instance);
            return;
        };
        fc.remove_counter_plugins();
        self.drop_if_discardable(instance);
    }

    /// Stops every instance.
    pub fn shutdown(&self) {
        let instances = std::mem::take(&mut *self.instances.lock());
        for (_, fc) in instances {
            fc.stop();
        }
    }
}

impl Drop for FlexCounterManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
