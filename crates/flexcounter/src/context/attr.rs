use log::{info, warn};
use sonic_sai::{
    parse_id_list, serialize_object_id, RawSaiObjectId, SaiId, SaiIdKind, StatsMode,
};
use std::collections::BTreeMap;

use super::{raw_ids, ContextBase, CounterGroupContext};
use crate::driver::CounterSink;

/// Attribute context: reads attribute values one object at a time.
///
/// Attributes have no bulk read and no capability discovery; whatever the
/// driver returns is written as the attribute's string value.
pub struct AttrContext<K: SaiIdKind> {
    base: ContextBase,
    objects: BTreeMap<RawSaiObjectId, (RawSaiObjectId, Vec<SaiId<K>>)>,
}

impl<K: SaiIdKind> AttrContext<K> {
    pub fn new(base: ContextBase) -> Self {
        Self {
            base,
            objects: BTreeMap::new(),
        }
    }
}

impl<K: SaiIdKind> CounterGroupContext for AttrContext<K> {
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
        let mut ids = parse_id_list::<K>(counter_ids);
        ids.sort();
        ids.dedup();
        if ids.is_empty() {
            info!(
                "{}: {} got no known attributes for {}, not tracking",
                self.base.instance_id(),
                self.base.name(),
                serialize_object_id(vid)
            );
            return;
        }
        self.objects.insert(vid, (rid, ids));
    }

    fn remove_object(&mut self, vid: RawSaiObjectId) {
        if self.objects.remove(&vid).is_none() {
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
    }

    fn collect(&mut self, sink: &dyn CounterSink) {
        for (vid, (rid, ids)) in &self.objects {
            let values = match self
                .base
                .driver()
                .get_attributes(self.base.object_type(), *rid, &raw_ids(ids))
            {
                Ok(values) if values.len() == ids.len() => values,
                Ok(values) => {
                    warn!(
                        "{}: {} got {} attribute values for {} ids of {}",
                        self.base.instance_id(),
                        self.base.name(),
                        values.len(),
                        ids.len(),
                        serialize_object_id(*vid)
                    );
                    continue;
                }
                Err(e) => {
                    warn!(
                        "{}: {} failed to get attributes of {}: {}",
                        self.base.instance_id(),
                        self.base.name(),
                        serialize_object_id(*vid),
                        e
                    );
                    continue;
                }
            };

            let fields: Vec<(String, String)> = ids
                .iter()
                .map(|id| id.name().to_string())
                .zip(values)
                .collect();
            sink.write_row(&serialize_object_id(*vid), &fields);
        }
    }

    fn has_object(&self) -> bool {
        !self.objects.is_empty()
    }

    fn object_vids(&self) -> Vec<RawSaiObjectId> {
        self.objects.keys().copied().collect()
    }

    fn per_object_vids(&self) -> Vec<RawSaiObjectId> {
        self.object_vids()
    }
}
