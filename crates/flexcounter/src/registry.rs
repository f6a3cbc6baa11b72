//! Counter group registry.
//!
//! Static table of every counter group a flex counter instance can host:
//! which object type registers with it, which configuration field carries its
//! counter ids, which plugin field feeds it, and how its context collects.

use once_cell::sync::Lazy;
use sonic_sai::stats::{
    AclCounterAttr, BufferPoolStat, CounterStat, EniStat, IngressPriorityGroupAttr,
    IngressPriorityGroupStat, MacsecFlowStat, MacsecSaAttr, MacsecSaStat, PolicerStat, PortStat,
    QueueAttr, QueueStat, RouterInterfaceStat, SwitchStat, TunnelStat,
};
use sonic_sai::SaiObjectType;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::fields;
use crate::context::{
    AttrContext, ContextBase, CounterContext, CounterGroupContext, MeterBucketContext,
};
use crate::driver::StatsDriver;

pub const PORT_COUNTER: &str = "Port Counter";
pub const PORT_DEBUG_COUNTER: &str = "Port Debug Counter";
pub const QUEUE_COUNTER: &str = "Queue Counter";
pub const QUEUE_ATTRIBUTE: &str = "Queue Attribute";
pub const PG_COUNTER: &str = "Priority Group Counter";
pub const PG_ATTRIBUTE: &str = "Priority Group Attribute";
pub const RIF_COUNTER: &str = "Rif Counter";
pub const SWITCH_DEBUG_COUNTER: &str = "Switch Debug Counter";
pub const MACSEC_FLOW_COUNTER: &str = "MACSEC Flow Counter";
pub const MACSEC_SA_COUNTER: &str = "MACSEC SA Counter";
pub const MACSEC_SA_ATTRIBUTE: &str = "MACSEC SA Attribute";
pub const ACL_COUNTER_ATTRIBUTE: &str = "ACL Counter Attribute";
pub const TUNNEL_COUNTER: &str = "Tunnel Counter";
pub const BUFFER_POOL_COUNTER: &str = "Buffer Pool Counter";
pub const FLOW_COUNTER: &str = "Flow Counter";
pub const POLICER_COUNTER: &str = "Policer Counter";
pub const ENI_COUNTER: &str = "DASH ENI Counter";
pub const METER_BUCKET_COUNTER: &str = "DASH Meter Bucket Counter";
pub const WRED_ECN_QUEUE_COUNTER: &str = "WRED ECN Queue Counter";
pub const WRED_ECN_PORT_COUNTER: &str = "WRED ECN Port Counter";

type ContextBuilder = fn(ContextBase) -> Box<dyn CounterGroupContext>;

/// Static description of one counter group.
#[derive(Debug)]
pub struct GroupDescriptor {
    pub name: &'static str,
    /// Object type of the vids registered with this group.
    pub object_type: SaiObjectType,
    pub id_list_field: &'static str,
    pub plugin_field: Option<&'static str>,
    /// Objects may carry their own STATS_MODE.
    pub supports_stats_mode: bool,
    pub use_capability_query: bool,
    /// Re-validate supported counters on every registration.
    pub always_check_supported_counters: bool,
    /// Keep previously supported counters across re-validation.
    pub dont_clear_supported_counters: bool,
    build: ContextBuilder,
}

impl GroupDescriptor {
    /// Creates an empty context for this group.
    pub fn create_context(
        &'static self,
        instance_id: &str,
        driver: Arc<dyn StatsDriver>,
    ) -> Box<dyn CounterGroupContext> {
        (self.build)(ContextBase::new(self, instance_id, driver))
    }
}

/// Shorthand for the common case: a stats group with capability query and
/// cache-once discovery.
const fn counter(
    name: &'static str,
    object_type: SaiObjectType,
    id_list_field: &'static str,
    plugin_field: Option<&'static str>,
    build: ContextBuilder,
) -> GroupDescriptor {
    GroupDescriptor {
        name,
        object_type,
        id_list_field,
        plugin_field,
        supports_stats_mode: false,
        use_capability_query: true,
        always_check_supported_counters: false,
        dont_clear_supported_counters: false,
        build,
    }
}

const fn attribute(
    name: &'static str,
    object_type: SaiObjectType,
    id_list_field: &'static str,
    build: ContextBuilder,
) -> GroupDescriptor {
    GroupDescriptor {
        use_capability_query: false,
        ..counter(name, object_type, id_list_field, None, build)
    }
}

/// Lookup tables over the group descriptors.
pub struct CounterKindRegistry {
    groups: Vec<GroupDescriptor>,
    by_name: HashMap<&'static str, usize>,
    by_field: HashMap<(SaiObjectType, &'static str), usize>,
    by_plugin_field: HashMap<&'static str, usize>,
}

static REGISTRY: Lazy<CounterKindRegistry> = Lazy::new(CounterKindRegistry::build);

impl CounterKindRegistry {
    /// Process-wide registry.
    pub fn global() -> &'static CounterKindRegistry {
        &REGISTRY
    }

    fn build() -> Self {
        use SaiObjectType as T;

        let groups = vec![
            counter(
                PORT_COUNTER,
                T::Port,
                fields::PORT_COUNTER_ID_LIST,
                Some(fields::PORT_PLUGIN),
                |b| Box::new(CounterContext::<PortStat>::new(b)),
            ),
            GroupDescriptor {
                use_capability_query: false,
                always_check_supported_counters: true,
                ..counter(
                    PORT_DEBUG_COUNTER,
                    T::Port,
                    fields::PORT_DEBUG_COUNTER_ID_LIST,
                    None,
                    |b| Box::new(CounterContext::<PortStat>::new(b)),
                )
            },
            GroupDescriptor {
                always_check_supported_counters: true,
                ..counter(
                    QUEUE_COUNTER,
                    T::Queue,
                    fields::QUEUE_COUNTER_ID_LIST,
                    Some(fields::QUEUE_PLUGIN),
                    |b| Box::new(CounterContext::<QueueStat>::new(b)),
                )
            },
            attribute(QUEUE_ATTRIBUTE, T::Queue, fields::QUEUE_ATTR_ID_LIST, |b| {
                Box::new(AttrContext::<QueueAttr>::new(b))
            }),
            GroupDescriptor {
                always_check_supported_counters: true,
                ..counter(
                    PG_COUNTER,
                    T::IngressPriorityGroup,
                    fields::PG_COUNTER_ID_LIST,
                    Some(fields::PG_PLUGIN),
                    |b| Box::new(CounterContext::<IngressPriorityGroupStat>::new(b)),
                )
            },
            attribute(PG_ATTRIBUTE, T::IngressPriorityGroup, fields::PG_ATTR_ID_LIST, |b| {
                Box::new(AttrContext::<IngressPriorityGroupAttr>::new(b))
            }),
            counter(
                RIF_COUNTER,
                T::RouterInterface,
                fields::RIF_COUNTER_ID_LIST,
                Some(fields::RIF_PLUGIN),
                |b| Box::new(CounterContext::<RouterInterfaceStat>::new(b)),
            ),
            GroupDescriptor {
                use_capability_query: false,
                always_check_supported_counters: true,
                ..counter(
                    SWITCH_DEBUG_COUNTER,
                    T::Switch,
                    fields::SWITCH_DEBUG_COUNTER_ID_LIST,
                    None,
                    |b| Box::new(CounterContext::<SwitchStat>::new(b)),
                )
            },
            counter(
                MACSEC_FLOW_COUNTER,
                T::MacsecFlow,
                fields::MACSEC_FLOW_COUNTER_ID_LIST,
                None,
                |b| Box::new(CounterContext::<MacsecFlowStat>::new(b)),
            ),
            counter(
                MACSEC_SA_COUNTER,
                T::MacsecSa,
                fields::MACSEC_SA_COUNTER_ID_LIST,
                None,
                |b| Box::new(CounterContext::<MacsecSaStat>::new(b)),
            ),
            attribute(MACSEC_SA_ATTRIBUTE, T::MacsecSa, fields::MACSEC_SA_ATTR_ID_LIST, |b| {
                Box::new(AttrContext::<MacsecSaAttr>::new(b))
            }),
            attribute(
                ACL_COUNTER_ATTRIBUTE,
                T::AclCounter,
                fields::ACL_COUNTER_ATTR_ID_LIST,
                |b| Box::new(AttrContext::<AclCounterAttr>::new(b)),
            ),
            GroupDescriptor {
                use_capability_query: false,
                ..counter(
                    TUNNEL_COUNTER,
                    T::Tunnel,
                    fields::TUNNEL_COUNTER_ID_LIST,
                    Some(fields::TUNNEL_PLUGIN),
                    |b| Box::new(CounterContext::<TunnelStat>::new(b)),
                )
            },
            GroupDescriptor {
                supports_stats_mode: true,
                ..counter(
                    BUFFER_POOL_COUNTER,
                    T::BufferPool,
                    fields::BUFFER_POOL_COUNTER_ID_LIST,
                    Some(fields::BUFFER_POOL_PLUGIN),
                    |b| Box::new(CounterContext::<BufferPoolStat>::new(b)),
                )
            },
            GroupDescriptor {
                use_capability_query: false,
                ..counter(
                    FLOW_COUNTER,
                    T::Counter,
                    fields::FLOW_COUNTER_ID_LIST,
                    Some(fields::FLOW_COUNTER_PLUGIN),
                    |b| Box::new(CounterContext::<CounterStat>::new(b)),
                )
            },
            counter(
                POLICER_COUNTER,
                T::Policer,
                fields::POLICER_COUNTER_ID_LIST,
                None,
                |b| Box::new(CounterContext::<PolicerStat>::new(b)),
            ),
            GroupDescriptor {
                dont_clear_supported_counters: true,
                ..counter(ENI_COUNTER, T::Eni, fields::ENI_COUNTER_ID_LIST, None, |b| {
                    Box::new(CounterContext::<EniStat>::new(b))
                })
            },
            GroupDescriptor {
                use_capability_query: false,
                ..counter(
                    METER_BUCKET_COUNTER,
                    T::Eni,
                    fields::METER_BUCKET_COUNTER_ID_LIST,
                    None,
                    |b| Box::new(MeterBucketContext::new(b)),
                )
            },
            GroupDescriptor {
                always_check_supported_counters: true,
                dont_clear_supported_counters: true,
                ..counter(
                    WRED_ECN_QUEUE_COUNTER,
                    T::Queue,
                    fields::WRED_ECN_QUEUE_COUNTER_ID_LIST,
                    Some(fields::WRED_QUEUE_PLUGIN),
                    |b| Box::new(CounterContext::<QueueStat>::new(b)),
                )
            },
            GroupDescriptor {
                always_check_supported_counters: true,
                dont_clear_supported_counters: true,
                ..counter(
                    WRED_ECN_PORT_COUNTER,
                    T::Port,
                    fields::WRED_ECN_PORT_COUNTER_ID_LIST,
                    Some(fields::WRED_PORT_PLUGIN),
                    |b| Box::new(CounterContext::<PortStat>::new(b)),
                )
            },
        ];

        let mut by_name = HashMap::new();
        let mut by_field = HashMap::new();
        let mut by_plugin_field = HashMap::new();
        for (index, group) in groups.iter().enumerate() {
            by_name.insert(group.name, index);
            by_field.insert((group.object_type, group.id_list_field), index);
            if let Some(plugin_field) = group.plugin_field {
                by_plugin_field.insert(plugin_field, index);
            }
        }

        Self {
            groups,
            by_name,
            by_field,
            by_plugin_field,
        }
    }

    pub fn groups(&self) -> &[GroupDescriptor] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&GroupDescriptor> {
        self.by_name.get(name).map(|i| &self.groups[*i])
    }

    /// Group fed by `field` for objects of `object_type`.
    pub fn group_for_field(
        &self,
        object_type: SaiObjectType,
        field: &str,
    ) -> Option<&GroupDescriptor> {
        self.by_field
            .get(&(object_type, field))
            .map(|i| &self.groups[*i])
    }

    /// Group a plugin configuration field registers plugins with.
    pub fn group_for_plugin_field(&self, field: &str) -> Option<&GroupDescriptor> {
        self.by_plugin_field.get(field).map(|i| &self.groups[*i])
    }

    /// Every group that may track objects of `object_type`.
    pub fn groups_for_object_type(
        &self,
        object_type: SaiObjectType,
    ) -> impl Iterator<Item = &GroupDescriptor> + '_ {
        self.groups
            .iter()
            .filter(move |g| g.object_type == object_type)
    }
}
