//! Stat and attribute enums polled by flex counters.
//!
//! Each table lists the ids the counter engine may be asked to poll. Values
//! follow the SAI headers; drop-reason ids sit at the headers' range bases.

use crate::define_id_kind;
use crate::types::SaiObjectType;

const PORT_IN_DROP_BASE: i32 = 0x0000_1000;
const PORT_OUT_DROP_BASE: i32 = 0x0000_2000;
const SWITCH_IN_DROP_BASE: i32 = 0x0000_1000;
const SWITCH_OUT_DROP_BASE: i32 = 0x0000_2000;

define_id_kind!(PortStat, "sai_port_stat_t", SaiObjectType::Port, PortStatId, [
    ("SAI_PORT_STAT_IF_IN_OCTETS", 0),
    ("SAI_PORT_STAT_IF_IN_UCAST_PKTS", 1),
    ("SAI_PORT_STAT_IF_IN_NON_UCAST_PKTS", 2),
    ("SAI_PORT_STAT_IF_IN_DISCARDS", 3),
    ("SAI_PORT_STAT_IF_IN_ERRORS", 4),
    ("SAI_PORT_STAT_IF_IN_UNKNOWN_PROTOS", 5),
    ("SAI_PORT_STAT_IF_IN_BROADCAST_PKTS", 6),
    ("SAI_PORT_STAT_IF_IN_MULTICAST_PKTS", 7),
    ("SAI_PORT_STAT_IF_IN_VLAN_DISCARDS", 8),
    ("SAI_PORT_STAT_IF_OUT_OCTETS", 9),
    ("SAI_PORT_STAT_IF_OUT_UCAST_PKTS", 10),
    ("SAI_PORT_STAT_IF_OUT_NON_UCAST_PKTS", 11),
    ("SAI_PORT_STAT_IF_OUT_DISCARDS", 12),
    ("SAI_PORT_STAT_IF_OUT_ERRORS", 13),
    ("SAI_PORT_STAT_IF_OUT_QLEN", 14),
    ("SAI_PORT_STAT_IF_OUT_BROADCAST_PKTS", 15),
    ("SAI_PORT_STAT_IF_OUT_MULTICAST_PKTS", 16),
    ("SAI_PORT_STAT_ETHER_STATS_DROP_EVENTS", 17),
    ("SAI_PORT_STAT_ETHER_STATS_MULTICAST_PKTS", 18),
    ("SAI_PORT_STAT_ETHER_STATS_BROADCAST_PKTS", 19),
    ("SAI_PORT_STAT_ETHER_STATS_UNDERSIZE_PKTS", 20),
    ("SAI_PORT_STAT_ETHER_STATS_FRAGMENTS", 21),
    ("SAI_PORT_STAT_ETHER_STATS_PKTS_64_OCTETS", 22),
    ("SAI_PORT_STAT_ETHER_STATS_PKTS_65_TO_127_OCTETS", 23),
    ("SAI_PORT_STAT_ETHER_STATS_PKTS_128_TO_255_OCTETS", 24),
    ("SAI_PORT_STAT_ETHER_STATS_PKTS_256_TO_511_OCTETS", 25),
    ("SAI_PORT_STAT_ETHER_STATS_PKTS_512_TO_1023_OCTETS", 26),
    ("SAI_PORT_STAT_ETHER_STATS_PKTS_1024_TO_1518_OCTETS", 27),
    ("SAI_PORT_STAT_ETHER_STATS_PKTS_1519_TO_2047_OCTETS", 28),
    ("SAI_PORT_STAT_ETHER_STATS_OVERSIZE_PKTS", 33),
    ("SAI_PORT_STAT_ETHER_STATS_JABBERS", 36),
    ("SAI_PORT_STAT_ETHER_STATS_OCTETS", 37),
    ("SAI_PORT_STAT_ETHER_STATS_PKTS", 38),
    ("SAI_PORT_STAT_ETHER_STATS_COLLISIONS", 39),
    ("SAI_PORT_STAT_ETHER_STATS_CRC_ALIGN_ERRORS", 40),
    ("SAI_PORT_STAT_ETHER_STATS_TX_NO_ERRORS", 41),
    ("SAI_PORT_STAT_ETHER_STATS_RX_NO_ERRORS", 42),
    ("SAI_PORT_STAT_IP_IN_RECEIVES", 43),
    ("SAI_PORT_STAT_IPV6_IN_RECEIVES", 55),
    ("SAI_PORT_STAT_GREEN_WRED_DROPPED_PACKETS", 66),
    ("SAI_PORT_STAT_YELLOW_WRED_DROPPED_PACKETS", 68),
    ("SAI_PORT_STAT_RED_WRED_DROPPED_PACKETS", 70),
    ("SAI_PORT_STAT_WRED_DROPPED_PACKETS", 72),
    ("SAI_PORT_STAT_ECN_MARKED_PACKETS", 74),
    ("SAI_PORT_STAT_PFC_0_RX_PKTS", 96),
    ("SAI_PORT_STAT_PFC_0_TX_PKTS", 97),
    ("SAI_PORT_STAT_PFC_1_RX_PKTS", 98),
    ("SAI_PORT_STAT_PFC_1_TX_PKTS", 99),
    ("SAI_PORT_STAT_PFC_3_RX_PKTS", 102),
    ("SAI_PORT_STAT_PFC_3_TX_PKTS", 103),
    ("SAI_PORT_STAT_PFC_4_RX_PKTS", 104),
    ("SAI_PORT_STAT_PFC_4_TX_PKTS", 105),
    ("SAI_PORT_STAT_IF_IN_FEC_CORRECTABLE_FRAMES", 160),
    ("SAI_PORT_STAT_IF_IN_FEC_NOT_CORRECTABLE_FRAMES", 161),
    ("SAI_PORT_STAT_IF_IN_FEC_SYMBOL_ERRORS", 162),
    ("SAI_PORT_STAT_GREEN_WRED_ECN_MARKED_PACKETS", 190),
    ("SAI_PORT_STAT_YELLOW_WRED_ECN_MARKED_PACKETS", 192),
    ("SAI_PORT_STAT_RED_WRED_ECN_MARKED_PACKETS", 194),
    ("SAI_PORT_STAT_WRED_ECN_MARKED_PACKETS", 196),
    ("SAI_PORT_STAT_IN_CONFIGURED_DROP_REASONS_0_DROPPED_PKTS", PORT_IN_DROP_BASE),
    ("SAI_PORT_STAT_IN_CONFIGURED_DROP_REASONS_1_DROPPED_PKTS", PORT_IN_DROP_BASE + 1),
    ("SAI_PORT_STAT_IN_CONFIGURED_DROP_REASONS_2_DROPPED_PKTS", PORT_IN_DROP_BASE + 2),
    ("SAI_PORT_STAT_IN_CONFIGURED_DROP_REASONS_3_DROPPED_PKTS", PORT_IN_DROP_BASE + 3),
    ("SAI_PORT_STAT_OUT_CONFIGURED_DROP_REASONS_0_DROPPED_PKTS", PORT_OUT_DROP_BASE),
    ("SAI_PORT_STAT_OUT_CONFIGURED_DROP_REASONS_1_DROPPED_PKTS", PORT_OUT_DROP_BASE + 1),
]);

define_id_kind!(QueueStat, "sai_queue_stat_t", SaiObjectType::Queue, QueueStatId, [
    ("SAI_QUEUE_STAT_PACKETS", 0),
    ("SAI_QUEUE_STAT_BYTES", 1),
    ("SAI_QUEUE_STAT_DROPPED_PACKETS", 2),
    ("SAI_QUEUE_STAT_DROPPED_BYTES", 3),
    ("SAI_QUEUE_STAT_GREEN_WRED_DROPPED_PACKETS", 8),
    ("SAI_QUEUE_STAT_YELLOW_WRED_DROPPED_PACKETS", 12),
    ("SAI_QUEUE_STAT_RED_WRED_DROPPED_PACKETS", 16),
    ("SAI_QUEUE_STAT_WRED_DROPPED_PACKETS", 20),
    ("SAI_QUEUE_STAT_CURR_OCCUPANCY_BYTES", 24),
    ("SAI_QUEUE_STAT_WATERMARK_BYTES", 25),
    ("SAI_QUEUE_STAT_SHARED_CURR_OCCUPANCY_BYTES", 26),
    ("SAI_QUEUE_STAT_SHARED_WATERMARK_BYTES", 27),
    ("SAI_QUEUE_STAT_GREEN_WRED_ECN_MARKED_PACKETS", 28),
    ("SAI_QUEUE_STAT_YELLOW_WRED_ECN_MARKED_PACKETS", 30),
    ("SAI_QUEUE_STAT_RED_WRED_ECN_MARKED_PACKETS", 32),
    ("SAI_QUEUE_STAT_WRED_ECN_MARKED_PACKETS", 34),
    ("SAI_QUEUE_STAT_CURR_OCCUPANCY_LEVEL", 36),
    ("SAI_QUEUE_STAT_WATERMARK_LEVEL", 37),
]);

define_id_kind!(QueueAttr, "sai_queue_attr_t", SaiObjectType::Queue, QueueAttrId, [
    ("SAI_QUEUE_ATTR_TYPE", 0),
    ("SAI_QUEUE_ATTR_PORT", 1),
    ("SAI_QUEUE_ATTR_INDEX", 2),
    ("SAI_QUEUE_ATTR_PAUSE_STATUS", 9),
    ("SAI_QUEUE_ATTR_PFC_DLR_INIT", 11),
]);

define_id_kind!(IngressPriorityGroupStat, "sai_ingress_priority_group_stat_t",
    SaiObjectType::IngressPriorityGroup, IngressPriorityGroupStatId, [
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_PACKETS", 0),
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_BYTES", 1),
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_CURR_OCCUPANCY_BYTES", 2),
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_WATERMARK_BYTES", 3),
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_SHARED_CURR_OCCUPANCY_BYTES", 4),
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_SHARED_WATERMARK_BYTES", 5),
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_XOFF_ROOM_CURR_OCCUPANCY_BYTES", 6),
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_XOFF_ROOM_WATERMARK_BYTES", 7),
    ("SAI_INGRESS_PRIORITY_GROUP_STAT_DROPPED_PACKETS", 8),
]);

define_id_kind!(IngressPriorityGroupAttr, "sai_ingress_priority_group_attr_t",
    SaiObjectType::IngressPriorityGroup, IngressPriorityGroupAttrId, [
    ("SAI_INGRESS_PRIORITY_GROUP_ATTR_BUFFER_PROFILE", 0),
    ("SAI_INGRESS_PRIORITY_GROUP_ATTR_PORT", 1),
    ("SAI_INGRESS_PRIORITY_GROUP_ATTR_TAM", 2),
    ("SAI_INGRESS_PRIORITY_GROUP_ATTR_INDEX", 3),
]);

define_id_kind!(RouterInterfaceStat, "sai_router_interface_stat_t",
    SaiObjectType::RouterInterface, RouterInterfaceStatId, [
    ("SAI_ROUTER_INTERFACE_STAT_IN_OCTETS", 0),
    ("SAI_ROUTER_INTERFACE_STAT_IN_PACKETS", 1),
    ("SAI_ROUTER_INTERFACE_STAT_OUT_OCTETS", 2),
    ("SAI_ROUTER_INTERFACE_STAT_OUT_PACKETS", 3),
    ("SAI_ROUTER_INTERFACE_STAT_IN_ERROR_OCTETS", 4),
    ("SAI_ROUTER_INTERFACE_STAT_IN_ERROR_PACKETS", 5),
    ("SAI_ROUTER_INTERFACE_STAT_OUT_ERROR_OCTETS", 6),
    ("SAI_ROUTER_INTERFACE_STAT_OUT_ERROR_PACKETS", 7),
]);

define_id_kind!(SwitchStat, "sai_switch_stat_t", SaiObjectType::Switch, SwitchStatId, [
    ("SAI_SWITCH_STAT_IN_CONFIGURED_DROP_REASONS_0_DROPPED_PKTS", SWITCH_IN_DROP_BASE),
    ("SAI_SWITCH_STAT_IN_CONFIGURED_DROP_REASONS_1_DROPPED_PKTS", SWITCH_IN_DROP_BASE + 1),
    ("SAI_SWITCH_STAT_IN_CONFIGURED_DROP_REASONS_2_DROPPED_PKTS", SWITCH_IN_DROP_BASE + 2),
    ("SAI_SWITCH_STAT_OUT_CONFIGURED_DROP_REASONS_0_DROPPED_PKTS", SWITCH_OUT_DROP_BASE),
    ("SAI_SWITCH_STAT_OUT_CONFIGURED_DROP_REASONS_1_DROPPED_PKTS", SWITCH_OUT_DROP_BASE + 1),
]);

define_id_kind!(BufferPoolStat, "sai_buffer_pool_stat_t",
    SaiObjectType::BufferPool, BufferPoolStatId, [
    ("SAI_BUFFER_POOL_STAT_CURR_OCCUPANCY_BYTES", 0),
    ("SAI_BUFFER_POOL_STAT_WATERMARK_BYTES", 1),
    ("SAI_BUFFER_POOL_STAT_DROPPED_PACKETS", 2),
    ("SAI_BUFFER_POOL_STAT_XOFF_ROOM_CURR_OCCUPANCY_BYTES", 0x16),
    ("SAI_BUFFER_POOL_STAT_XOFF_ROOM_WATERMARK_BYTES", 0x17),
]);

define_id_kind!(TunnelStat, "sai_tunnel_stat_t", SaiObjectType::Tunnel, TunnelStatId, [
    ("SAI_TUNNEL_STAT_IN_OCTETS", 0),
    ("SAI_TUNNEL_STAT_IN_PACKETS", 1),
    ("SAI_TUNNEL_STAT_OUT_OCTETS", 2),
    ("SAI_TUNNEL_STAT_OUT_PACKETS", 3),
]);

define_id_kind!(CounterStat, "sai_counter_stat_t", SaiObjectType::Counter, CounterStatId, [
    ("SAI_COUNTER_STAT_PACKETS", 0),
    ("SAI_COUNTER_STAT_BYTES", 1),
]);

define_id_kind!(MacsecFlowStat, "sai_macsec_flow_stat_t",
    SaiObjectType::MacsecFlow, MacsecFlowStatId, [
    ("SAI_MACSEC_FLOW_STAT_OTHER_ERR", 0),
    ("SAI_MACSEC_FLOW_STAT_OCTETS_UNCONTROLLED", 1),
    ("SAI_MACSEC_FLOW_STAT_OCTETS_CONTROLLED", 2),
    ("SAI_MACSEC_FLOW_STAT_OUT_OCTETS_COMMON", 3),
    ("SAI_MACSEC_FLOW_STAT_UCAST_PKTS_UNCONTROLLED", 4),
    ("SAI_MACSEC_FLOW_STAT_UCAST_PKTS_CONTROLLED", 5),
    ("SAI_MACSEC_FLOW_STAT_CONTROL_PKTS", 14),
    ("SAI_MACSEC_FLOW_STAT_PKTS_UNTAGGED", 15),
    ("SAI_MACSEC_FLOW_STAT_IN_TAGGED_CONTROL_PKTS", 16),
    ("SAI_MACSEC_FLOW_STAT_IN_PKTS_NO_TAG", 18),
    ("SAI_MACSEC_FLOW_STAT_IN_PKTS_BAD_TAG", 19),
]);

define_id_kind!(MacsecSaStat, "sai_macsec_sa_stat_t", SaiObjectType::MacsecSa, MacsecSaStatId, [
    ("SAI_MACSEC_SA_STAT_OCTETS_ENCRYPTED", 0),
    ("SAI_MACSEC_SA_STAT_OCTETS_PROTECTED", 1),
    ("SAI_MACSEC_SA_STAT_OUT_PKTS_ENCRYPTED", 2),
    ("SAI_MACSEC_SA_STAT_OUT_PKTS_PROTECTED", 3),
    ("SAI_MACSEC_SA_STAT_IN_PKTS_UNCHECKED", 4),
    ("SAI_MACSEC_SA_STAT_IN_PKTS_DELAYED", 5),
    ("SAI_MACSEC_SA_STAT_IN_PKTS_LATE", 6),
    ("SAI_MACSEC_SA_STAT_IN_PKTS_INVALID", 7),
    ("SAI_MACSEC_SA_STAT_IN_PKTS_NOT_VALID", 8),
    ("SAI_MACSEC_SA_STAT_IN_PKTS_NOT_USING_SA", 9),
    ("SAI_MACSEC_SA_STAT_IN_PKTS_UNUSED_SA", 10),
    ("SAI_MACSEC_SA_STAT_IN_PKTS_OK", 11),
]);

define_id_kind!(MacsecSaAttr, "sai_macsec_sa_attr_t", SaiObjectType::MacsecSa, MacsecSaAttrId, [
    ("SAI_MACSEC_SA_ATTR_MACSEC_DIRECTION", 0),
    ("SAI_MACSEC_SA_ATTR_SC_ID", 1),
    ("SAI_MACSEC_SA_ATTR_AN", 2),
    ("SAI_MACSEC_SA_ATTR_CONFIGURED_EGRESS_XPN", 6),
    ("SAI_MACSEC_SA_ATTR_CURRENT_XPN", 7),
    ("SAI_MACSEC_SA_ATTR_MINIMUM_INGRESS_XPN", 8),
]);

define_id_kind!(AclCounterAttr, "sai_acl_counter_attr_t",
    SaiObjectType::AclCounter, AclCounterAttrId, [
    ("SAI_ACL_COUNTER_ATTR_TABLE_ID", 0),
    ("SAI_ACL_COUNTER_ATTR_ENABLE_PACKET_COUNT", 1),
    ("SAI_ACL_COUNTER_ATTR_ENABLE_BYTE_COUNT", 2),
    ("SAI_ACL_COUNTER_ATTR_PACKETS", 3),
    ("SAI_ACL_COUNTER_ATTR_BYTES", 4),
]);

define_id_kind!(PolicerStat, "sai_policer_stat_t", SaiObjectType::Policer, PolicerStatId, [
    ("SAI_POLICER_STAT_PACKETS", 0),
    ("SAI_POLICER_STAT_ATTR_BYTES", 1),
    ("SAI_POLICER_STAT_GREEN_PACKETS", 2),
    ("SAI_POLICER_STAT_GREEN_BYTES", 3),
    ("SAI_POLICER_STAT_YELLOW_PACKETS", 4),
    ("SAI_POLICER_STAT_YELLOW_BYTES", 5),
    ("SAI_POLICER_STAT_RED_PACKETS", 6),
    ("SAI_POLICER_STAT_RED_BYTES", 7),
]);

define_id_kind!(EniStat, "sai_eni_stat_t", SaiObjectType::Eni, EniStatId, [
    ("SAI_ENI_STAT_RX_BYTES", 0),
    ("SAI_ENI_STAT_RX_PACKETS", 1),
    ("SAI_ENI_STAT_TX_BYTES", 2),
    ("SAI_ENI_STAT_TX_PACKETS", 3),
    ("SAI_ENI_STAT_OUTBOUND_RX_BYTES", 4),
    ("SAI_ENI_STAT_OUTBOUND_RX_PACKETS", 5),
    ("SAI_ENI_STAT_INBOUND_RX_BYTES", 6),
    ("SAI_ENI_STAT_INBOUND_RX_PACKETS", 7),
    ("SAI_ENI_STAT_FLOW_CREATED", 8),
    ("SAI_ENI_STAT_FLOW_CREATE_FAILED", 9),
    ("SAI_ENI_STAT_FLOW_DELETED", 10),
]);

define_id_kind!(MeterBucketEntryStat, "sai_meter_bucket_entry_stat_t",
    SaiObjectType::MeterBucketEntry, MeterBucketEntryStatId, [
    ("SAI_METER_BUCKET_ENTRY_STAT_OUTBOUND_BYTES", 0),
    ("SAI_METER_BUCKET_ENTRY_STAT_INBOUND_BYTES", 1),
]);

define_id_kind!(SwitchAttr, "sai_switch_attr_t", SaiObjectType::Switch, SwitchAttrId, [
    ("SAI_SWITCH_ATTR_NUMBER_OF_ACTIVE_PORTS", 0),
    ("SAI_SWITCH_ATTR_DASH_CAPS_MAX_METER_BUCKET_COUNT_PER_ENI", 0x2000_0001),
]);
