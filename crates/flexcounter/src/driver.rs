//! Collaborator interfaces consumed by the flex counter engine.
//!
//! The engine never talks to hardware, the counters database or the script
//! runner directly. These traits abstract those dependencies so contexts can
//! be driven by a vendor SAI, a redis-backed sink, or test doubles.

use sonic_sai::{
    ObjectKey, RawSaiObjectId, SaiError, SaiObjectType, SaiResult, SaiStatus, StatCapability,
    StatsMode,
};

/// Stats access to the switch driver.
///
/// All calls are synchronous and may block on driver I/O.
pub trait StatsDriver: Send + Sync {
    /// Reads `ids` of one object; returns one value per id.
    fn get_stats(
        &self,
        object_type: SaiObjectType,
        rid: RawSaiObjectId,
        ids: &[i32],
    ) -> SaiResult<Vec<u64>>;

    /// Clears `ids` of one object.
    fn clear_stats(
        &self,
        object_type: SaiObjectType,
        rid: RawSaiObjectId,
        ids: &[i32],
    ) -> SaiResult<()>;

    /// Reads `ids` for every key in one call.
    ///
    /// `statuses` has one slot per key; `counters` is row-major
    /// (`keys.len() * ids.len()`). A failed call leaves both untouched.
    fn bulk_get_stats(
        &self,
        object_type: SaiObjectType,
        keys: &[ObjectKey],
        ids: &[i32],
        mode: StatsMode,
        statuses: &mut [SaiStatus],
        counters: &mut [u64],
    ) -> SaiResult<()>;

    /// Lists the stats `object_type` supports.
    ///
    /// A call whose `capacity` is smaller than the list answers
    /// [`SaiError::BufferOverflow`] with the required size.
    fn query_stats_capability(
        &self,
        switch_id: RawSaiObjectId,
        object_type: SaiObjectType,
        capacity: usize,
    ) -> SaiResult<Vec<StatCapability>>;

    /// Reads attributes of one object, already serialized.
    fn get_attributes(
        &self,
        object_type: SaiObjectType,
        rid: RawSaiObjectId,
        ids: &[i32],
    ) -> SaiResult<Vec<String>>;

    /// Returns the switch an object belongs to.
    fn switch_id(&self, rid: RawSaiObjectId) -> RawSaiObjectId;
}

/// Runs the two-phase capability query: size first, then the list.
pub fn query_capabilities(
    driver: &dyn StatsDriver,
    switch_id: RawSaiObjectId,
    object_type: SaiObjectType,
) -> SaiResult<Vec<StatCapability>> {
    match driver.query_stats_capability(switch_id, object_type, 0) {
        Ok(list) => Ok(list),
        Err(SaiError::BufferOverflow { required }) => {
            driver.query_stats_capability(switch_id, object_type, required)
        }
        Err(e) => Err(e),
    }
}

/// Destination of collected rows (the counters table).
pub trait CounterSink: Send + Sync {
    /// Writes one row of `(field, value)` pairs under `key`.
    fn write_row(&self, key: &str, fields: &[(String, String)]);

    /// Commits rows written since the last flush.
    fn flush(&self);
}

/// Executes counter plugins (post-processing scripts).
pub trait PluginRunner: Send + Sync {
    /// Runs `plugin` over the given object ids. Fire-and-forget.
    fn run(&self, plugin: &str, object_ids: &[String], args: &[String]);
}
