use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    sync::{Mutex, OnceLock, PoisonError},
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory counters and simple perf totals for operations.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) perf: EventPerf,
    pub(crate) schemas: BTreeMap<String, SchemaCounters>,
    pub(crate) since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            perf: EventPerf::default(),
            schemas: BTreeMap::new(),
            since_ms: now_millis(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Orchestrator entrypoints
    pub insert_calls: u64,
    pub insert_indexes_only_calls: u64,
    pub replace_calls: u64,

    // Write strategy
    pub single_writes: u64,
    pub bulk_writes: u64,
    pub updates: u64,

    // Rows handed to the sink
    pub structure_rows: u64,
    pub unique_rows: u64,
    pub index_rows: u64,

    // Translator
    pub expressions_compiled: u64,
    pub parameters_bound: u64,
}

///
/// SchemaCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct SchemaCounters {
    pub calls: u64,
    pub structure_rows: u64,
    pub unique_rows: u64,
    pub index_rows: u64,
}

///
/// EventPerf
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventPerf {
    pub call_micros_total: u128,
    pub call_micros_max: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the event state.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub perf: EventPerf,
    pub schemas: BTreeMap<String, SchemaCounters>,
    pub since_ms: u64,
}

static EVENT_STATE: OnceLock<Mutex<EventState>> = OnceLock::new();

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    let state = EVENT_STATE.get_or_init(|| Mutex::new(EventState::default()));
    let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);

    f(&mut guard)
}

/// Reset all counters and perf totals.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the current state.
pub(crate) fn report() -> EventReport {
    with_state_mut(|m| EventReport {
        ops: m.ops.clone(),
        perf: m.perf.clone(),
        schemas: m.schemas.clone(),
        since_ms: m.since_ms,
    })
}

/// Accumulate a duration and track a max.
pub(crate) fn add_micros(perf: &mut EventPerf, delta: u64) {
    perf.call_micros_total = perf.call_micros_total.saturating_add(u128::from(delta));
    if delta > perf.call_micros_max {
        perf.call_micros_max = delta;
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
