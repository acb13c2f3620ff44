//! Observability: runtime counters and the metrics sink boundary.
//!
//! Orchestrator and translator code never touches counters directly; every
//! measurement flows through `MetricsEvent` and `MetricsSink`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventPerf, EventReport, SchemaCounters};
pub use sink::{
    CallKind, MetricsEvent, MetricsSink, WriteMode, WriteTarget, metrics_report,
    metrics_reset_all, with_metrics_sink,
};

/// Saturating conversion for row and call counts.
pub(crate) fn count_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}
