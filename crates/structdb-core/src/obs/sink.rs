//! Metrics sink boundary.
//!
//! Core logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{
    model::DataTypeCode,
    obs::metrics::{self, EventReport},
};
use std::{cell::RefCell, rc::Rc, time::Instant};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// CallKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallKind {
    Insert,
    InsertIndexesOnly,
    Replace,
}

///
/// WriteMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteMode {
    Single,
    Bulk,
    Update,
}

///
/// WriteTarget
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteTarget {
    Structures,
    Uniques,
    Indexes(DataTypeCode),
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MetricsEvent<'a> {
    CallStart {
        kind: CallKind,
        schema: &'a str,
    },
    CallFinish {
        kind: CallKind,
        schema: &'a str,
        rows_touched: u64,
        elapsed_micros: u64,
    },
    Write {
        schema: &'a str,
        target: WriteTarget,
        mode: WriteMode,
        rows: u64,
    },
    ExpressionCompiled {
        members: u64,
        parameters: u64,
        sortings: u64,
        includes: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent<'_>);
}

/// GlobalMetricsSink
/// Default process-wide sink that writes into the global event state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        match event {
            MetricsEvent::CallStart { kind, schema } => {
                metrics::with_state_mut(|m| {
                    match kind {
                        CallKind::Insert => {
                            m.ops.insert_calls = m.ops.insert_calls.saturating_add(1);
                        }
                        CallKind::InsertIndexesOnly => {
                            m.ops.insert_indexes_only_calls =
                                m.ops.insert_indexes_only_calls.saturating_add(1);
                        }
                        CallKind::Replace => {
                            m.ops.replace_calls = m.ops.replace_calls.saturating_add(1);
                        }
                    }

                    let entry = m.schemas.entry(schema.to_string()).or_default();
                    entry.calls = entry.calls.saturating_add(1);
                });
            }

            MetricsEvent::CallFinish { elapsed_micros, .. } => {
                metrics::with_state_mut(|m| metrics::add_micros(&mut m.perf, elapsed_micros));
            }

            MetricsEvent::Write {
                schema,
                target,
                mode,
                rows,
            } => {
                metrics::with_state_mut(|m| {
                    match mode {
                        WriteMode::Single => {
                            m.ops.single_writes = m.ops.single_writes.saturating_add(1);
                        }
                        WriteMode::Bulk => m.ops.bulk_writes = m.ops.bulk_writes.saturating_add(1),
                        WriteMode::Update => m.ops.updates = m.ops.updates.saturating_add(1),
                    }

                    let entry = m.schemas.entry(schema.to_string()).or_default();
                    match target {
                        WriteTarget::Structures => {
                            m.ops.structure_rows = m.ops.structure_rows.saturating_add(rows);
                            entry.structure_rows = entry.structure_rows.saturating_add(rows);
                        }
                        WriteTarget::Uniques => {
                            m.ops.unique_rows = m.ops.unique_rows.saturating_add(rows);
                            entry.unique_rows = entry.unique_rows.saturating_add(rows);
                        }
                        WriteTarget::Indexes(_) => {
                            m.ops.index_rows = m.ops.index_rows.saturating_add(rows);
                            entry.index_rows = entry.index_rows.saturating_add(rows);
                        }
                    }
                });
            }

            MetricsEvent::ExpressionCompiled { parameters, .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.expressions_compiled = m.ops.expressions_compiled.saturating_add(1);
                    m.ops.parameters_bound = m.ops.parameters_bound.saturating_add(parameters);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent<'_>) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match override_sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state (counters + perf).
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish events for one orchestrator call.
/// Ensures finish accounting happens even on early return or unwind.

pub(crate) struct Span<'a> {
    kind: CallKind,
    schema: &'a str,
    started: Instant,
    rows: u64,
}

impl<'a> Span<'a> {
    #[must_use]
    pub(crate) fn new(kind: CallKind, schema: &'a str) -> Self {
        record(MetricsEvent::CallStart { kind, schema });

        Self {
            kind,
            schema,
            started: Instant::now(),
            rows: 0,
        }
    }

    pub(crate) const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        let elapsed_micros = u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);

        record(MetricsEvent::CallFinish {
            kind: self.kind,
            schema: self.schema,
            rows_touched: self.rows,
            elapsed_micros,
        });
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        insert::StructureInserter,
        model::{DataTypeCode, IndexAccessor, Structure, StructureId, StructureSchema},
        obs::metrics::{EventPerf, SchemaCounters, add_micros},
        test_support::{CapturedEvent, CapturingMetricsSink, RecordingSink},
    };

    #[test]
    fn global_sink_accumulates_insert_counters() {
        // Schema name is unique to this test; other tests share the global state.
        const LEDGER: &str = "LedgerEntry";

        let schema = StructureSchema::new(
            LEDGER,
            vec![IndexAccessor::new("Amount", DataTypeCode::IntegerNumber)],
        );
        let structures: Vec<_> = (1..=3)
            .map(|id| {
                Structure::new(StructureId::Identity(id), "{}").with_index(
                    "Amount",
                    id * 10,
                    DataTypeCode::IntegerNumber,
                )
            })
            .collect();

        metrics_reset_all();
        let mut inserter = StructureInserter::new(RecordingSink::default());
        inserter.insert(&schema, &structures).expect("insert");

        let report = metrics_report();
        assert_eq!(
            report.schemas.get(LEDGER),
            Some(&SchemaCounters {
                calls: 1,
                structure_rows: 3,
                unique_rows: 0,
                index_rows: 3,
            })
        );
        assert!(report.ops.insert_calls >= 1);
        assert!(report.ops.bulk_writes >= 2);
        assert!(report.ops.structure_rows >= 3);
        assert!(report.ops.index_rows >= 3);
    }

    #[test]
    fn add_micros_tracks_total_and_max() {
        let mut perf = EventPerf::default();

        add_micros(&mut perf, 40);
        add_micros(&mut perf, 15);

        assert_eq!(perf.call_micros_total, 55);
        assert_eq!(perf.call_micros_max, 40);
    }

    #[test]
    fn nested_overrides_restore_the_outer_sink() {
        let outer = Rc::new(CapturingMetricsSink::default());
        let inner = Rc::new(CapturingMetricsSink::default());

        with_metrics_sink(outer.clone(), || {
            with_metrics_sink(inner.clone(), || {
                let _span = Span::new(CallKind::Replace, "Customer");
            });
            let _span = Span::new(CallKind::Insert, "Customer");
        });

        assert_eq!(inner.events.borrow().len(), 2);
        assert_eq!(outer.events.borrow().len(), 2);
    }

    #[test]
    fn span_reports_rows_on_drop() {
        let capture = Rc::new(CapturingMetricsSink::default());

        with_metrics_sink(capture.clone(), || {
            let mut span = Span::new(CallKind::InsertIndexesOnly, "Customer");
            span.set_rows(12);
        });

        assert_eq!(
            *capture.events.borrow(),
            vec![
                CapturedEvent::CallStart,
                CapturedEvent::CallFinish { rows_touched: 12 },
            ]
        );
    }

    #[test]
    fn override_is_removed_after_panic() {
        let capture = Rc::new(CapturingMetricsSink::default());

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            with_metrics_sink(capture.clone(), || -> u8 { panic!("boom") })
        }));

        assert!(outcome.is_err());
        assert!(SINK_OVERRIDE.with(|cell| cell.borrow().is_none()));
    }
}
