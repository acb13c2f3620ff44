//! Test-only sinks, fixtures and metrics capture.

mod fixtures;
mod sink;

pub(crate) use fixtures::*;
pub(crate) use sink::{CapturedEvent, CapturingMetricsSink, RecordingSink, SinkCall};
