use crate::{
    error::InternalError,
    insert::{BulkWriter, Row, RowSource, WriteSink},
    model::{Structure, StructureId, StructureIndex, StructureSchema, Unique},
    obs::{MetricsEvent, MetricsSink, WriteMode, WriteTarget},
};
use std::cell::RefCell;

///
/// SinkCall
/// One call observed by the recording sink, in arrival order.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SinkCall {
    InsertStructure {
        id: StructureId,
        table: String,
    },
    UpdateStructure {
        id: StructureId,
        table: String,
    },
    InsertUnique {
        path: String,
        table: String,
    },
    InsertValueTypeIndex {
        path: String,
        table: String,
    },
    InsertStringTypeIndex {
        path: String,
        table: String,
    },
    Bulk {
        table: String,
        batch_size: usize,
        mappings: Vec<(String, String)>,
        rows: Vec<Row>,
    },
}

impl SinkCall {
    pub(crate) const fn is_bulk(&self) -> bool {
        matches!(self, Self::Bulk { .. })
    }

    pub(crate) fn table(&self) -> &str {
        match self {
            Self::InsertStructure { table, .. }
            | Self::UpdateStructure { table, .. }
            | Self::InsertUnique { table, .. }
            | Self::InsertValueTypeIndex { table, .. }
            | Self::InsertStringTypeIndex { table, .. }
            | Self::Bulk { table, .. } => table,
        }
    }
}

///
/// RecordingSink
///
/// In-memory `WriteSink` recording every call. Fails with a write failure
/// when a call targets `fail_table`.
///

#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub(crate) calls: Vec<SinkCall>,
    pub(crate) fail_table: Option<String>,
}

impl RecordingSink {
    pub(crate) fn failing_on(table: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            fail_table: Some(table.into()),
        }
    }

    pub(crate) fn bulk_calls(&self) -> Vec<&SinkCall> {
        self.calls.iter().filter(|call| call.is_bulk()).collect()
    }

    pub(crate) fn single_calls(&self) -> Vec<&SinkCall> {
        self.calls.iter().filter(|call| !call.is_bulk()).collect()
    }

    pub(crate) fn calls_for(&self, table: &str) -> Vec<&SinkCall> {
        self.calls.iter().filter(|call| call.table() == table).collect()
    }

    fn push(&mut self, call: SinkCall) -> Result<(), InternalError> {
        push_call(&mut self.calls, self.fail_table.as_deref(), call)
    }
}

fn push_call(
    calls: &mut Vec<SinkCall>,
    fail_table: Option<&str>,
    call: SinkCall,
) -> Result<(), InternalError> {
    if fail_table == Some(call.table()) {
        return Err(InternalError::write_failure(format!(
            "sink rejected write to {}",
            call.table()
        )));
    }
    calls.push(call);

    Ok(())
}

impl WriteSink for RecordingSink {
    fn single_insert_structure(
        &mut self,
        structure: &Structure,
        schema: &StructureSchema,
    ) -> Result<(), InternalError> {
        self.push(SinkCall::InsertStructure {
            id: structure.id,
            table: schema.structure_table_name(),
        })
    }

    fn single_update_structure(
        &mut self,
        structure: &Structure,
        schema: &StructureSchema,
    ) -> Result<(), InternalError> {
        self.push(SinkCall::UpdateStructure {
            id: structure.id,
            table: schema.structure_table_name(),
        })
    }

    fn single_insert_unique(
        &mut self,
        unique: &Unique,
        schema: &StructureSchema,
    ) -> Result<(), InternalError> {
        self.push(SinkCall::InsertUnique {
            path: unique.path.clone(),
            table: schema.uniques_table_name(),
        })
    }

    fn single_insert_value_type_index(
        &mut self,
        index: &StructureIndex,
        table: &str,
    ) -> Result<(), InternalError> {
        self.push(SinkCall::InsertValueTypeIndex {
            path: index.path.clone(),
            table: table.to_string(),
        })
    }

    fn single_insert_string_type_index(
        &mut self,
        index: &StructureIndex,
        table: &str,
    ) -> Result<(), InternalError> {
        self.push(SinkCall::InsertStringTypeIndex {
            path: index.path.clone(),
            table: table.to_string(),
        })
    }

    fn bulk_writer(&mut self) -> Result<Box<dyn BulkWriter + '_>, InternalError> {
        Ok(Box::new(RecordingBulkWriter {
            calls: &mut self.calls,
            fail_table: self.fail_table.as_deref(),
            table: String::new(),
            batch_size: 0,
            mappings: Vec::new(),
        }))
    }
}

///
/// RecordingBulkWriter
///

struct RecordingBulkWriter<'a> {
    calls: &'a mut Vec<SinkCall>,
    fail_table: Option<&'a str>,
    table: String,
    batch_size: usize,
    mappings: Vec<(String, String)>,
}

impl BulkWriter for RecordingBulkWriter<'_> {
    fn set_destination_table(&mut self, table: &str) {
        self.table = table.to_string();
    }

    fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size;
    }

    fn add_column_mapping(&mut self, source: &str, destination: &str) {
        self.mappings
            .push((source.to_string(), destination.to_string()));
    }

    fn write(&mut self, rows: &mut dyn RowSource) -> Result<(), InternalError> {
        let rows: Vec<Row> = rows.collect();

        push_call(
            self.calls,
            self.fail_table,
            SinkCall::Bulk {
                table: self.table.clone(),
                batch_size: self.batch_size,
                mappings: std::mem::take(&mut self.mappings),
                rows,
            },
        )
    }
}

///
/// CapturedEvent
/// Owned projection of the metrics events tests assert on.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum CapturedEvent {
    CallStart,
    CallFinish { rows_touched: u64 },
    Write {
        target: WriteTarget,
        mode: WriteMode,
        rows: u64,
    },
    ExpressionCompiled {
        members: u64,
        parameters: u64,
    },
}

///
/// CapturingMetricsSink
///

#[derive(Debug, Default)]
pub(crate) struct CapturingMetricsSink {
    pub(crate) events: RefCell<Vec<CapturedEvent>>,
}

impl MetricsSink for CapturingMetricsSink {
    fn record(&self, event: MetricsEvent<'_>) {
        let captured = match event {
            MetricsEvent::CallStart { .. } => CapturedEvent::CallStart,
            MetricsEvent::CallFinish { rows_touched, .. } => {
                CapturedEvent::CallFinish { rows_touched }
            }
            MetricsEvent::Write {
                target, mode, rows, ..
            } => CapturedEvent::Write { target, mode, rows },
            MetricsEvent::ExpressionCompiled {
                members,
                parameters,
                ..
            } => CapturedEvent::ExpressionCompiled {
                members,
                parameters,
            },
        };
        self.events.borrow_mut().push(captured);
    }
}
