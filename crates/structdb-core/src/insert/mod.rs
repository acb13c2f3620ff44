//! Module: insert
//! Responsibility: persist structure, unique and index rows with the cheapest
//! safe write strategy per batch and per data type.
//! Does not own: transactions, retries, or removal of prior index rows.
//! Boundary: callers hand over a prepared batch and a `WriteSink`.

mod group;
mod reader;
mod sink;


use crate::{
    DEFAULT_BULK_ESCALATION_THRESHOLD,
    config::InsertConfig,
    error::{ErrorOrigin, InternalError},
    insert::{
        group::{IndexWriteAction, IndexWriteActions, group_index_actions},
        reader::{IndexesReader, StructuresReader, UniquesReader},
    },
    model::{
        IndexFields, IndexRowShape, SchemaField, StorageSchema, Structure, StructureFields,
        StructureSchema, UniqueFields,
    },
    obs::{
        count_u64,
        sink::{CallKind, MetricsEvent, Span, WriteMode, WriteTarget, record},
    },
};
use std::{any::Any, thread};

// re-exports
pub use sink::{BulkWriter, Row, RowSource, WriteSink};

///
/// StructureInserter
///
/// Write orchestrator over one `WriteSink`.
///
/// Single vs bulk is decided strictly by count: one row goes through the
/// single-row call, more than one through a bulk writer. The advisory
/// `bulk_escalation_threshold` is carried for callers only.
///

pub struct StructureInserter<S> {
    sink: S,
    bulk_escalation_threshold: usize,
}

impl<S: WriteSink> StructureInserter<S> {
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self {
            sink,
            bulk_escalation_threshold: DEFAULT_BULK_ESCALATION_THRESHOLD,
        }
    }

    /// Construct from an optional sink, failing fast when it is absent.
    pub fn try_new(sink: Option<S>, config: &InsertConfig) -> Result<Self, InternalError> {
        let sink = sink
            .ok_or_else(|| InternalError::missing_collaborator(ErrorOrigin::Insert, "write sink"))?;

        Ok(Self {
            sink,
            bulk_escalation_threshold: config.bulk_escalation_threshold,
        })
    }

    #[must_use]
    pub const fn bulk_escalation_threshold(&self) -> usize {
        self.bulk_escalation_threshold
    }

    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Persist structure rows, unique rows and every index row of `structures`.
    ///
    /// Index grouping runs on one scoped worker while structures and uniques
    /// are written; the worker is joined before any index write starts.
    pub fn insert(
        &mut self,
        schema: &StructureSchema,
        structures: &[Structure],
    ) -> Result<(), InternalError> {
        let mut span = Span::new(CallKind::Insert, schema.name());
        span.set_rows(count_u64(structures.len()));

        tracing::debug!(
            schema = schema.name(),
            structures = structures.len(),
            "inserting structure batch"
        );

        let (written, grouped) = thread::scope(|scope| {
            let worker = scope.spawn(move || group_index_actions(schema, structures));

            let written = self
                .insert_structures(schema, structures)
                .and_then(|()| self.insert_uniques(schema, structures));

            (written, worker.join())
        });

        written?;
        let actions = joined_actions(grouped)?;

        self.insert_indexes(schema, actions)
    }

    /// Write only index rows, e.g. when re-indexing existing structures.
    pub fn insert_indexes_only(
        &mut self,
        schema: &StructureSchema,
        structures: &[Structure],
    ) -> Result<(), InternalError> {
        let mut span = Span::new(CallKind::InsertIndexesOnly, schema.name());
        span.set_rows(count_u64(structures.len()));

        let actions = group_index_actions(schema, structures);

        self.insert_indexes(schema, actions)
    }

    /// Update one structure row in place and rewrite its uniques and indexes.
    ///
    /// Prior unique and index rows must already have been removed by the caller.
    pub fn replace(
        &mut self,
        schema: &StructureSchema,
        structure: &Structure,
    ) -> Result<(), InternalError> {
        let mut span = Span::new(CallKind::Replace, schema.name());
        span.set_rows(1);

        let structures = std::slice::from_ref(structure);

        self.sink.single_update_structure(structure, schema)?;
        record_write(schema, WriteTarget::Structures, WriteMode::Update, 1);

        self.insert_uniques(schema, structures)?;

        let actions = group_index_actions(schema, structures);

        self.insert_indexes(schema, actions)
    }

    fn insert_structures(
        &mut self,
        schema: &StructureSchema,
        structures: &[Structure],
    ) -> Result<(), InternalError> {
        match structures {
            [] => Ok(()),
            [structure] => {
                self.sink.single_insert_structure(structure, schema)?;
                record_write(schema, WriteTarget::Structures, WriteMode::Single, 1);

                Ok(())
            }
            _ => {
                let mut reader =
                    StructuresReader::new(StorageSchema::structures(schema), structures);
                self.bulk_write(&mut reader, &[StructureFields::ROW_ID])?;
                record_write(
                    schema,
                    WriteTarget::Structures,
                    WriteMode::Bulk,
                    structures.len(),
                );

                Ok(())
            }
        }
    }

    fn insert_uniques(
        &mut self,
        schema: &StructureSchema,
        structures: &[Structure],
    ) -> Result<(), InternalError> {
        let uniques: Vec<_> = structures.iter().flat_map(|s| s.uniques.iter()).collect();

        match uniques.len() {
            0 => Ok(()),
            1 => {
                self.sink.single_insert_unique(uniques[0], schema)?;
                record_write(schema, WriteTarget::Uniques, WriteMode::Single, 1);

                Ok(())
            }
            _ => {
                let count = uniques.len();
                let mut reader = UniquesReader::new(StorageSchema::uniques(schema), uniques);
                self.bulk_write(&mut reader, &[UniqueFields::ROW_ID])?;
                record_write(schema, WriteTarget::Uniques, WriteMode::Bulk, count);

                Ok(())
            }
        }
    }

    /// Execute grouped index actions one after another on this thread.
    fn insert_indexes(
        &mut self,
        schema: &StructureSchema,
        actions: IndexWriteActions<'_>,
    ) -> Result<(), InternalError> {
        if actions.is_empty() {
            return Ok(());
        }

        for (code, action) in actions {
            let rows = action.row_count();
            let mode = match &action {
                IndexWriteAction::NoOp => continue,
                IndexWriteAction::SingleInsert { .. } => WriteMode::Single,
                IndexWriteAction::BulkInsert { .. } => WriteMode::Bulk,
            };

            tracing::debug!(
                schema = schema.name(),
                data_type = %code,
                rows,
                ?mode,
                "writing index group"
            );

            self.execute_index_action(action)?;
            record_write(schema, WriteTarget::Indexes(code), mode, rows);
        }

        Ok(())
    }

    fn execute_index_action(&mut self, action: IndexWriteAction<'_>) -> Result<(), InternalError> {
        match action {
            IndexWriteAction::NoOp => Ok(()),
            IndexWriteAction::SingleInsert {
                table,
                shape: IndexRowShape::ValueType,
                index,
            } => self.sink.single_insert_value_type_index(index, &table),
            IndexWriteAction::SingleInsert {
                table,
                shape: IndexRowShape::String | IndexRowShape::Text,
                index,
            } => self.sink.single_insert_string_type_index(index, &table),
            IndexWriteAction::BulkInsert {
                storage_schema,
                shape,
                indexes,
            } => {
                let mut reader = IndexesReader::new(storage_schema, shape, indexes);
                let skip = index_fields_to_skip(reader.shape());

                self.bulk_write(&mut reader, skip)
            }
        }
    }

    /// Stream one row source through a fresh bulk writer.
    /// Columns are mapped 1:1 by name, minus `skip`.
    fn bulk_write(
        &mut self,
        rows: &mut dyn RowSource,
        skip: &[SchemaField],
    ) -> Result<(), InternalError> {
        let count = rows.row_count();
        if count == 0 {
            return Ok(());
        }

        let table = rows.storage_schema().name().to_string();
        let fields: Vec<_> = rows.storage_schema().fields_except(skip).collect();

        let mut writer = self.sink.bulk_writer()?;
        writer.set_destination_table(&table);
        writer.set_batch_size(count);
        for field in fields {
            writer.add_column_mapping(field.name, field.name);
        }

        writer.write(rows)
    }
}

const VALUE_TYPE_SKIPPED_FIELDS: &[SchemaField] = &[IndexFields::ROW_ID];
const STRING_TYPE_SKIPPED_FIELDS: &[SchemaField] =
    &[IndexFields::ROW_ID, IndexFields::STRING_VALUE];

const fn index_fields_to_skip(shape: IndexRowShape) -> &'static [SchemaField] {
    if shape.writes_string_value() {
        VALUE_TYPE_SKIPPED_FIELDS
    } else {
        STRING_TYPE_SKIPPED_FIELDS
    }
}

/// Surface the grouping worker's outcome; a panic becomes a concurrency failure.
fn joined_actions<'a>(
    joined: thread::Result<IndexWriteActions<'a>>,
) -> Result<IndexWriteActions<'a>, InternalError> {
    joined.map_err(|payload| {
        InternalError::concurrency_failure(format!(
            "index grouping task failed: {}",
            panic_message(payload.as_ref())
        ))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

fn record_write(schema: &StructureSchema, target: WriteTarget, mode: WriteMode, rows: usize) {
    record(MetricsEvent::Write {
        schema: schema.name(),
        target,
        mode,
        rows: count_u64(rows),
    });
}
