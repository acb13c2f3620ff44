use crate::{
    error::InternalError,
    model::{SchemaField, StorageSchema, Structure, StructureIndex, StructureSchema, Unique, Value},
};
use derive_more::Deref;

///
/// Row
///
/// One row handed to a bulk writer, one value per storage field ordinal.
/// The row-id slot is always `Value::Null`; the backing engine assigns it.
///

#[derive(Clone, Debug, Deref, PartialEq)]
pub struct Row(Vec<Value>);

impl Row {
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn get(&self, field: SchemaField) -> Option<&Value> {
        self.0.get(field.ordinal)
    }
}

///
/// RowSource
///
/// Forward-only row adapter over one write batch.
/// Rows are produced lazily and can be read exactly once.
///

pub trait RowSource: Iterator<Item = Row> {
    fn storage_schema(&self) -> &StorageSchema;

    /// Total number of rows the source yields.
    fn row_count(&self) -> usize;
}

///
/// BulkWriter
///
/// One bulk-copy session: configure destination, batch size and column
/// mappings, then stream the full row source in a single call.
///

pub trait BulkWriter {
    fn set_destination_table(&mut self, table: &str);

    fn set_batch_size(&mut self, size: usize);

    fn add_column_mapping(&mut self, source: &str, destination: &str);

    fn write(&mut self, rows: &mut dyn RowSource) -> Result<(), InternalError>;
}

///
/// WriteSink
///
/// Write capability set consumed by the orchestrator.
/// Not required to be thread-safe; the orchestrator drives it from one thread
/// and never interleaves calls.
///

pub trait WriteSink {
    fn single_insert_structure(
        &mut self,
        structure: &Structure,
        schema: &StructureSchema,
    ) -> Result<(), InternalError>;

    fn single_update_structure(
        &mut self,
        structure: &Structure,
        schema: &StructureSchema,
    ) -> Result<(), InternalError>;

    fn single_insert_unique(
        &mut self,
        unique: &Unique,
        schema: &StructureSchema,
    ) -> Result<(), InternalError>;

    fn single_insert_value_type_index(
        &mut self,
        index: &StructureIndex,
        table: &str,
    ) -> Result<(), InternalError>;

    fn single_insert_string_type_index(
        &mut self,
        index: &StructureIndex,
        table: &str,
    ) -> Result<(), InternalError>;

    fn bulk_writer(&mut self) -> Result<Box<dyn BulkWriter + '_>, InternalError>;
}

impl<T: WriteSink + ?Sized> WriteSink for &mut T {
    fn single_insert_structure(
        &mut self,
        structure: &Structure,
        schema: &StructureSchema,
    ) -> Result<(), InternalError> {
        (**self).single_insert_structure(structure, schema)
    }

    fn single_update_structure(
        &mut self,
        structure: &Structure,
        schema: &StructureSchema,
    ) -> Result<(), InternalError> {
        (**self).single_update_structure(structure, schema)
    }

    fn single_insert_unique(
        &mut self,
        unique: &Unique,
        schema: &StructureSchema,
    ) -> Result<(), InternalError> {
        (**self).single_insert_unique(unique, schema)
    }

    fn single_insert_value_type_index(
        &mut self,
        index: &StructureIndex,
        table: &str,
    ) -> Result<(), InternalError> {
        (**self).single_insert_value_type_index(index, table)
    }

    fn single_insert_string_type_index(
        &mut self,
        index: &StructureIndex,
        table: &str,
    ) -> Result<(), InternalError> {
        (**self).single_insert_string_type_index(index, table)
    }

    fn bulk_writer(&mut self) -> Result<Box<dyn BulkWriter + '_>, InternalError> {
        (**self).bulk_writer()
    }
}
