use crate::{
    insert::sink::{Row, RowSource},
    model::{IndexRowShape, StorageSchema, Structure, StructureIndex, Unique, Value},
};
use std::{slice, vec};

///
/// StructuresReader
/// Forward-only rows for the structure table.
///

pub(crate) struct StructuresReader<'a> {
    storage_schema: StorageSchema,
    structures: slice::Iter<'a, Structure>,
    count: usize,
}

impl<'a> StructuresReader<'a> {
    pub(crate) fn new(storage_schema: StorageSchema, structures: &'a [Structure]) -> Self {
        Self {
            storage_schema,
            structures: structures.iter(),
            count: structures.len(),
        }
    }
}

impl Iterator for StructuresReader<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let structure = self.structures.next()?;

        Some(Row::new(vec![
            Value::Null,
            structure.id.to_value(),
            Value::Text(structure.data.clone()),
        ]))
    }
}

impl RowSource for StructuresReader<'_> {
    fn storage_schema(&self) -> &StorageSchema {
        &self.storage_schema
    }

    fn row_count(&self) -> usize {
        self.count
    }
}

///
/// UniquesReader
/// Forward-only rows for the uniques table.
///

pub(crate) struct UniquesReader<'a> {
    storage_schema: StorageSchema,
    uniques: vec::IntoIter<&'a Unique>,
    count: usize,
}

impl<'a> UniquesReader<'a> {
    pub(crate) fn new(storage_schema: StorageSchema, uniques: Vec<&'a Unique>) -> Self {
        let count = uniques.len();

        Self {
            storage_schema,
            uniques: uniques.into_iter(),
            count,
        }
    }
}

impl Iterator for UniquesReader<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let unique = self.uniques.next()?;
        let scoped_id = unique
            .scoped_structure_id()
            .map_or(Value::Null, |id| id.to_value());

        Some(Row::new(vec![
            Value::Null,
            unique.structure_id.to_value(),
            scoped_id,
            Value::Text(unique.path.clone()),
            unique.value.clone(),
        ]))
    }
}

impl RowSource for UniquesReader<'_> {
    fn storage_schema(&self) -> &StorageSchema {
        &self.storage_schema
    }

    fn row_count(&self) -> usize {
        self.count
    }
}

///
/// IndexesReader
///
/// Forward-only rows for one per-type index table.
/// Value-type rows carry the rendered value in `StringValue`; string and
/// text rows leave that slot null since the column is not mapped.
///

pub(crate) struct IndexesReader<'a> {
    storage_schema: StorageSchema,
    shape: IndexRowShape,
    indexes: vec::IntoIter<&'a StructureIndex>,
    count: usize,
}

impl<'a> IndexesReader<'a> {
    pub(crate) fn new(
        storage_schema: StorageSchema,
        shape: IndexRowShape,
        indexes: Vec<&'a StructureIndex>,
    ) -> Self {
        let count = indexes.len();

        Self {
            storage_schema,
            shape,
            indexes: indexes.into_iter(),
            count,
        }
    }

    pub(crate) const fn shape(&self) -> IndexRowShape {
        self.shape
    }
}

impl Iterator for IndexesReader<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let index = self.indexes.next()?;
        let string_value = if self.shape.writes_string_value() {
            Value::Text(index.value.to_string())
        } else {
            Value::Null
        };

        Some(Row::new(vec![
            Value::Null,
            index.structure_id.to_value(),
            Value::Text(index.path.clone()),
            index.value.clone(),
            string_value,
        ]))
    }
}

impl RowSource for IndexesReader<'_> {
    fn storage_schema(&self) -> &StorageSchema {
        &self.storage_schema
    }

    fn row_count(&self) -> usize {
        self.count
    }
}
