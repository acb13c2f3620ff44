//! Module: insert::group
//! Responsibility: partition a batch's index entries into per-type write actions.
//! Does not own: sink calls; the orchestrator dispatches the returned actions.
//! Boundary: runs on the grouping worker and must stay free of I/O.

use crate::model::{
    DataTypeCode, IndexRowShape, IndexesTableNames, StorageSchema, Structure, StructureIndex,
    StructureSchema,
};
use std::collections::BTreeMap;

///
/// IndexWriteAction
///
/// Write decision for one data-type group.
/// Empty groups are `NoOp`, single entries use the single-row path, and
/// larger groups stream through a bulk writer.
///

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum IndexWriteAction<'a> {
    NoOp,
    SingleInsert {
        table: String,
        shape: IndexRowShape,
        index: &'a StructureIndex,
    },
    BulkInsert {
        storage_schema: StorageSchema,
        shape: IndexRowShape,
        indexes: Vec<&'a StructureIndex>,
    },
}

impl IndexWriteAction<'_> {
    pub(crate) const fn has_data(&self) -> bool {
        !matches!(self, Self::NoOp)
    }

    pub(crate) fn row_count(&self) -> usize {
        match self {
            Self::NoOp => 0,
            Self::SingleInsert { .. } => 1,
            Self::BulkInsert { indexes, .. } => indexes.len(),
        }
    }
}

///
/// IndexWriteActions
///
/// Grouped actions keyed by data type, iterated in `DataTypeCode` order so
/// dispatch order is independent of input order.
///

#[derive(Debug, Default)]
pub(crate) struct IndexWriteActions<'a> {
    actions: BTreeMap<DataTypeCode, IndexWriteAction<'a>>,
}

impl<'a> IndexWriteActions<'a> {
    pub(crate) fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, code: DataTypeCode) -> Option<&IndexWriteAction<'a>> {
        self.actions.get(&code)
    }

    #[cfg(test)]
    pub(crate) fn codes(&self) -> Vec<DataTypeCode> {
        self.actions.keys().copied().collect()
    }
}

impl<'a> IntoIterator for IndexWriteActions<'a> {
    type Item = (DataTypeCode, IndexWriteAction<'a>);
    type IntoIter = std::collections::btree_map::IntoIter<DataTypeCode, IndexWriteAction<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.into_iter()
    }
}

/// Group every index entry of `structures` into per-type write actions.
///
/// String and enum groups are merged into one strings-table action; the enum
/// group is dropped once merged.
pub(crate) fn group_index_actions<'a>(
    schema: &StructureSchema,
    structures: &'a [Structure],
) -> IndexWriteActions<'a> {
    // Phase 1: partition by data type.
    let mut groups: BTreeMap<DataTypeCode, Vec<&'a StructureIndex>> = BTreeMap::new();
    for index in structures.iter().flat_map(|s| s.indexes.iter()) {
        groups.entry(index.data_type_code).or_default().push(index);
    }

    // Phase 2: fold enums into strings when both are present.
    if groups.contains_key(&DataTypeCode::String)
        && let Some(enums) = groups.remove(&DataTypeCode::Enum)
        && let Some(strings) = groups.get_mut(&DataTypeCode::String)
    {
        strings.extend(enums);
    }

    // Phase 3: one action per non-empty group.
    let tables = schema.indexes_table_names();
    let actions = groups
        .into_iter()
        .map(|(code, indexes)| (code, action_for_group(schema, &tables, code, indexes)))
        .filter(|(_, action)| action.has_data())
        .collect();

    IndexWriteActions { actions }
}

fn action_for_group<'a>(
    schema: &StructureSchema,
    tables: &IndexesTableNames,
    code: DataTypeCode,
    indexes: Vec<&'a StructureIndex>,
) -> IndexWriteAction<'a> {
    let kind = code.index_table();
    let shape = kind.row_shape();

    match indexes.len() {
        0 => IndexWriteAction::NoOp,
        1 => IndexWriteAction::SingleInsert {
            table: tables.for_table(kind).to_string(),
            shape,
            index: indexes[0],
        },
        _ => IndexWriteAction::BulkInsert {
            storage_schema: StorageSchema::indexes(schema, kind),
            shape,
            indexes,
        },
    }
}
