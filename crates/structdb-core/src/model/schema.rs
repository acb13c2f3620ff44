use crate::{
    error::InternalError,
    model::{DataTypeCode, IndexTableKind, UniqueMode},
};
use std::collections::BTreeSet;

///
/// IndexAccessor
/// One indexable member path declared by a structure schema.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexAccessor {
    pub path: String,
    pub data_type_code: DataTypeCode,
    pub unique: Option<UniqueMode>,
}

impl IndexAccessor {
    #[must_use]
    pub fn new(path: impl Into<String>, data_type_code: DataTypeCode) -> Self {
        Self {
            path: path.into(),
            data_type_code,
            unique: None,
        }
    }

    #[must_use]
    pub fn unique(path: impl Into<String>, data_type_code: DataTypeCode, mode: UniqueMode) -> Self {
        Self {
            path: path.into(),
            data_type_code,
            unique: Some(mode),
        }
    }
}

///
/// StructureSchema
///
/// Per-document-type contract: ordered indexable paths and the physical
/// table names derived from the type name.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StructureSchema {
    name: String,
    index_accessors: Vec<IndexAccessor>,
}

impl StructureSchema {
    #[must_use]
    pub fn new(name: impl Into<String>, index_accessors: Vec<IndexAccessor>) -> Self {
        Self {
            name: name.into(),
            index_accessors,
        }
    }

    /// Construct a schema, rejecting an empty name or a member path listed twice.
    pub fn try_new(
        name: impl Into<String>,
        index_accessors: Vec<IndexAccessor>,
    ) -> Result<Self, InternalError> {
        let schema = Self::new(name, index_accessors);
        if schema.name.is_empty() {
            return Err(InternalError::model_invariant("schema name is empty"));
        }

        let mut seen = BTreeSet::new();
        for accessor in &schema.index_accessors {
            if !seen.insert(accessor.path.as_str()) {
                return Err(InternalError::model_invariant(format!(
                    "schema '{}' lists member path '{}' more than once",
                    schema.name, accessor.path
                )));
            }
        }

        Ok(schema)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn index_accessors(&self) -> &[IndexAccessor] {
        &self.index_accessors
    }

    pub fn unique_accessors(&self) -> impl Iterator<Item = &IndexAccessor> {
        self.index_accessors.iter().filter(|a| a.unique.is_some())
    }

    #[must_use]
    pub fn structure_table_name(&self) -> String {
        format!("{}Structure", self.name)
    }

    #[must_use]
    pub fn uniques_table_name(&self) -> String {
        format!("{}Uniques", self.name)
    }

    #[must_use]
    pub fn indexes_table_names(&self) -> IndexesTableNames {
        IndexesTableNames::new(&self.name)
    }
}

///
/// IndexesTableNames
/// Physical index table names for one structure schema, one per table kind.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexesTableNames {
    names: [String; 7],
}

impl IndexesTableNames {
    #[must_use]
    pub fn new(schema_name: &str) -> Self {
        Self {
            names: IndexTableKind::ALL.map(|kind| format!("{schema_name}{}", kind.suffix())),
        }
    }

    #[must_use]
    pub fn for_table(&self, kind: IndexTableKind) -> &str {
        &self.names[kind as usize]
    }

    #[must_use]
    pub fn for_data_type(&self, code: DataTypeCode) -> &str {
        self.for_table(code.index_table())
    }

    #[must_use]
    pub fn all(&self) -> &[String] {
        &self.names
    }
}
