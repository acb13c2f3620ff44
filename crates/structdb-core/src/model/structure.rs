use crate::model::{DataTypeCode, Value};
use derive_more::Deref;
use std::fmt::{self, Display};
use ulid::Ulid;

///
/// StructureId
///
/// Identity of one stored structure: a database-assigned integer identity
/// or a client-generated GUID-like key.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum StructureId {
    Identity(i64),
    Guid(Ulid),
}

impl StructureId {
    #[must_use]
    pub const fn to_value(self) -> Value {
        match self {
            Self::Identity(id) => Value::Int(id),
            Self::Guid(id) => Value::Guid(id),
        }
    }
}

impl Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity(id) => write!(f, "{id}"),
            Self::Guid(id) => write!(f, "{id}"),
        }
    }
}

///
/// StructureIndex
///
/// One indexable scalar extracted from a structure, addressed by member path.
/// Values reached through collections produce one entry per element.
///

#[derive(Clone, Debug, PartialEq)]
pub struct StructureIndex {
    pub structure_id: StructureId,
    pub path: String,
    pub value: Value,
    pub data_type_code: DataTypeCode,
}

impl StructureIndex {
    #[must_use]
    pub fn new(
        structure_id: StructureId,
        path: impl Into<String>,
        value: impl Into<Value>,
        data_type_code: DataTypeCode,
    ) -> Self {
        Self {
            structure_id,
            path: path.into(),
            value: value.into(),
            data_type_code,
        }
    }
}

///
/// UniqueMode
///
/// Scope of a uniqueness constraint. Per-instance uniques are scoped by the
/// owning structure id; per-type uniques span the whole structure set.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UniqueMode {
    PerInstance,
    PerType,
}

///
/// Unique
///

#[derive(Clone, Debug, Deref, PartialEq)]
pub struct Unique {
    #[deref]
    index: StructureIndex,
    mode: UniqueMode,
}

impl Unique {
    #[must_use]
    pub const fn new(index: StructureIndex, mode: UniqueMode) -> Self {
        Self { index, mode }
    }

    #[must_use]
    pub const fn index(&self) -> &StructureIndex {
        &self.index
    }

    #[must_use]
    pub const fn mode(&self) -> UniqueMode {
        self.mode
    }

    /// Structure id written into the scoped-uniqueness column, if any.
    #[must_use]
    pub const fn scoped_structure_id(&self) -> Option<StructureId> {
        match self.mode {
            UniqueMode::PerInstance => Some(self.index.structure_id),
            UniqueMode::PerType => None,
        }
    }
}

///
/// Structure
///
/// One document instance prepared for writing: identity, serialized payload,
/// extracted indexes and uniques. Built by an external serializer right
/// before a write call.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Structure {
    pub id: StructureId,
    pub data: String,
    pub indexes: Vec<StructureIndex>,
    pub uniques: Vec<Unique>,
}

impl Structure {
    #[must_use]
    pub fn new(id: StructureId, data: impl Into<String>) -> Self {
        Self {
            id,
            data: data.into(),
            indexes: Vec::new(),
            uniques: Vec::new(),
        }
    }

    /// Append one index entry owned by this structure.
    #[must_use]
    pub fn with_index(
        mut self,
        path: impl Into<String>,
        value: impl Into<Value>,
        data_type_code: DataTypeCode,
    ) -> Self {
        self.indexes
            .push(StructureIndex::new(self.id, path, value, data_type_code));
        self
    }

    /// Append one unique entry owned by this structure.
    #[must_use]
    pub fn with_unique(
        mut self,
        path: impl Into<String>,
        value: impl Into<Value>,
        data_type_code: DataTypeCode,
        mode: UniqueMode,
    ) -> Self {
        let index = StructureIndex::new(self.id, path, value, data_type_code);
        self.uniques.push(Unique::new(index, mode));
        self
    }
}
