use crate::model::{IndexTableKind, StructureSchema};

///
/// SchemaField
///
/// One column of a physical table. Identity is (name, ordinal).
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SchemaField {
    pub ordinal: usize,
    pub name: &'static str,
}

impl SchemaField {
    #[must_use]
    pub const fn new(ordinal: usize, name: &'static str) -> Self {
        Self { ordinal, name }
    }
}

///
/// StructureFields
/// Column layout of the structure table.
///

pub struct StructureFields;

impl StructureFields {
    pub const ROW_ID: SchemaField = SchemaField::new(0, "RowId");
    pub const STRUCTURE_ID: SchemaField = SchemaField::new(1, "StructureId");
    pub const JSON: SchemaField = SchemaField::new(2, "Json");

    pub const ORDERED: &'static [SchemaField] = &[Self::ROW_ID, Self::STRUCTURE_ID, Self::JSON];
}

///
/// IndexFields
/// Column layout shared by every per-type index table.
///

pub struct IndexFields;

impl IndexFields {
    pub const ROW_ID: SchemaField = SchemaField::new(0, "RowId");
    pub const STRUCTURE_ID: SchemaField = SchemaField::new(1, "StructureId");
    pub const MEMBER_PATH: SchemaField = SchemaField::new(2, "MemberPath");
    pub const VALUE: SchemaField = SchemaField::new(3, "Value");
    pub const STRING_VALUE: SchemaField = SchemaField::new(4, "StringValue");

    pub const ORDERED: &'static [SchemaField] = &[
        Self::ROW_ID,
        Self::STRUCTURE_ID,
        Self::MEMBER_PATH,
        Self::VALUE,
        Self::STRING_VALUE,
    ];
}

///
/// UniqueFields
/// Column layout of the uniques table.
///

pub struct UniqueFields;

impl UniqueFields {
    pub const ROW_ID: SchemaField = SchemaField::new(0, "RowId");
    pub const STRUCTURE_ID: SchemaField = SchemaField::new(1, "StructureId");
    pub const UQ_STRUCTURE_ID: SchemaField = SchemaField::new(2, "UqStructureId");
    pub const UQ_MEMBER_PATH: SchemaField = SchemaField::new(3, "UqMemberPath");
    pub const UQ_VALUE: SchemaField = SchemaField::new(4, "UqValue");

    pub const ORDERED: &'static [SchemaField] = &[
        Self::ROW_ID,
        Self::STRUCTURE_ID,
        Self::UQ_STRUCTURE_ID,
        Self::UQ_MEMBER_PATH,
        Self::UQ_VALUE,
    ];
}

///
/// StorageSchema
///
/// Name and ordered column layout of one physical table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StorageSchema {
    name: String,
    fields: &'static [SchemaField],
}

impl StorageSchema {
    #[must_use]
    pub fn structures(schema: &StructureSchema) -> Self {
        Self {
            name: schema.structure_table_name(),
            fields: StructureFields::ORDERED,
        }
    }

    #[must_use]
    pub fn uniques(schema: &StructureSchema) -> Self {
        Self {
            name: schema.uniques_table_name(),
            fields: UniqueFields::ORDERED,
        }
    }

    #[must_use]
    pub fn indexes(schema: &StructureSchema, kind: IndexTableKind) -> Self {
        Self {
            name: schema.indexes_table_names().for_table(kind).to_string(),
            fields: IndexFields::ORDERED,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields ordered by ordinal.
    #[must_use]
    pub const fn fields(&self) -> &'static [SchemaField] {
        self.fields
    }

    /// Fields ordered by ordinal, minus the ones in `skip`.
    pub fn fields_except(&self, skip: &[SchemaField]) -> impl Iterator<Item = SchemaField> {
        self.fields
            .iter()
            .copied()
            .filter(move |field| !skip.contains(field))
    }
}
