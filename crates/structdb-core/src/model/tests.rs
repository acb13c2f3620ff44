use crate::model::{
    DataTypeCode, IndexAccessor, IndexFields, IndexRowShape, IndexTableKind, SchemaField,
    StorageSchema, Structure, StructureFields, StructureId, StructureSchema, UniqueFields,
    UniqueMode, Value,
};
use ulid::Ulid;

fn schema() -> StructureSchema {
    StructureSchema::new(
        "Customer",
        vec![
            IndexAccessor::new("Name", DataTypeCode::String),
            IndexAccessor::unique("CustomerNo", DataTypeCode::IntegerNumber, UniqueMode::PerType),
        ],
    )
}

#[test]
fn table_names_are_schema_name_plus_suffix() {
    let schema = schema();
    let names = schema.indexes_table_names();

    assert_eq!(schema.structure_table_name(), "CustomerStructure");
    assert_eq!(schema.uniques_table_name(), "CustomerUniques");
    assert_eq!(
        names.for_table(IndexTableKind::Integers),
        "CustomerIntegers"
    );
    assert_eq!(names.for_table(IndexTableKind::Texts), "CustomerTexts");
    assert_eq!(names.all().len(), IndexTableKind::ALL.len());
}

#[test]
fn enum_routes_to_strings_table() {
    let names = schema().indexes_table_names();

    assert_eq!(DataTypeCode::Enum.index_table(), IndexTableKind::Strings);
    assert_eq!(
        names.for_data_type(DataTypeCode::Enum),
        names.for_data_type(DataTypeCode::String)
    );
    assert_ne!(
        names.for_data_type(DataTypeCode::Text),
        names.for_data_type(DataTypeCode::String)
    );
}

#[test]
fn value_type_classification_matches_row_shapes() {
    let value_types: Vec<_> = DataTypeCode::ALL
        .into_iter()
        .filter(|code| code.is_value_type())
        .collect();

    assert_eq!(
        value_types,
        vec![
            DataTypeCode::IntegerNumber,
            DataTypeCode::FractalNumber,
            DataTypeCode::Bool,
            DataTypeCode::DateTime,
            DataTypeCode::Guid,
        ]
    );
    assert_eq!(
        IndexTableKind::Texts.row_shape(),
        IndexRowShape::Text
    );
    assert!(!IndexRowShape::String.writes_string_value());
}

#[test]
fn schema_field_identity_is_name_and_ordinal() {
    assert_eq!(StructureFields::ROW_ID, IndexFields::ROW_ID);
    assert_eq!(UniqueFields::ROW_ID, SchemaField::new(0, "RowId"));
    assert_ne!(IndexFields::VALUE, SchemaField::new(4, "Value"));
    assert_ne!(IndexFields::VALUE, SchemaField::new(3, "UqValue"));
}

#[test]
fn storage_fields_are_ordered_by_ordinal() {
    for fields in [
        StructureFields::ORDERED,
        IndexFields::ORDERED,
        UniqueFields::ORDERED,
    ] {
        for (i, field) in fields.iter().enumerate() {
            assert_eq!(field.ordinal, i, "{} out of order", field.name);
        }
    }
}

#[test]
fn fields_except_skips_by_identity() {
    let storage = StorageSchema::indexes(&schema(), IndexTableKind::Strings);
    let names: Vec<_> = storage
        .fields_except(&[IndexFields::ROW_ID, IndexFields::STRING_VALUE])
        .map(|field| field.name)
        .collect();

    assert_eq!(storage.name(), "CustomerStrings");
    assert_eq!(names, vec!["StructureId", "MemberPath", "Value"]);
}

#[test]
fn unique_accessors_filter_declared_uniques() {
    let schema = schema();
    let paths: Vec<_> = schema.unique_accessors().map(|a| a.path.as_str()).collect();

    assert_eq!(paths, vec!["CustomerNo"]);
}

#[test]
fn structure_builders_stamp_owner_id() {
    let id = StructureId::Guid(Ulid::from(42u128));
    let structure = Structure::new(id, "{}")
        .with_index("Name", "Ada", DataTypeCode::String)
        .with_unique("CustomerNo", 7, DataTypeCode::IntegerNumber, UniqueMode::PerInstance);

    assert_eq!(structure.indexes[0].structure_id, id);
    assert_eq!(structure.uniques[0].structure_id, id);
    assert_eq!(structure.uniques[0].scoped_structure_id(), Some(id));
    assert_eq!(structure.uniques[0].value, Value::Int(7));
}

#[test]
fn per_type_unique_has_no_scoped_id() {
    let structure = Structure::new(StructureId::Identity(1), "{}").with_unique(
        "Email",
        "a@b.c",
        DataTypeCode::String,
        UniqueMode::PerType,
    );

    assert_eq!(structure.uniques[0].scoped_structure_id(), None);
}

#[test]
fn list_values_render_comma_separated() {
    let value = Value::List(vec![Value::Int(1), Value::Text("a".to_string())]);

    assert_eq!(value.to_string(), "1,a");
    assert_eq!(Value::Null.to_string(), "");
}

#[test]
fn try_new_rejects_duplicate_paths_and_empty_names() {
    use crate::error::{ErrorClass, ErrorOrigin};

    let duplicate = StructureSchema::try_new(
        "Customer",
        vec![
            IndexAccessor::new("Name", DataTypeCode::String),
            IndexAccessor::new("Name", DataTypeCode::Text),
        ],
    )
    .expect_err("duplicate path");
    assert_eq!(duplicate.class, ErrorClass::InvariantViolation);
    assert_eq!(duplicate.origin, ErrorOrigin::Model);

    assert!(StructureSchema::try_new("", Vec::new()).is_err());
    assert_eq!(
        StructureSchema::try_new("Customer", schema().index_accessors().to_vec())
            .expect("valid schema"),
        schema()
    );
}
