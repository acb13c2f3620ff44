use crate::model::{DataTypeCode, IndexAccessor, Structure, StructureId, StructureSchema, UniqueMode};

pub(crate) const CUSTOMER: &str = "Customer";

/// Schema with one string, one integer and one per-type unique accessor.
pub(crate) fn customer_schema() -> StructureSchema {
    StructureSchema::new(
        CUSTOMER,
        vec![
            IndexAccessor::new("Name", DataTypeCode::String),
            IndexAccessor::new("Age", DataTypeCode::IntegerNumber),
            IndexAccessor::unique("CustomerNo", DataTypeCode::IntegerNumber, UniqueMode::PerType),
        ],
    )
}

pub(crate) fn customer(id: i64) -> Structure {
    Structure::new(
        StructureId::Identity(id),
        format!(r#"{{"Name":"Customer {id}","Age":{age}}}"#, age = 20 + id),
    )
}

/// Customer carrying exactly one string and one integer index.
pub(crate) fn indexed_customer(id: i64) -> Structure {
    customer(id)
        .with_index("Name", format!("Customer {id}"), DataTypeCode::String)
        .with_index("Age", 20 + id, DataTypeCode::IntegerNumber)
}

pub(crate) fn indexed_customers(count: i64) -> Vec<Structure> {
    (1..=count).map(indexed_customer).collect()
}
