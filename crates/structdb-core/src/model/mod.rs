//! Structure and index data model.
//!
//! Pure value types shared by the insert orchestrator and the query
//! translator:
//! - `structure` holds the transient per-document write inputs
//! - `schema` derives physical table names per document type
//! - `storage` describes the column layout of each physical table
//!
//! Nothing here performs I/O.

mod data_type;
mod schema;
mod storage;
mod structure;
mod value;

#[cfg(test)]
mod tests;

// re-exports
pub use data_type::{DataTypeCode, IndexRowShape, IndexTableKind};
pub use schema::{IndexAccessor, IndexesTableNames, StructureSchema};
pub use storage::{IndexFields, SchemaField, StorageSchema, StructureFields, UniqueFields};
pub use structure::{Structure, StructureId, StructureIndex, Unique, UniqueMode};
pub use value::Value;
