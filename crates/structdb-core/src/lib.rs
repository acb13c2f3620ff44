//! Core runtime for structdb: the structure/index data model, the index
//! insert orchestrator, and the query expression translator.
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod insert;
pub mod model;
pub mod obs;
pub mod query;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Advisory batch size above which callers should prefer one bulk call over
/// repeated single calls.
///
/// The orchestrator's own single/bulk decision does not consult this value;
/// it is surfaced through `InsertConfig` for callers.
pub const DEFAULT_BULK_ESCALATION_THRESHOLD: usize = 10;

/// Width of the binary cast used by exact string equality predicates.
pub const DEFAULT_EXACT_MATCH_CAST_WIDTH: u32 = 300;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No sinks, builders, or error types are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{
            DataTypeCode, Structure, StructureId, StructureIndex, StructureSchema, Unique,
            UniqueMode, Value,
        },
        query::{Node, Operator, ParsedLambda, Query, SortDirection},
    };
}
