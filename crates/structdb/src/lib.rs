//! ## Crate layout
//! - `core`: data model, insert orchestrator, query translator, config and
//!   observability.
//! - `error`: public error type mapped from core failures.
//!
//! The `prelude` module carries the domain vocabulary plus the two entry
//! points, `StructureInserter` and `SqlExpressionBuilder`.

pub use structdb_core as core;

pub mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

use structdb_core::{
    config::StoreConfig,
    insert::{StructureInserter, WriteSink},
    query::SqlExpressionBuilder,
};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Engine
///
/// Parsed configuration plus constructors for the write and query entry
/// points. Holds no connection or session state.
///

#[derive(Clone, Debug, Default)]
pub struct Engine {
    config: StoreConfig,
}

impl Engine {
    #[must_use]
    pub const fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Parse and validate TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(Self::new(StoreConfig::from_toml_str(text)?))
    }

    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Build an inserter over `sink`; a missing sink is a configuration error.
    pub fn inserter<S: WriteSink>(&self, sink: Option<S>) -> Result<StructureInserter<S>, Error> {
        Ok(StructureInserter::try_new(sink, &self.config.insert)?)
    }

    #[must_use]
    pub fn expression_builder(&self) -> SqlExpressionBuilder {
        SqlExpressionBuilder::from_config(&self.config.query)
    }
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Engine, Error,
        core::{
            insert::{StructureInserter, WriteSink},
            prelude::*,
            query::{SqlExpression, SqlExpressionBuilder},
        },
    };
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use structdb_core::{
        insert::BulkWriter,
        model::StructureIndex,
        query::{MemberKind, MemberNode},
    };

    struct CountingSink {
        singles: usize,
    }

    impl WriteSink for CountingSink {
        fn single_insert_structure(
            &mut self,
            _: &Structure,
            _: &StructureSchema,
        ) -> Result<(), structdb_core::error::InternalError> {
            self.singles += 1;
            Ok(())
        }

        fn single_update_structure(
            &mut self,
            _: &Structure,
            _: &StructureSchema,
        ) -> Result<(), structdb_core::error::InternalError> {
            self.singles += 1;
            Ok(())
        }

        fn single_insert_unique(
            &mut self,
            _: &Unique,
            _: &StructureSchema,
        ) -> Result<(), structdb_core::error::InternalError> {
            self.singles += 1;
            Ok(())
        }

        fn single_insert_value_type_index(
            &mut self,
            _: &StructureIndex,
            _: &str,
        ) -> Result<(), structdb_core::error::InternalError> {
            self.singles += 1;
            Ok(())
        }

        fn single_insert_string_type_index(
            &mut self,
            _: &StructureIndex,
            _: &str,
        ) -> Result<(), structdb_core::error::InternalError> {
            self.singles += 1;
            Ok(())
        }

        fn bulk_writer(
            &mut self,
        ) -> Result<Box<dyn BulkWriter + '_>, structdb_core::error::InternalError> {
            Err(structdb_core::error::InternalError::write_failure(
                "bulk writes unsupported",
            ))
        }
    }

    #[test]
    fn engine_wires_configuration_into_entry_points() {
        let engine = Engine::from_toml_str(
            "[insert]\nbulk_escalation_threshold = 4\n[query]\nexact_match_cast_width = 128\n",
        )
        .expect("config");

        let inserter = engine
            .inserter(Some(CountingSink { singles: 0 }))
            .expect("inserter");
        assert_eq!(inserter.bulk_escalation_threshold(), 4);
        assert_eq!(engine.expression_builder().exact_match_cast_width(), 128);
    }

    #[test]
    fn missing_sink_surfaces_as_configuration_error() {
        let err = Engine::default()
            .inserter::<CountingSink>(None)
            .err()
            .expect("missing sink");

        assert_eq!(err.kind, ErrorKind::Configuration);
        assert_eq!(err.origin, ErrorOrigin::Insert);
    }

    #[test]
    fn single_structure_round_trip_through_prelude() {
        let engine = Engine::default();
        let schema = StructureSchema::new("Order", Vec::new());
        let structure = Structure::new(StructureId::Identity(1), "{}").with_index(
            "Total",
            12.5,
            DataTypeCode::FractalNumber,
        );

        let mut inserter = engine
            .inserter(Some(CountingSink { singles: 0 }))
            .expect("inserter");
        inserter.insert(&schema, &[structure]).expect("insert");
        assert_eq!(inserter.sink().singles, 2);

        let query = Query::new().with_predicate([Node::Member(MemberNode::with_kind(
            "Name",
            DataTypeCode::String,
            MemberKind::StringStartsWith {
                value: "A".to_string(),
            },
        ))]);
        let expression = engine.expression_builder().process(&query).expect("query");
        assert_eq!(expression.where_criteria().sql, "mem0.[Value] like @p0");
    }

    #[test]
    fn bulk_failure_maps_to_write_error() {
        let engine = Engine::default();
        let schema = StructureSchema::new("Order", Vec::new());
        let structures: Vec<_> = (1..=2)
            .map(|id| Structure::new(StructureId::Identity(id), "{}"))
            .collect();

        let mut inserter = engine
            .inserter(Some(CountingSink { singles: 0 }))
            .expect("inserter");
        let err: Error = inserter
            .insert(&schema, &structures)
            .expect_err("bulk rejected")
            .into();

        assert_eq!(err.kind, ErrorKind::Write);
        assert_eq!(err.message, "bulk writes unsupported");
    }
}
