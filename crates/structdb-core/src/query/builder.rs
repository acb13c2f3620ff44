//! Module: query::builder
//! Responsibility: compile parsed predicate, sort and include sequences into
//! one `SqlExpression`.
//! Does not own: parsing, SQL dialect rendering beyond the criteria builder,
//! or query execution.
//! Boundary: stateless across calls; every call gets a fresh criteria builder.

use crate::{
    DEFAULT_EXACT_MATCH_CAST_WIDTH,
    config::QueryConfig,
    error::{ErrorOrigin, InternalError},
    model::{IndexFields, Value},
    obs::{
        count_u64,
        sink::{MetricsEvent, record},
    },
    query::{
        criteria::{SqlWhereCriteriaBuilder, WhereCriteriaBuilder},
        expression::{SqlExpression, SqlInclude, SqlSortingMember, SqlWhereCriteria, SqlWhereMember},
        node::{MemberKind, MemberNode, Node, Operator, ParsedLambda, Query},
    },
};
use std::sync::Arc;

/// Produces one fresh criteria accumulator per compiled predicate.
pub type CriteriaBuilderFactory = Arc<dyn Fn() -> Box<dyn WhereCriteriaBuilder> + Send + Sync>;

///
/// SqlExpressionBuilder
///
/// Translator from parsed query nodes to a `SqlExpression`.
/// Re-processing the same query yields the same alias numbering, text and
/// parameters.
///

#[derive(Clone)]
pub struct SqlExpressionBuilder {
    criteria_builder: CriteriaBuilderFactory,
    exact_match_cast_width: u32,
}

impl SqlExpressionBuilder {
    #[must_use]
    pub fn new(criteria_builder: CriteriaBuilderFactory) -> Self {
        Self {
            criteria_builder,
            exact_match_cast_width: DEFAULT_EXACT_MATCH_CAST_WIDTH,
        }
    }

    /// Construct from an optional factory, failing fast when it is absent.
    pub fn try_new(
        criteria_builder: Option<CriteriaBuilderFactory>,
        config: &QueryConfig,
    ) -> Result<Self, InternalError> {
        let criteria_builder = criteria_builder.ok_or_else(|| {
            InternalError::missing_collaborator(ErrorOrigin::Query, "where criteria builder")
        })?;

        Ok(Self {
            criteria_builder,
            exact_match_cast_width: config.exact_match_cast_width,
        })
    }

    /// Default criteria builder with configured tunables.
    #[must_use]
    pub fn from_config(config: &QueryConfig) -> Self {
        Self {
            exact_match_cast_width: config.exact_match_cast_width,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn exact_match_cast_width(&self) -> u32 {
        self.exact_match_cast_width
    }

    /// Compile `query` into one expression: predicate first, then sortings,
    /// then the merged include sequences, all sharing one member alias table.
    ///
    /// A sorting or include node inside the predicate is rejected with a
    /// `Translation` error naming the node kind and its position; it is never
    /// emitted as raw predicate text.
    pub fn process(&self, query: &Query) -> Result<SqlExpression, InternalError> {
        let mut expression = SqlExpression::default();

        if let Some(predicate) = query.predicate.as_ref().filter(|_| query.has_predicate()) {
            self.process_wheres(predicate, &mut expression)?;
        }

        if let Some(sortings) = query.sortings.as_ref().filter(|_| query.has_sortings()) {
            process_sortings(sortings, &mut expression);
        }

        if let Some(includes) = merged_includes(query) {
            process_includes(&includes, &mut expression);
        }

        let criteria = expression.where_criteria();
        tracing::debug!(
            members = expression.members().len(),
            parameters = criteria.params.len(),
            sortings = expression.sorting_members().len(),
            includes = expression.includes().len(),
            "compiled query expression"
        );
        record(MetricsEvent::ExpressionCompiled {
            members: count_u64(expression.members().len()),
            parameters: count_u64(criteria.params.len()),
            sortings: count_u64(expression.sorting_members().len()),
            includes: count_u64(expression.includes().len()),
        });

        Ok(expression)
    }

    fn process_wheres(
        &self,
        lambda: &ParsedLambda,
        expression: &mut SqlExpression,
    ) -> Result<(), InternalError> {
        let mut builder = (self.criteria_builder)();
        let nodes = lambda.nodes();

        for (position, node) in nodes.iter().enumerate() {
            match node {
                Node::Member(member) => {
                    self.process_where_member(nodes, position, member, expression, &mut *builder)?;
                }
                Node::Operator(op) => builder.add_op(*op),
                Node::Value(value) => builder.add_value(value.clone()),
                Node::Null => builder.add_null_value(),
                Node::StartGroup => builder.add_raw("("),
                Node::EndGroup => builder.add_raw(")"),
                Node::Raw(text) => builder.add_raw(text),
                Node::Sorting(_) | Node::Include(_) => {
                    return Err(InternalError::translation(format!(
                        "{} node at position {position} is not valid in a predicate",
                        node.kind_name()
                    )));
                }
            }

            builder.flush();
        }

        let criteria = if builder.is_empty() {
            SqlWhereCriteria::empty()
        } else {
            SqlWhereCriteria::new(builder.sql(), builder.params().to_vec())
        };
        expression.set_where_criteria(criteria);

        Ok(())
    }

    fn process_where_member(
        &self,
        nodes: &[Node],
        position: usize,
        member: &MemberNode,
        expression: &mut SqlExpression,
        builder: &mut dyn WhereCriteriaBuilder,
    ) -> Result<(), InternalError> {
        let index = expression.existing_or_new_member_index(&member.path);
        if !expression.contains_where_member(&member.path) {
            expression.add_where_member(SqlWhereMember {
                member_index: index,
                path: member.path.clone(),
                data_type_code: member.data_type_code,
            });
        }

        let path = member.path.as_str();
        match &member.kind {
            MemberKind::InSet { values } => {
                builder.add_member(path, index, None);
                builder.add_op(Operator::InSet);
                builder.add_set_of_values(values.clone());
            }
            MemberKind::Like { pattern } => {
                like(builder, path, index, pattern.clone());
            }
            MemberKind::StringContains { value } => {
                like(builder, path, index, format!("%{value}%").replace("%%", "%"));
            }
            MemberKind::StringEndsWith { value } => {
                like(builder, path, index, format!("%{value}"));
            }
            MemberKind::StringStartsWith { value } => {
                like(builder, path, index, format!("{value}%"));
            }
            MemberKind::StringExact { value } => {
                self.string_exact(builder, path, index, value)?;
            }
            MemberKind::ToLower => builder.add_member(path, index, Some("lower({0})")),
            MemberKind::ToUpper => builder.add_member(path, index, Some("upper({0})")),
            MemberKind::Plain if member.is_bool() && is_implicit_bool(nodes, position) => {
                builder.add_member(path, index, None);
                builder.add_op(Operator::Equal);
                builder.add_value(Value::Bool(true));
            }
            MemberKind::Plain => builder.add_member(path, index, None),
        }

        Ok(())
    }

    /// Plain equality plus a fixed-width binary comparison of both sides.
    fn string_exact(
        &self,
        builder: &mut dyn WhereCriteriaBuilder,
        path: &str,
        index: usize,
        value: &str,
    ) -> Result<(), InternalError> {
        let cast = format!(
            "cast({{0}} as varbinary({}))",
            self.exact_match_cast_width
        );

        builder.add_raw("(");
        builder.add_member(path, index, None);
        builder.add_op(Operator::Equal);
        builder.add_value(Value::Text(value.to_string()));
        builder.flush();

        builder.add_raw(" and ");
        builder.add_member(path, index, Some(&cast));
        builder.add_op(Operator::Equal);
        builder.add_last_value_again(Some(&cast))?;
        builder.flush();

        builder.add_raw(")");

        Ok(())
    }
}

impl Default for SqlExpressionBuilder {
    fn default() -> Self {
        Self::new(Arc::new(|| -> Box<dyn WhereCriteriaBuilder> {
            Box::new(SqlWhereCriteriaBuilder::new())
        }))
    }
}

impl std::fmt::Debug for SqlExpressionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlExpressionBuilder")
            .field("exact_match_cast_width", &self.exact_match_cast_width)
            .finish_non_exhaustive()
    }
}

fn like(builder: &mut dyn WhereCriteriaBuilder, path: &str, index: usize, pattern: String) {
    builder.add_member(path, index, None);
    builder.add_op(Operator::Like);
    builder.add_value(Value::Text(pattern));
}

/// A boolean member stands alone unless an operator node sits on either side.
fn is_implicit_bool(nodes: &[Node], position: usize) -> bool {
    let left = position.checked_sub(1).and_then(|i| nodes.get(i));
    let right = nodes.get(position + 1);

    !left.is_some_and(Node::is_operator) && !right.is_some_and(Node::is_operator)
}

fn process_sortings(lambda: &ParsedLambda, expression: &mut SqlExpression) {
    for node in lambda.nodes() {
        let Node::Sorting(sorting) = node else {
            continue;
        };
        if expression.contains_sorting_member(&sorting.member_path) {
            continue;
        }

        let member_index = expression.existing_or_new_member_index(&sorting.member_path);
        expression.add_sorting_member(SqlSortingMember {
            member_index,
            member_path: sorting.member_path.clone(),
            alias: format!("mem{member_index}"),
            value_column: IndexFields::VALUE.name,
            direction: sorting.direction,
            data_type_code: sorting.data_type_code,
        });
    }
}

fn merged_includes(query: &Query) -> Option<ParsedLambda> {
    let merged = query
        .includes
        .iter()
        .fold(ParsedLambda::default(), |merged, lambda| {
            merged.merge_as_new(lambda)
        });

    (!merged.is_empty()).then_some(merged)
}

fn process_includes(lambda: &ParsedLambda, expression: &mut SqlExpression) {
    for node in lambda.nodes() {
        let Node::Include(include) = node else {
            continue;
        };

        expression.existing_or_new_member_index(&include.id_reference_path);

        let index = expression.next_include_index();
        expression.add_include(SqlInclude {
            index,
            referenced_structure_name: include.referenced_structure_name.clone(),
            alias: format!("inc{index}"),
            value_column: IndexFields::VALUE.name,
            id_reference_path: include.id_reference_path.clone(),
            object_reference_path: include.object_reference_path.clone(),
            data_type_code: include.data_type_code,
        });
    }
}
