//! Module: query
//! Responsibility: compile parsed query node sequences into provider-agnostic
//! expressions over the per-type index tables.
//! Does not own: expression parsing or query execution.
//! Boundary: external parsers hand over a `Query`; callers render or cache the
//! resulting `SqlExpression`.

mod builder;
mod criteria;
mod expression;
mod fingerprint;
mod node;


// re-exports
pub use builder::{CriteriaBuilderFactory, SqlExpressionBuilder};
pub use criteria::{SqlParameter, SqlWhereCriteriaBuilder, WhereCriteriaBuilder};
pub use expression::{
    SqlExpression, SqlInclude, SqlMember, SqlSortingMember, SqlWhereCriteria, SqlWhereMember,
};
pub use fingerprint::ExpressionFingerprint;
pub use node::{
    IncludeNode, MemberKind, MemberNode, Node, Operator, ParsedLambda, Query, SortDirection,
    SortingNode,
};
