use crate::model::{DataTypeCode, Value};
use derive_more::Deref;
use std::fmt::{self, Display};

///
/// Operator
/// Comparison or boolean connective appearing between predicate nodes.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    Not,
    Like,
    InSet,
    Is,
    IsNot,
}

impl Operator {
    /// Token rendered into predicate text.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
            Self::Like => "like",
            Self::InSet => "in",
            Self::Is => "is",
            Self::IsNot => "is not",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

///
/// SortDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Asc => 0x01,
            Self::Desc => 0x02,
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Asc => "Asc",
            Self::Desc => "Desc",
        };
        f.write_str(label)
    }
}

///
/// MemberKind
///
/// How a member reference participates in a predicate. String variants carry
/// the comparison operand the parser lifted out of the call expression.
///

#[derive(Clone, Debug, PartialEq)]
pub enum MemberKind {
    Plain,
    InSet { values: Vec<Value> },
    Like { pattern: String },
    StringContains { value: String },
    StringExact { value: String },
    StringEndsWith { value: String },
    StringStartsWith { value: String },
    ToLower,
    ToUpper,
}

///
/// MemberNode
///

#[derive(Clone, Debug, PartialEq)]
pub struct MemberNode {
    pub path: String,
    pub data_type_code: DataTypeCode,
    pub kind: MemberKind,
}

impl MemberNode {
    #[must_use]
    pub fn new(path: impl Into<String>, data_type_code: DataTypeCode) -> Self {
        Self::with_kind(path, data_type_code, MemberKind::Plain)
    }

    #[must_use]
    pub fn with_kind(
        path: impl Into<String>,
        data_type_code: DataTypeCode,
        kind: MemberKind,
    ) -> Self {
        Self {
            path: path.into(),
            data_type_code,
            kind,
        }
    }

    /// Plain boolean members may stand alone as a predicate term.
    #[must_use]
    pub fn is_bool(&self) -> bool {
        self.data_type_code == DataTypeCode::Bool
    }
}

///
/// SortingNode
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortingNode {
    pub member_path: String,
    pub direction: SortDirection,
    pub data_type_code: DataTypeCode,
}

impl SortingNode {
    #[must_use]
    pub fn new(
        member_path: impl Into<String>,
        direction: SortDirection,
        data_type_code: DataTypeCode,
    ) -> Self {
        Self {
            member_path: member_path.into(),
            direction,
            data_type_code,
        }
    }
}

///
/// IncludeNode
///
/// Reference from the queried structure to another structure set: the id
/// reference path holds the foreign id, the object reference path names the
/// member the referenced structure is materialized into.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IncludeNode {
    pub referenced_structure_name: String,
    pub id_reference_path: String,
    pub object_reference_path: String,
    pub data_type_code: DataTypeCode,
}

impl IncludeNode {
    #[must_use]
    pub fn new(
        referenced_structure_name: impl Into<String>,
        id_reference_path: impl Into<String>,
        object_reference_path: impl Into<String>,
        data_type_code: DataTypeCode,
    ) -> Self {
        Self {
            referenced_structure_name: referenced_structure_name.into(),
            id_reference_path: id_reference_path.into(),
            object_reference_path: object_reference_path.into(),
            data_type_code,
        }
    }

    fn same_reference(&self, other: &Self) -> bool {
        self.id_reference_path == other.id_reference_path
            && self.object_reference_path == other.object_reference_path
    }
}

///
/// Node
/// One element of a parsed predicate, sort or include sequence.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Member(MemberNode),
    Operator(Operator),
    Value(Value),
    Null,
    StartGroup,
    EndGroup,
    Raw(String),
    Sorting(SortingNode),
    Include(IncludeNode),
}

impl Node {
    #[must_use]
    pub const fn is_operator(&self) -> bool {
        matches!(self, Self::Operator(_))
    }

    pub(crate) const fn kind_name(&self) -> &'static str {
        match self {
            Self::Member(_) => "member",
            Self::Operator(_) => "operator",
            Self::Value(_) => "value",
            Self::Null => "null",
            Self::StartGroup => "start group",
            Self::EndGroup => "end group",
            Self::Raw(_) => "raw",
            Self::Sorting(_) => "sorting",
            Self::Include(_) => "include",
        }
    }
}

impl From<MemberNode> for Node {
    fn from(node: MemberNode) -> Self {
        Self::Member(node)
    }
}

impl From<Operator> for Node {
    fn from(op: Operator) -> Self {
        Self::Operator(op)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<SortingNode> for Node {
    fn from(node: SortingNode) -> Self {
        Self::Sorting(node)
    }
}

impl From<IncludeNode> for Node {
    fn from(node: IncludeNode) -> Self {
        Self::Include(node)
    }
}

///
/// ParsedLambda
/// Ordered node sequence produced by the external expression parser.
///

#[derive(Clone, Debug, Default, Deref, PartialEq)]
pub struct ParsedLambda(Vec<Node>);

impl ParsedLambda {
    #[must_use]
    pub const fn new(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    /// Union of two include sequences. A node whose reference pair is
    /// already present is dropped, including repeats within `self`; all
    /// other nodes keep their first-seen order.
    #[must_use]
    pub fn merge_as_new(&self, other: &Self) -> Self {
        let mut merged: Vec<Node> = Vec::with_capacity(self.0.len() + other.0.len());

        for node in self.0.iter().chain(&other.0) {
            let duplicate = match node {
                Node::Include(include) => merged.iter().any(|existing| {
                    matches!(existing, Node::Include(seen) if seen.same_reference(include))
                }),
                other_node => merged.contains(other_node),
            };

            if !duplicate {
                merged.push(node.clone());
            }
        }

        Self(merged)
    }
}

impl FromIterator<Node> for ParsedLambda {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

///
/// Query
///
/// Up to three parsed sequences: one predicate, one sort sequence and any
/// number of include sequences.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub predicate: Option<ParsedLambda>,
    pub sortings: Option<ParsedLambda>,
    pub includes: Vec<ParsedLambda>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_predicate(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.predicate = Some(nodes.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_sortings(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.sortings = Some(nodes.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_include(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.includes.push(nodes.into_iter().collect());
        self
    }

    #[must_use]
    pub fn has_predicate(&self) -> bool {
        self.predicate.as_ref().is_some_and(|lambda| !lambda.is_empty())
    }

    #[must_use]
    pub fn has_sortings(&self) -> bool {
        self.sortings.as_ref().is_some_and(|lambda| !lambda.is_empty())
    }

    #[must_use]
    pub fn has_includes(&self) -> bool {
        self.includes.iter().any(|lambda| !lambda.is_empty())
    }
}
