use crate::{
    model::DataTypeCode,
    query::{criteria::SqlParameter, node::SortDirection},
};

///
/// SqlMember
/// One entry of the member alias table.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqlMember {
    pub index: usize,
    pub path: String,
}

///
/// SqlWhereMember
/// Member referenced by the predicate, recorded once per path.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqlWhereMember {
    pub member_index: usize,
    pub path: String,
    pub data_type_code: DataTypeCode,
}

///
/// SqlWhereCriteria
/// Compiled predicate text with its parameters in binding order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SqlWhereCriteria {
    pub sql: String,
    pub params: Vec<SqlParameter>,
}

impl SqlWhereCriteria {
    /// Match-all criteria.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(sql: impl Into<String>, params: Vec<SqlParameter>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

///
/// SqlSortingMember
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqlSortingMember {
    pub member_index: usize,
    pub member_path: String,
    pub alias: String,
    pub value_column: &'static str,
    pub direction: SortDirection,
    pub data_type_code: DataTypeCode,
}

///
/// SqlInclude
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqlInclude {
    pub index: usize,
    pub referenced_structure_name: String,
    pub alias: String,
    pub value_column: &'static str,
    pub id_reference_path: String,
    pub object_reference_path: String,
    pub data_type_code: DataTypeCode,
}

///
/// SqlExpression
///
/// Provider-agnostic query plan. Predicate, sort and include members share
/// one alias table; aliases are handed out in first-seen order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SqlExpression {
    members: Vec<SqlMember>,
    where_members: Vec<SqlWhereMember>,
    where_criteria: SqlWhereCriteria,
    sorting_members: Vec<SqlSortingMember>,
    includes: Vec<SqlInclude>,
}

impl SqlExpression {
    #[must_use]
    pub fn members(&self) -> &[SqlMember] {
        &self.members
    }

    #[must_use]
    pub fn where_members(&self) -> &[SqlWhereMember] {
        &self.where_members
    }

    #[must_use]
    pub const fn where_criteria(&self) -> &SqlWhereCriteria {
        &self.where_criteria
    }

    #[must_use]
    pub fn sorting_members(&self) -> &[SqlSortingMember] {
        &self.sorting_members
    }

    #[must_use]
    pub fn includes(&self) -> &[SqlInclude] {
        &self.includes
    }

    #[must_use]
    pub fn member_index_for(&self, path: &str) -> Option<usize> {
        self.members
            .iter()
            .find(|member| member.path == path)
            .map(|member| member.index)
    }

    pub(crate) fn existing_or_new_member_index(&mut self, path: &str) -> usize {
        if let Some(index) = self.member_index_for(path) {
            return index;
        }

        let index = self.members.len();
        self.members.push(SqlMember {
            index,
            path: path.to_string(),
        });

        index
    }

    pub(crate) fn contains_where_member(&self, path: &str) -> bool {
        self.where_members.iter().any(|member| member.path == path)
    }

    pub(crate) fn add_where_member(&mut self, member: SqlWhereMember) {
        self.where_members.push(member);
    }

    pub(crate) fn set_where_criteria(&mut self, criteria: SqlWhereCriteria) {
        self.where_criteria = criteria;
    }

    pub(crate) fn contains_sorting_member(&self, path: &str) -> bool {
        self.sorting_members
            .iter()
            .any(|member| member.member_path == path)
    }

    pub(crate) fn add_sorting_member(&mut self, member: SqlSortingMember) {
        self.sorting_members.push(member);
    }

    pub(crate) fn next_include_index(&self) -> usize {
        self.includes.len()
    }

    pub(crate) fn add_include(&mut self, include: SqlInclude) {
        self.includes.push(include);
    }
}
