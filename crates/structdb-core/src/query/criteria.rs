//! Module: query::criteria
//! Responsibility: accumulate predicate text and bound parameters node by node.
//! Does not own: member alias allocation or node dispatch.
//! Boundary: the expression builder drives one accumulator per predicate.

use crate::{
    error::InternalError,
    model::{IndexFields, Value},
    query::node::Operator,
};

///
/// SqlParameter
/// One bound parameter, named in accumulation order.
///

#[derive(Clone, Debug, PartialEq)]
pub struct SqlParameter {
    pub name: String,
    pub value: Value,
}

impl SqlParameter {
    #[must_use]
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

///
/// WhereCriteriaBuilder
///
/// Fragment accumulator consumed by the expression builder. Tokens appended
/// since the last `flush` are pending; `sql` only exposes flushed text.
///

pub trait WhereCriteriaBuilder {
    /// Append a member reference. `pattern` wraps the rendered member, with
    /// `{0}` marking where it goes.
    fn add_member(&mut self, path: &str, member_index: usize, pattern: Option<&str>);

    fn add_op(&mut self, op: Operator);

    fn add_value(&mut self, value: Value);

    /// Append a null comparison, turning a trailing `=`/`<>` into `is`/`is not`.
    fn add_null_value(&mut self);

    fn add_set_of_values(&mut self, values: Vec<Value>);

    /// Reference the most recently bound parameter again without binding a
    /// new one.
    fn add_last_value_again(&mut self, pattern: Option<&str>) -> Result<(), InternalError>;

    fn add_raw(&mut self, text: &str);

    fn flush(&mut self);

    fn sql(&self) -> &str;

    fn params(&self) -> &[SqlParameter];

    fn is_empty(&self) -> bool;
}

///
/// SqlWhereCriteriaBuilder
///
/// Default accumulator. Members render as `mem<index>.[Value]`, parameters
/// as `@p<n>`. Tokens are space separated except directly inside parentheses.
///

#[derive(Debug, Default)]
pub struct SqlWhereCriteriaBuilder {
    text: String,
    flushed: usize,
    params: Vec<SqlParameter>,
    trailing_op: Option<(Operator, usize)>,
}

impl SqlWhereCriteriaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one token and return the offset it starts at.
    fn push_token(&mut self, token: &str) -> usize {
        if self.needs_separator(token) {
            self.text.push(' ');
        }
        let start = self.text.len();
        self.text.push_str(token);
        self.trailing_op = None;

        start
    }

    fn needs_separator(&self, token: &str) -> bool {
        match self.text.chars().last() {
            None | Some(' ' | '(') => false,
            Some(_) => !token.starts_with([' ', ')']),
        }
    }

    fn bind(&mut self, value: Value) -> String {
        let name = format!("@p{}", self.params.len());
        self.params.push(SqlParameter::new(name.clone(), value));

        name
    }
}

fn apply_pattern(pattern: Option<&str>, rendered: &str) -> String {
    match pattern {
        Some(pattern) => pattern.replace("{0}", rendered),
        None => rendered.to_string(),
    }
}

impl WhereCriteriaBuilder for SqlWhereCriteriaBuilder {
    fn add_member(&mut self, _path: &str, member_index: usize, pattern: Option<&str>) {
        let rendered = format!("mem{member_index}.[{}]", IndexFields::VALUE.name);
        self.push_token(&apply_pattern(pattern, &rendered));
    }

    fn add_op(&mut self, op: Operator) {
        let start = self.push_token(op.token());
        self.trailing_op = Some((op, start));
    }

    fn add_value(&mut self, value: Value) {
        let name = self.bind(value);
        self.push_token(&name);
    }

    fn add_null_value(&mut self) {
        if let Some((op, start)) = self.trailing_op.take() {
            let replacement = match op {
                Operator::Equal => Some(Operator::Is),
                Operator::NotEqual => Some(Operator::IsNot),
                _ => None,
            };

            if let Some(replacement) = replacement {
                self.text.truncate(start);
                self.flushed = self.flushed.min(start);
                self.text.push_str(replacement.token());
            }
        }

        self.push_token("null");
    }

    fn add_set_of_values(&mut self, values: Vec<Value>) {
        let name = self.bind(Value::List(values));
        self.push_token(&format!("({name})"));
    }

    fn add_last_value_again(&mut self, pattern: Option<&str>) -> Result<(), InternalError> {
        let name = self
            .params
            .last()
            .map(|param| param.name.clone())
            .ok_or_else(|| {
                InternalError::query_invariant("no bound parameter to reference again")
            })?;

        self.push_token(&apply_pattern(pattern, &name));

        Ok(())
    }

    fn add_raw(&mut self, text: &str) {
        self.push_token(text);
    }

    fn flush(&mut self) {
        self.flushed = self.text.len();
    }

    fn sql(&self) -> &str {
        &self.text[..self.flushed]
    }

    fn params(&self) -> &[SqlParameter] {
        &self.params
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty() && self.params.is_empty()
    }
}
