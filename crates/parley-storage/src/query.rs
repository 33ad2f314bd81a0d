//! Store-agnostic query model
//!
//! A [`Query`] is a conjunction of field conditions ([`Criteria`]) plus an
//! optional result limit. There is no sort: results come back in whatever
//! order the store traverses them.

use serde_json::Value;

/// Comparison applied to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Field equals the value
    Eq(Value),
    /// Field is greater than or equal to the value
    Gte(Value),
}

/// One field condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: Op,
}

/// A conjunction of conditions. An empty set matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    conditions: Vec<Condition>,
}

impl Criteria {
    /// Criteria matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            op: Op::Eq(value.into()),
        });
        self
    }

    /// Require `field >= value`
    pub fn gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            op: Op::Gte(value.into()),
        });
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Criteria plus an optional cap on the number of returned documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub criteria: Criteria,
    pub limit: Option<u32>,
}

impl Query {
    pub fn new(criteria: Criteria) -> Self {
        Self {
            criteria,
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
