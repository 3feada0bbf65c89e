//! Placeholder allocation and the rendered `(sql, params)` pair.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_postgres::types::ToSql;

/// Placeholder convention used when rendering bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?` for every parameter (MySQL / SQLite style).
    QuestionMark,
    /// `$1`, `$2`, ... (Postgres style).
    #[default]
    DollarN,
}

impl PlaceholderStyle {
    /// Whether this dialect supports `ON CONFLICT` and `INSERT ... RETURNING`.
    pub fn supports_upsert(self) -> bool {
        matches!(self, Self::DollarN)
    }
}

impl fmt::Display for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuestionMark => f.write_str("question_mark"),
            Self::DollarN => f.write_str("dollar_n"),
        }
    }
}

/// Parameters collected during one render, paired with their placeholders.
///
/// Every [`bind`](ParamList::bind) pushes exactly one value and writes exactly
/// one placeholder, so the Nth placeholder always refers to the Nth value.
#[derive(Debug)]
pub(crate) struct ParamList {
    style: PlaceholderStyle,
    params: Vec<Value>,
}

impl ParamList {
    pub(crate) fn new(style: PlaceholderStyle) -> Self {
        Self {
            style,
            params: Vec::new(),
        }
    }

    /// Push a value and write its placeholder into `sql`.
    pub(crate) fn bind(&mut self, sql: &mut String, value: Value) {
        self.params.push(value);
        match self.style {
            PlaceholderStyle::QuestionMark => sql.push('?'),
            PlaceholderStyle::DollarN => {
                sql.push('$');
                sql.push_str(&self.params.len().to_string());
            }
        }
    }

    pub(crate) fn style(&self) -> PlaceholderStyle {
        self.style
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn len(&self) -> usize {
        self.params.len()
    }

    pub(crate) fn into_inner(self) -> Vec<Value> {
        self.params
    }
}

/// A rendered statement: SQL text plus parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuiltQuery {
    /// SQL text with placeholders.
    pub sql: String,
    /// Bound values; element N belongs to placeholder N.
    pub params: Vec<Value>,
}

impl BuiltQuery {
    /// Whether nothing was rendered (no statement was started).
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Borrow the parameters as `tokio-postgres` trait objects.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|p| p as &(dyn ToSql + Sync))
            .collect()
    }

    /// Split into SQL text and parameters.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
