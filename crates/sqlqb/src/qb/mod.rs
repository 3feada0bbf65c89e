//! Fluent, reusable statement builder.
//!
//! A [`QueryBuilder`] accumulates clause state through chained `&mut self`
//! calls and renders it with [`QueryBuilder::build`], which returns the SQL
//! text plus the parameters in placeholder order and then clears the
//! per-statement state. The placeholder style and the rest of [`QbConfig`]
//! survive every reset.
//!
//! # Usage
//!
//! ```
//! use sqlqb::{Op, QueryBuilder};
//!
//! let mut qb = QueryBuilder::new();
//! let q = qb
//!     .select(&["id", "name"])
//!     .from("users")
//!     .and_where("age", Op::Gte, 18)
//!     .order_by("created_at")
//!     .limit(10)
//!     .build();
//! assert_eq!(q.sql, "SELECT id, name FROM users WHERE age >= $1 ORDER BY created_at ASC LIMIT 10");
//!
//! // The same builder is ready for the next statement.
//! let q = qb.delete("sessions").and_where("user_id", Op::Eq, 7).build();
//! assert_eq!(q.sql, "DELETE FROM sessions WHERE user_id = $1");
//! ```
//!
//! UPDATE and DELETE without a WHERE clause are guarded with an always-false
//! `WHERE 1=0` unless [`QueryBuilder::unsafe_writes`] is called for that
//! statement.

mod delete;
mod expr;
mod insert;
mod select;
mod update;


pub use expr::{Combinator, Op};
pub(crate) use expr::{Predicate, render_predicates};

use crate::config::QbConfig;
use crate::error::{QbError, QbResult};
use crate::param::{BuiltQuery, ParamList, PlaceholderStyle};
use crate::value::{Assignment, Value};
use std::collections::HashMap;
use std::fmt;

/// The guard appended to UPDATE / DELETE without predicates.
pub const WRITE_GUARD: &str = " WHERE 1=0 /*guarded: missing WHERE*/";

/// Statement kind, selecting the render path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Full => "FULL OUTER JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct JoinClause {
    kind: JoinKind,
    table: String,
    on: String,
}

#[derive(Debug, Clone, PartialEq)]
struct OrderTerm {
    column: String,
    descending: bool,
}

/// ON CONFLICT configuration. `columns` and `constraint` are never both set.
#[derive(Debug, Clone, Default, PartialEq)]
struct ConflictSpec {
    columns: Vec<String>,
    constraint: Option<String>,
    do_nothing: bool,
    updates: HashMap<String, Assignment>,
}

impl ConflictSpec {
    fn is_configured(&self) -> bool {
        !self.columns.is_empty()
            || self.constraint.is_some()
            || self.do_nothing
            || !self.updates.is_empty()
    }
}

/// Per-statement state, cleared by every statement-starting call and by `build`.
#[derive(Debug, Clone, PartialEq)]
struct Statement {
    kind: Option<StatementKind>,
    table: String,
    columns: Vec<String>,
    predicates: Vec<Predicate>,
    joins: Vec<JoinClause>,
    group_by: Vec<String>,
    having: Vec<Predicate>,
    order_by: Vec<OrderTerm>,
    limit: i64,
    offset: i64,
    insert_values: HashMap<String, Value>,
    update_values: HashMap<String, Value>,
    conflict: ConflictSpec,
    returning: Vec<String>,
    guard_writes: bool,
}

impl Default for Statement {
    fn default() -> Self {
        Self {
            kind: None,
            table: String::new(),
            columns: Vec::new(),
            predicates: Vec::new(),
            joins: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            limit: 0,
            offset: 0,
            insert_values: HashMap::new(),
            update_values: HashMap::new(),
            conflict: ConflictSpec::default(),
            returning: Vec::new(),
            guard_writes: true,
        }
    }
}

impl Statement {
    /// Fresh state for a write statement on `table`.
    fn start(kind: StatementKind, table: &str) -> Self {
        Self {
            kind: Some(kind),
            table: table.to_string(),
            ..Self::default()
        }
    }

    fn render_returning(&self, sql: &mut String) {
        if !self.returning.is_empty() {
            sql.push_str(" RETURNING ");
            sql.push_str(&self.returning.join(", "));
        }
    }

    /// ` WHERE <predicates>`, or the write guard when there are none and guarding is on.
    fn render_guarded_where(&self, sql: &mut String, params: &mut ParamList) {
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            render_predicates(&self.predicates, sql, params);
        } else if self.guard_writes {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "sqlqb.sql",
                kind = %self.kind.map_or("", StatementKind::as_sql),
                table = %self.table,
                "write statement has no WHERE clause; guard injected"
            );
            sql.push_str(WRITE_GUARD);
        }
    }
}

/// Sorted view of a column map; keys are unique so the order is total.
fn sorted_entries<V>(map: &HashMap<String, V>) -> Vec<(&str, &V)> {
    let mut entries: Vec<(&str, &V)> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries
}

/// A reusable SQL statement builder.
///
/// Not synchronized: use one builder per thread or wrap it in a lock.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    config: QbConfig,
    state: Statement,
}

impl QueryBuilder {
    /// Create a builder with the default config (`$n` placeholders).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QbConfig) -> Self {
        Self {
            config,
            state: Statement::default(),
        }
    }

    pub fn config(&self) -> &QbConfig {
        &self.config
    }

    pub fn placeholders(&self) -> PlaceholderStyle {
        self.config.placeholders
    }

    /// Kind of the statement being built, if one was started.
    pub fn kind(&self) -> Option<StatementKind> {
        self.state.kind
    }

    /// Set the placeholder style. Persists across statements.
    pub fn with_placeholders(&mut self, style: PlaceholderStyle) -> &mut Self {
        self.config.placeholders = style;
        self
    }

    /// Clear all per-statement state. Config is kept and the write guard is re-enabled.
    pub fn reset(&mut self) -> &mut Self {
        self.state = Statement::default();
        self
    }

    // ==================== WHERE conditions ====================

    /// Append an AND predicate.
    pub fn and_where(&mut self, column: &str, op: Op, value: impl Into<Value>) -> &mut Self {
        self.state
            .predicates
            .push(Predicate::new(column, op, value.into(), Combinator::And));
        self
    }

    /// Append an OR predicate.
    pub fn or_where(&mut self, column: &str, op: Op, value: impl Into<Value>) -> &mut Self {
        self.state
            .predicates
            .push(Predicate::new(column, op, value.into(), Combinator::Or));
        self
    }

    /// `column IN (...)`. A non-list value is treated as an empty list.
    pub fn where_in(&mut self, column: &str, values: impl Into<Value>) -> &mut Self {
        self.and_where(column, Op::In, values)
    }

    /// `column NOT IN (...)`. A non-list value is treated as an empty list.
    pub fn where_not_in(&mut self, column: &str, values: impl Into<Value>) -> &mut Self {
        self.and_where(column, Op::NotIn, values)
    }

    pub fn where_like(&mut self, column: &str, pattern: impl Into<Value>) -> &mut Self {
        self.and_where(column, Op::Like, pattern)
    }

    pub fn where_not_like(&mut self, column: &str, pattern: impl Into<Value>) -> &mut Self {
        self.and_where(column, Op::NotLike, pattern)
    }

    pub fn where_null(&mut self, column: &str) -> &mut Self {
        self.and_where(column, Op::IsNull, Value::Null)
    }

    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.and_where(column, Op::IsNotNull, Value::Null)
    }

    // ==================== Write options ====================

    /// Set the RETURNING columns. An empty slice means `*`.
    pub fn returning(&mut self, columns: &[&str]) -> &mut Self {
        self.state.returning = if columns.is_empty() {
            vec!["*".to_string()]
        } else {
            columns.iter().map(|c| c.to_string()).collect()
        };
        self
    }

    /// Re-enable the write guard for the current statement.
    pub fn safe(&mut self) -> &mut Self {
        self.state.guard_writes = true;
        self
    }

    /// Allow UPDATE / DELETE without WHERE for the current statement only.
    pub fn unsafe_writes(&mut self) -> &mut Self {
        self.state.guard_writes = false;
        self
    }

    // ==================== Rendering ====================

    /// Render the statement and clear the per-statement state.
    ///
    /// Never fails: with no statement started the result is empty.
    pub fn build(&mut self) -> BuiltQuery {
        let built = self.render();
        self.state = Statement::default();
        built
    }

    /// Validate, then render like [`build`](Self::build).
    ///
    /// On error nothing is cleared, so the caller can fix or [`reset`](Self::reset) the builder.
    pub fn try_build(&mut self) -> QbResult<BuiltQuery> {
        self.validate()?;
        Ok(self.build())
    }

    /// Render the current state without clearing it.
    pub fn to_sql(&self) -> BuiltQuery {
        self.render()
    }

    /// Check the current state for configurations that `build` would silently degrade.
    pub fn validate(&self) -> QbResult<()> {
        let state = &self.state;
        let kind = state.kind.ok_or(QbError::NoStatement)?;

        if kind != StatementKind::Select && state.table.is_empty() {
            return Err(QbError::MissingTable { kind });
        }
        if kind == StatementKind::Update && state.update_values.is_empty() {
            return Err(QbError::EmptyUpdate {
                table: state.table.clone(),
            });
        }

        for pred in state.predicates.iter().chain(&state.having) {
            if pred.op.is_membership() && !pred.value.is_membership_operand() {
                return Err(QbError::NonListMembership {
                    column: pred.column.clone(),
                    op: pred.op,
                });
            }
        }
        Ok(())
    }

    fn render(&self) -> BuiltQuery {
        let Some(kind) = self.state.kind else {
            return BuiltQuery::default();
        };

        let mut params = ParamList::new(self.config.placeholders);
        let mut sql = String::new();
        match kind {
            StatementKind::Select => self.state.render_select(&mut sql, &mut params),
            StatementKind::Insert => self.state.render_insert(&mut sql, &mut params),
            StatementKind::Update => self.state.render_update(&mut sql, &mut params),
            StatementKind::Delete => self.state.render_delete(&mut sql, &mut params),
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlqb.sql",
            kind = %kind,
            placeholders = %params.style(),
            param_count = params.len(),
            sql = %self.config.truncate_for_log(&sql),
        );

        BuiltQuery {
            sql,
            params: params.into_inner(),
        }
    }
}
