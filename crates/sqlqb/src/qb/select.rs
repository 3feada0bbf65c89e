//! SELECT clauses and rendering.

use super::{Combinator, Op, Predicate, render_predicates};
use super::{JoinClause, JoinKind, OrderTerm, QueryBuilder, Statement, StatementKind};
use crate::param::ParamList;
use crate::value::Value;

impl QueryBuilder {
    /// Start (or re-enter) a SELECT.
    ///
    /// Columns replace the current list; with an empty slice the current list is
    /// kept, or `*` is used if there is none. Other clause state is untouched.
    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        self.state.kind = Some(StatementKind::Select);
        if !columns.is_empty() {
            self.state.columns = columns.iter().map(|c| c.to_string()).collect();
        } else if self.state.columns.is_empty() {
            self.state.columns = vec!["*".to_string()];
        }
        self
    }

    /// Set the source table (`FROM <table>`); aliases are written inline, e.g. `"users u"`.
    pub fn from(&mut self, table: &str) -> &mut Self {
        self.state.table = table.to_string();
        self
    }

    // ==================== JOIN ====================

    fn push_join(&mut self, kind: JoinKind, table: &str, on: &str) -> &mut Self {
        self.state.joins.push(JoinClause {
            kind,
            table: table.to_string(),
            on: on.to_string(),
        });
        self
    }

    /// `INNER JOIN <table> ON <on>`; `on` is used verbatim.
    pub fn join(&mut self, table: &str, on: &str) -> &mut Self {
        self.push_join(JoinKind::Inner, table, on)
    }

    pub fn left_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.push_join(JoinKind::Left, table, on)
    }

    pub fn right_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.push_join(JoinKind::Right, table, on)
    }

    pub fn full_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.push_join(JoinKind::Full, table, on)
    }

    // ==================== GROUP BY / HAVING ====================

    /// Append GROUP BY columns (cumulative).
    pub fn group_by(&mut self, columns: &[&str]) -> &mut Self {
        self.state
            .group_by
            .extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Append a HAVING predicate (joined with AND).
    pub fn having(&mut self, column: &str, op: Op, value: impl Into<Value>) -> &mut Self {
        self.state
            .having
            .push(Predicate::new(column, op, value.into(), Combinator::And));
        self
    }

    // ==================== ORDER BY / pagination ====================

    pub fn order_by(&mut self, column: &str) -> &mut Self {
        self.state.order_by.push(OrderTerm {
            column: column.to_string(),
            descending: false,
        });
        self
    }

    pub fn order_by_desc(&mut self, column: &str) -> &mut Self {
        self.state.order_by.push(OrderTerm {
            column: column.to_string(),
            descending: true,
        });
        self
    }

    /// Set LIMIT. Rendered only when greater than zero.
    pub fn limit(&mut self, n: i64) -> &mut Self {
        self.state.limit = n;
        self
    }

    /// Set OFFSET. Rendered only when greater than zero.
    pub fn offset(&mut self, n: i64) -> &mut Self {
        self.state.offset = n;
        self
    }

    /// 1-based pagination: `LIMIT per_page OFFSET (page - 1) * per_page`.
    pub fn paginate(&mut self, page: i64, per_page: i64) -> &mut Self {
        self.limit(per_page)
            .offset(page.saturating_sub(1).saturating_mul(per_page))
    }
}

impl Statement {
    pub(super) fn render_select(&self, sql: &mut String, params: &mut ParamList) {
        sql.push_str("SELECT ");
        sql.push_str(&self.columns.join(", "));

        if !self.table.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&self.table);
        }

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join.kind.keyword());
            sql.push(' ');
            sql.push_str(&join.table);
            sql.push_str(" ON ");
            sql.push_str(&join.on);
        }

        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            render_predicates(&self.predicates, sql, params);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            render_predicates(&self.having, sql, params);
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, term) in self.order_by.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&term.column);
                sql.push_str(if term.descending { " DESC" } else { " ASC" });
            }
        }

        if self.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.limit));
        }
        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }
    }
}
