//! INSERT payload, ON CONFLICT configuration and rendering.

use super::{QueryBuilder, Statement, StatementKind, sorted_entries};
use crate::param::ParamList;
use crate::value::{Assignment, Value};

impl QueryBuilder {
    /// Start an INSERT into `table`, clearing all per-statement state.
    pub fn insert(&mut self, table: &str) -> &mut Self {
        self.state = Statement::start(StatementKind::Insert, table);
        self
    }

    /// Add or replace one INSERT column value.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.state
            .insert_values
            .insert(column.to_string(), value.into());
        self
    }

    /// Replace the whole INSERT payload.
    pub fn values<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.state.insert_values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    // ==================== ON CONFLICT ====================

    /// Conflict target columns. Clears any constraint target.
    pub fn on_conflict(&mut self, columns: &[&str]) -> &mut Self {
        self.state.conflict.columns = columns.iter().map(|c| c.to_string()).collect();
        self.state.conflict.constraint = None;
        self
    }

    /// `ON CONSTRAINT <name>` target. Clears any column target.
    pub fn on_conflict_constraint(&mut self, name: &str) -> &mut Self {
        self.state.conflict.constraint = Some(name.to_string());
        self.state.conflict.columns.clear();
        self
    }

    pub fn on_conflict_do_nothing(&mut self) -> &mut Self {
        self.state.conflict.do_nothing = true;
        self
    }

    /// Add a `DO UPDATE SET` assignment. Overrides an earlier DO NOTHING.
    ///
    /// Pass a [`RawExpr`](crate::RawExpr) (e.g. [`excluded`](crate::excluded)) to
    /// splice SQL instead of binding a value.
    pub fn on_conflict_set(&mut self, column: &str, value: impl Into<Assignment>) -> &mut Self {
        self.state.conflict.do_nothing = false;
        self.state
            .conflict
            .updates
            .insert(column.to_string(), value.into());
        self
    }

    /// Add several `DO UPDATE SET` assignments.
    pub fn on_conflict_set_map<K, V>(
        &mut self,
        assignments: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        K: AsRef<str>,
        V: Into<Assignment>,
    {
        for (column, value) in assignments {
            self.on_conflict_set(column.as_ref(), value);
        }
        self
    }
}

impl Statement {
    pub(super) fn render_insert(&self, sql: &mut String, params: &mut ParamList) {
        let upsert = params.style().supports_upsert();

        sql.push_str("INSERT INTO ");
        sql.push_str(&self.table);

        if self.insert_values.is_empty() {
            if !upsert {
                sql.push_str(" () VALUES ()");
                self.log_dropped_clauses();
                return;
            }
            sql.push_str(" DEFAULT VALUES");
        } else {
            let entries = sorted_entries(&self.insert_values);
            sql.push_str(" (");
            for (i, (column, _)) in entries.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(column);
            }
            sql.push_str(") VALUES (");
            for (i, (_, value)) in entries.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                params.bind(sql, (*value).clone());
            }
            sql.push(')');
        }

        if upsert {
            self.render_on_conflict(sql, params);
            self.render_returning(sql);
        } else {
            self.log_dropped_clauses();
        }
    }

    /// ` ON CONFLICT <target>` then the action.
    ///
    /// With no target the text is ` ON CONFLICT  DO ...` (two spaces).
    fn render_on_conflict(&self, sql: &mut String, params: &mut ParamList) {
        let conflict = &self.conflict;
        if !conflict.is_configured() {
            return;
        }

        sql.push_str(" ON CONFLICT ");
        if let Some(name) = &conflict.constraint {
            sql.push_str("ON CONSTRAINT ");
            sql.push_str(name);
        } else if !conflict.columns.is_empty() {
            sql.push('(');
            sql.push_str(&conflict.columns.join(", "));
            sql.push(')');
        }

        if conflict.do_nothing {
            sql.push_str(" DO NOTHING");
            return;
        }

        if !conflict.updates.is_empty() {
            sql.push_str(" DO UPDATE SET ");
            for (i, (column, assignment)) in
                sorted_entries(&conflict.updates).into_iter().enumerate()
            {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(column);
                sql.push_str(" = ");
                match assignment {
                    Assignment::Raw(raw) => sql.push_str(raw.as_str()),
                    Assignment::Bind(value) => params.bind(sql, value.clone()),
                }
            }
        }
    }

    /// ON CONFLICT and RETURNING are not rendered for `?` placeholders.
    fn log_dropped_clauses(&self) {
        if self.conflict.is_configured() || !self.returning.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "sqlqb.sql",
                table = %self.table,
                "ON CONFLICT / RETURNING dropped: not supported with `?` placeholders"
            );
        }
    }
}
