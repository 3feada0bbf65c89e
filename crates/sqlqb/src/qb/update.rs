//! UPDATE payload and rendering.

use super::{QueryBuilder, Statement, StatementKind, sorted_entries};
use crate::param::ParamList;
use crate::value::Value;

impl QueryBuilder {
    /// Start an UPDATE of `table`, clearing all per-statement state.
    pub fn update(&mut self, table: &str) -> &mut Self {
        self.state = Statement::start(StatementKind::Update, table);
        self
    }

    /// Add or replace one SET assignment.
    pub fn set_update(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        self.state
            .update_values
            .insert(column.to_string(), value.into());
        self
    }

    /// Replace all SET assignments.
    pub fn update_values<K, V>(&mut self, values: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.state.update_values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }
}

impl Statement {
    pub(super) fn render_update(&self, sql: &mut String, params: &mut ParamList) {
        sql.push_str("UPDATE ");
        sql.push_str(&self.table);
        sql.push_str(" SET ");
        for (i, (column, value)) in sorted_entries(&self.update_values).into_iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(column);
            sql.push_str(" = ");
            params.bind(sql, value.clone());
        }

        self.render_guarded_where(sql, params);
        self.render_returning(sql);
    }
}
