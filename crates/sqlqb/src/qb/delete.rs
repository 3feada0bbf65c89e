//! DELETE rendering.

use super::{QueryBuilder, Statement, StatementKind};
use crate::param::ParamList;

impl QueryBuilder {
    /// Start a DELETE from `table`, clearing all per-statement state.
    pub fn delete(&mut self, table: &str) -> &mut Self {
        self.state = Statement::start(StatementKind::Delete, table);
        self
    }
}

impl Statement {
    pub(super) fn render_delete(&self, sql: &mut String, params: &mut ParamList) {
        sql.push_str("DELETE FROM ");
        sql.push_str(&self.table);
        self.render_guarded_where(sql, params);
        self.render_returning(sql);
    }
}
