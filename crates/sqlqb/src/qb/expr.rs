//! Predicates and the shared predicate renderer used by WHERE and HAVING.

use crate::param::ParamList;
use crate::value::Value;
use std::fmt;

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    Like,
    NotLike,
}

impl Op {
    /// SQL text of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::IsNull => "IS NULL",
            Op::IsNotNull => "IS NOT NULL",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
        }
    }

    /// Whether the operand is a list (`IN` / `NOT IN`).
    pub fn is_membership(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    /// Whether the operator takes no operand (`IS NULL` / `IS NOT NULL`).
    pub fn is_nullary(self) -> bool {
        matches!(self, Op::IsNull | Op::IsNotNull)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// How a predicate joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn as_sql(self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Predicate {
    pub(crate) column: String,
    pub(crate) op: Op,
    pub(crate) value: Value,
    pub(crate) combinator: Combinator,
}

impl Predicate {
    pub(crate) fn new(column: &str, op: Op, value: Value, combinator: Combinator) -> Self {
        Self {
            column: column.to_string(),
            op,
            value,
            combinator,
        }
    }
}

/// Render predicates left to right, binding operands in order.
///
/// The first predicate's combinator is ignored. Empty membership lists render
/// as `(1=0)` for `IN` and `(1=1)` for `NOT IN` and bind nothing.
pub(crate) fn render_predicates(
    predicates: &[Predicate],
    sql: &mut String,
    params: &mut ParamList,
) {
    for (i, pred) in predicates.iter().enumerate() {
        if i > 0 {
            sql.push(' ');
            sql.push_str(pred.combinator.as_sql());
            sql.push(' ');
        }

        match pred.op {
            Op::IsNull | Op::IsNotNull => {
                sql.push_str(&pred.column);
                sql.push(' ');
                sql.push_str(pred.op.as_sql());
            }
            Op::In | Op::NotIn => {
                let items = pred.value.membership_items();
                if items.is_empty() {
                    sql.push_str(if pred.op == Op::In { "(1=0)" } else { "(1=1)" });
                    continue;
                }
                sql.push_str(&pred.column);
                sql.push(' ');
                sql.push_str(pred.op.as_sql());
                sql.push_str(" (");
                for (j, item) in items.iter().enumerate() {
                    if j > 0 {
                        sql.push_str(", ");
                    }
                    params.bind(sql, item.clone());
                }
                sql.push(')');
            }
            _ => {
                sql.push_str(&pred.column);
                sql.push(' ');
                sql.push_str(pred.op.as_sql());
                sql.push(' ');
                params.bind(sql, pred.value.clone());
            }
        }
    }
}
