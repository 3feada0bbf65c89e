//! Property-based tests for placeholder numbering and deterministic rendering.

use proptest::prelude::*;
use sqlqb::{Op, PlaceholderStyle, QueryBuilder, Value};

/// Numbers of every `$N` placeholder, left to right.
fn dollar_placeholders(sql: &str) -> Vec<usize> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'$' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if let Ok(n) = sql[start..end].parse() {
                found.push(n);
            }
            i = end;
        } else {
            i += 1;
        }
    }
    found
}

#[derive(Debug, Clone)]
enum Cond {
    And(String, i64),
    Or(String, i64),
    In(String, Vec<i64>),
    NotIn(String, Vec<i64>),
    Null(String),
}

fn column() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn cond() -> impl Strategy<Value = Cond> {
    prop_oneof![
        (column(), any::<i64>()).prop_map(|(c, v)| Cond::And(c, v)),
        (column(), any::<i64>()).prop_map(|(c, v)| Cond::Or(c, v)),
        (column(), prop::collection::vec(any::<i64>(), 0..5)).prop_map(|(c, v)| Cond::In(c, v)),
        (column(), prop::collection::vec(any::<i64>(), 0..5)).prop_map(|(c, v)| Cond::NotIn(c, v)),
        column().prop_map(Cond::Null),
    ]
}

fn apply(qb: &mut QueryBuilder, conds: &[Cond]) {
    for c in conds {
        match c {
            Cond::And(col, v) => qb.and_where(col, Op::Eq, *v),
            Cond::Or(col, v) => qb.or_where(col, Op::Gt, *v),
            Cond::In(col, v) => qb.where_in(col, v.clone()),
            Cond::NotIn(col, v) => qb.where_not_in(col, v.clone()),
            Cond::Null(col) => qb.where_null(col),
        };
    }
}

/// Bound values the conditions should produce, in order.
fn expected_params(conds: &[Cond]) -> Vec<Value> {
    conds
        .iter()
        .flat_map(|c| match c {
            Cond::And(_, v) | Cond::Or(_, v) => vec![Value::Int(*v)],
            Cond::In(_, v) | Cond::NotIn(_, v) => v.iter().map(|n| Value::Int(*n)).collect(),
            Cond::Null(_) => Vec::new(),
        })
        .collect()
}

fn shuffled_assignments() -> impl Strategy<Value = Vec<(String, i64)>> {
    prop::collection::hash_map("[a-z]{1,6}", any::<i64>(), 1..12).prop_flat_map(|m| {
        let entries: Vec<(String, i64)> = m.into_iter().collect();
        Just(entries).prop_shuffle()
    })
}

// =============================================================================
// Placeholder alignment
// =============================================================================

proptest! {
    /// `$1..$N` appear in order and match the parameter list exactly
    #[test]
    fn placeholders_align_with_params(conds in prop::collection::vec(cond(), 0..12)) {
        let mut qb = QueryBuilder::new();
        qb.select(&["id"]).from("t");
        apply(&mut qb, &conds);
        let q = qb.build();

        let numbers = dollar_placeholders(&q.sql);
        let expected: Vec<usize> = (1..=q.params.len()).collect();
        prop_assert_eq!(numbers, expected, "sql: {}", q.sql);
        prop_assert_eq!(q.params, expected_params(&conds));
    }

    /// One `?` per bound parameter
    #[test]
    fn question_marks_match_param_count(conds in prop::collection::vec(cond(), 0..12)) {
        let mut qb = QueryBuilder::new();
        qb.with_placeholders(PlaceholderStyle::QuestionMark)
            .delete("t");
        apply(&mut qb, &conds);
        let q = qb.build();

        prop_assert_eq!(q.sql.matches('?').count(), q.params.len());
        prop_assert!(!q.sql.contains('$'));
    }

    /// Numbering restarts at `$1` for every build on the same builder
    #[test]
    fn numbering_restarts_each_build(
        first in prop::collection::vec(cond(), 0..8),
        second in prop::collection::vec(cond(), 0..8),
    ) {
        let mut qb = QueryBuilder::new();
        for conds in [&first, &second] {
            qb.update("t").set_update("v", 0);
            apply(&mut qb, conds);
            let q = qb.build();
            let numbers = dollar_placeholders(&q.sql);
            prop_assert_eq!(numbers.first().copied(), Some(1));
            prop_assert_eq!(numbers.len(), q.params.len());
        }
    }
}

// =============================================================================
// Deterministic key ordering
// =============================================================================

proptest! {
    /// Insertion order of assignments never changes the output
    #[test]
    fn insert_is_order_independent(entries in shuffled_assignments()) {
        let mut forward = QueryBuilder::new();
        forward.insert("t");
        for (col, v) in &entries {
            forward.set(col, *v);
        }

        let mut backward = QueryBuilder::new();
        backward.insert("t");
        for (col, v) in entries.iter().rev() {
            backward.set(col, *v);
        }

        prop_assert_eq!(forward.build(), backward.build());
    }

    /// UPDATE SET renders columns sorted and binds values in that order
    #[test]
    fn update_renders_sorted(entries in shuffled_assignments()) {
        let mut qb = QueryBuilder::new();
        qb.update("t").update_values(entries.clone()).and_where("id", Op::Eq, 0);
        let q = qb.build();

        let mut sorted = entries;
        sorted.sort();
        let set_clause = sorted
            .iter()
            .enumerate()
            .map(|(i, (col, _))| format!("{col} = ${}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        prop_assert_eq!(
            q.sql,
            format!("UPDATE t SET {set_clause} WHERE id = ${}", sorted.len() + 1)
        );

        let mut expected: Vec<Value> = sorted.iter().map(|(_, v)| Value::Int(*v)).collect();
        expected.push(Value::Int(0));
        prop_assert_eq!(q.params, expected);
    }
}
