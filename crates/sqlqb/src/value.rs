//! Bound values, raw SQL fragments and conflict-update assignments.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, Utc};
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, Kind, ToSql, Type};
use uuid::Uuid;

/// A value bound as a query parameter.
///
/// `Bytes` is a blob and counts as a single item even where a list is
/// expected; `List` is the only variant that expands inside `IN (...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Json(serde_json::Value),
    List(Vec<Value>),
}

impl Value {
    /// Items this value contributes to an `IN` / `NOT IN` list.
    ///
    /// Lists expand, a blob is one item, anything else contributes nothing.
    pub(crate) fn membership_items(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            Self::Bytes(_) => std::slice::from_ref(self),
            _ => &[],
        }
    }

    /// Whether this value is a legal `IN` / `NOT IN` operand in strict mode.
    pub(crate) fn is_membership_operand(&self) -> bool {
        matches!(self, Self::List(_) | Self::Bytes(_))
    }
}

// ─── From conversions ───────────────────────────────────────────────────────

macro_rules! impl_from_value {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl From<Vec<$ty>> for Value {
                fn from(items: Vec<$ty>) -> Self {
                    Value::List(items.into_iter().map(Value::from).collect())
                }
            }

            impl<const N: usize> From<[$ty; N]> for Value {
                fn from(items: [$ty; N]) -> Self {
                    Value::List(items.into_iter().map(Value::from).collect())
                }
            }

            impl From<$ty> for Assignment {
                fn from(value: $ty) -> Self {
                    Assignment::Bind(Value::from(value))
                }
            }
        )*
    };
}

impl_from_value! {
    bool => |v| Value::Bool(v),
    i8 => |v| Value::Int(i64::from(v)),
    i16 => |v| Value::Int(i64::from(v)),
    i32 => |v| Value::Int(i64::from(v)),
    i64 => |v| Value::Int(v),
    u16 => |v| Value::Int(i64::from(v)),
    u32 => |v| Value::Int(i64::from(v)),
    f32 => |v| Value::Float(f64::from(v)),
    f64 => |v| Value::Float(v),
    String => |v| Value::Text(v),
    &str => |v| Value::Text(v.to_owned()),
    &String => |v| Value::Text(v.clone()),
    Uuid => |v| Value::Uuid(v),
    DateTime<Utc> => |v| Value::Timestamp(v),
    NaiveDate => |v| Value::Date(v),
    serde_json::Value => |v| Value::Json(v),
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<bytes::Bytes> for Value {
    fn from(v: bytes::Bytes) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ─── ToSql ──────────────────────────────────────────────────────────────────

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => match *ty {
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                Type::FLOAT8 => (*v as f64).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => match *ty {
                Type::TIMESTAMP => v.naive_utc().to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
            Value::List(items) => {
                if !matches!(ty.kind(), Kind::Array(_)) {
                    return Err(format!("cannot bind a list to non-array type {ty}").into());
                }
                items.to_sql(ty, out)
            }
        }
    }

    // Each variant checks its own target type in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

// ─── Raw expressions / assignments ──────────────────────────────────────────

/// Trusted SQL text spliced verbatim, never bound as a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawExpr(String);

impl RawExpr {
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RawExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `excluded.<column>`: the value proposed for insertion in an upsert.
///
/// ```
/// use sqlqb::excluded;
/// assert_eq!(excluded("name").as_str(), "excluded.name");
/// ```
pub fn excluded(column: &str) -> RawExpr {
    RawExpr(format!("excluded.{column}"))
}

/// Right-hand side of an `ON CONFLICT DO UPDATE SET` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// Bound as a parameter.
    Bind(Value),
    /// Rendered verbatim.
    Raw(RawExpr),
}

impl From<Value> for Assignment {
    fn from(value: Value) -> Self {
        Assignment::Bind(value)
    }
}

impl From<RawExpr> for Assignment {
    fn from(raw: RawExpr) -> Self {
        Assignment::Raw(raw)
    }
}

impl<T: Into<Value>> From<Option<T>> for Assignment {
    fn from(v: Option<T>) -> Self {
        Assignment::Bind(v.into())
    }
}
