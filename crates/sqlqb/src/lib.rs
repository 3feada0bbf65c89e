//! # sqlqb
//!
//! A fluent, reusable SQL statement builder.
//!
//! ## Features
//!
//! - **Parameterized output**: every value is bound; the Nth placeholder is the Nth parameter
//! - **Two dialects**: `$1, $2, ...` (Postgres) or `?` (MySQL / SQLite)
//! - **Deterministic**: column maps render in sorted key order
//! - **Safe defaults**: UPDATE / DELETE without WHERE are guarded with `WHERE 1=0`
//! - **Upserts**: `ON CONFLICT ... DO NOTHING / DO UPDATE SET` with raw `excluded.*` values
//!
//! The builder never executes anything. [`BuiltQuery::params_ref`] hands the
//! parameters to a `tokio-postgres` client.
//!
//! ```
//! use sqlqb::{QueryBuilder, Value, excluded};
//!
//! let mut qb = QueryBuilder::new();
//! let q = qb
//!     .insert("users")
//!     .set("id", 1)
//!     .set("name", "A")
//!     .on_conflict(&["id"])
//!     .on_conflict_set("name", excluded("name"))
//!     .returning(&["id"])
//!     .build();
//!
//! assert_eq!(
//!     q.sql,
//!     "INSERT INTO users (id, name) VALUES ($1, $2) ON CONFLICT (id) DO UPDATE SET name = excluded.name RETURNING id"
//! );
//! assert_eq!(q.params, vec![Value::Int(1), Value::from("A")]);
//! ```
//!
//! Enable the default `tracing` feature to get a `DEBUG` event (target
//! `sqlqb.sql`) for every rendered statement.

pub mod config;
pub mod error;
pub mod param;
pub mod qb;
pub mod value;

pub use config::QbConfig;
pub use error::{QbError, QbResult};
pub use param::{BuiltQuery, PlaceholderStyle};
pub use qb::{Combinator, JoinKind, Op, QueryBuilder, StatementKind, WRITE_GUARD};
pub use value::{Assignment, RawExpr, Value, excluded};
