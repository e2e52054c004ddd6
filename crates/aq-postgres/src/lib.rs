//! # aq-postgres
//!
//! PostgreSQL store adapter for AllQuery RS.
//!
//! This crate lowers validated query configs into parameterized SQL using
//! SQLx, including:
//!
//! - Connection pool management
//! - Translation of configs into a backend-native filter tree
//! - Statement assembly with `$n` placeholders for every user value
//!
//! ## Example
//!
//! ```ignore
//! use aq_postgres::{Database, DatabaseConfig, PgStoreAdapter};
//! use aq_core::QueryConfig;
//!
//! let db = Database::connect(&DatabaseConfig::from_env()).await?;
//! let store = PgStoreAdapter::from_information_schema(db.pool().clone(), "users").await?;
//!
//! let config = QueryConfig::from_json_str(r#"{"age": {"$gt": 18}, "$limit": 10}"#)?;
//! let rows = store.fetch(&config).await?;
//! ```

pub mod adapter;
pub mod filter;
pub mod pool;
pub mod translate;

// Re-exports
pub use adapter::{build_json_select, build_order_clause, build_select, PgStoreAdapter};
pub use filter::{CompareOp, Constraint, SqlFilter, SqlParams};
pub use pool::{Database, DatabaseConfig};
pub use translate::{translate, TranslatedQuery};
