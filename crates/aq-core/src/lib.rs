//! # aq-core
//!
//! Core query layer for AllQuery RS.
//!
//! A query config is a declarative, JSON-like filter/sort/pagination request
//! made against a named data model. This crate owns the portable half of the
//! system: the value model, the operator grammar, validation against a
//! model's attribute whitelist, sort normalization, and the adapter
//! contracts concrete backends implement.
//!
//! ## Structure
//!
//! - `value` - The closed value model for config payloads
//! - `config` - The parsed, pre-validation query config
//! - `operator` - Operator tokens and their value-shape contracts
//! - `schema` - The per-model attribute whitelist
//! - `validate` - Recursive-descent config validation
//! - `sort` - Sort criteria and `$sort` normalization
//! - `page` - Offset/limit carried outside the filter
//! - `traits` - Store and framework adapter contracts
//! - `error` - Validation, translation, and store errors
//!
//! ## Example
//!
//! ```
//! use aq_core::{validate, ModelSchema, QueryConfig};
//!
//! let schema = ModelSchema::new(["name", "age"]);
//!
//! let config = QueryConfig::from_json_str(
//!     r#"{"age": {"$gt": 18}, "$sort": "name", "$limit": 10}"#,
//! )
//! .unwrap();
//! assert!(validate(&config, &schema).is_ok());
//!
//! let config = QueryConfig::from_json_str(r#"{"email": "x"}"#).unwrap();
//! assert!(validate(&config, &schema).is_err());
//! ```

pub mod config;
pub mod error;
pub mod operator;
pub mod page;
pub mod schema;
pub mod sort;
pub mod traits;
pub mod validate;
pub mod value;

// Re-exports for convenience
pub use config::QueryConfig;
pub use error::{QueryError, QueryResult, StoreError};
pub use operator::{Operator, ValueShape, CONSTRAINT_OPERATORS};
pub use page::PageSpec;
pub use schema::ModelSchema;
pub use sort::{normalize_sort, SortCriterion, SortDirection, SortOrder};
pub use traits::{FrameworkAdapter, StoreAdapter};
pub use validate::validate;
pub use value::{ConfigValue, Scalar};
