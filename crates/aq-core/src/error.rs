//! Error types for query validation, translation, and store execution.

use thiserror::Error;

/// Result alias for validation and translation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while checking or lowering a query config.
///
/// Every variant carries the path of the offending node, accumulated as a
/// dotted/indexed string (`"a.b"`, `"$or[1].name"`). Validation and
/// translation are fail-fast: the first violation aborts the walk.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// A nested node reached through `$and`/`$or` is not an object.
    #[error("invalid query config at {path}: expected an object")]
    InvalidShape { path: String },

    /// A key, or an attribute nested under an operator or sort mapping,
    /// is not part of the model schema.
    #[error("invalid attribute at {path}: {attribute} is not an attribute of the model")]
    UnknownAttribute { attribute: String, path: String },

    /// An operator's value does not have the shape its grammar requires.
    #[error("invalid value at {path}: expected {expected}")]
    InvalidValue { path: String, expected: &'static str },
}

/// Errors raised at the store execution boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The query config was rejected before reaching the store.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The backend failed to execute the translated query. The message is
    /// carried verbatim; the core does not interpret store failures.
    #[error("store backend error: {message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
