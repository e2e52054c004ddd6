//! Query Values
//!
//! A query config is a tree of JSON-compatible values. The closed sum type
//! here makes impossible shapes unrepresentable; the remaining shape rules
//! (which operator accepts which value) are enforced by the validator.

use indexmap::IndexMap;
use serde::Deserialize;

/// A single value inside a query config.
///
/// Objects preserve insertion order, which is significant for the `$sort`
/// mapping form and for deterministic filter output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// JSON null
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON integer
    Int(i64),
    /// JSON fractional number
    Float(f64),
    /// JSON string
    String(String),
    /// JSON array
    Array(Vec<ConfigValue>),
    /// JSON object, insertion-ordered
    Object(IndexMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Return the bindable scalar form of this value, if it has one.
    ///
    /// Arrays and objects are not scalars.
    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Self::Null => Some(Scalar::Null),
            Self::Bool(b) => Some(Scalar::Bool(*b)),
            Self::Int(n) => Some(Scalar::Int(*n)),
            Self::Float(f) => Some(Scalar::Float(*f)),
            Self::String(s) => Some(Scalar::Text(s.clone())),
            Self::Array(_) | Self::Object(_) => None,
        }
    }
}

/// The subset of config values that can appear in a translated constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}
