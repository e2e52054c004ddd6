//! Model Schema
//!
//! The whitelist of attribute names valid for a data model. Every attribute
//! referenced anywhere in a query config, at any nesting depth, must be a
//! member of this set.

/// An ordered set of unique, case-sensitive attribute names.
///
/// Built once per adapter and immutable afterwards; lookups are linear
/// scans, which is fine for the handful of attributes a model carries.
///
/// Attribute names starting with `$` are not supported: key classification
/// treats every recognized `$` token as an operator, so such a name could
/// never be referenced. This is a documented constraint, not a runtime
/// check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSchema {
    attributes: Vec<String>,
}

impl ModelSchema {
    /// Build a schema from attribute names, keeping first occurrences in
    /// order and dropping duplicates.
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for attribute in attributes {
            let attribute = attribute.into();
            if !unique.contains(&attribute) {
                unique.push(attribute);
            }
        }
        Self { attributes: unique }
    }

    /// Whether `name` is an attribute of the model. Case-sensitive.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }

    /// All attribute names, in declaration order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the schema has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
