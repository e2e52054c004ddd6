//! Query Config
//!
//! The caller-supplied filter/sort/page request, pre-validation. Keys are
//! either model attribute names or `$`-prefixed operator tokens; nesting is
//! only valid under `$and`/`$or`.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::value::ConfigValue;

/// A declarative query request, parsed but not yet validated.
///
/// The root is an object by construction: deserializing anything other than
/// a JSON object fails at the parse boundary, so the validator only has to
/// check nested nodes. Entry order is preserved and flows through to the
/// translated filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryConfig(IndexMap<String, ConfigValue>);

impl QueryConfig {
    /// Create an empty config (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Insert an entry, keeping insertion order.
    pub fn insert(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.0.insert(key.into(), value);
    }

    /// Look up a top-level entry by key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.0.iter()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the config has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying entry map.
    pub fn entries(&self) -> &IndexMap<String, ConfigValue> {
        &self.0
    }
}
