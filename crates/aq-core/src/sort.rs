//! Sort Orders
//!
//! Sort orders define how query results should be ordered. The `$sort`
//! operator accepts three forms; `normalize_sort` lowers all of them into a
//! single ordered list of (attribute, direction) criteria.

use crate::error::{QueryError, QueryResult};
use crate::schema::ModelSchema;
use crate::value::ConfigValue;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    Desc,
}

impl SortDirection {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A single sort criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortCriterion {
    /// The attribute to sort by
    pub attribute: String,
    /// The sort direction
    pub direction: SortDirection,
}

impl SortCriterion {
    /// Create a new sort criterion
    pub fn new(attribute: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            attribute: attribute.into(),
            direction,
        }
    }

    /// Create ascending sort
    pub fn asc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, SortDirection::Asc)
    }

    /// Create descending sort
    pub fn desc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, SortDirection::Desc)
    }
}

/// Ordered collection of sort criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder {
    criteria: Vec<SortCriterion>,
}

impl SortOrder {
    /// Create a new empty sort order
    pub fn new() -> Self {
        Self { criteria: vec![] }
    }

    /// Add a sort criterion
    pub fn add(&mut self, criterion: SortCriterion) -> &mut Self {
        self.criteria.push(criterion);
        self
    }

    /// Get all sort criteria
    pub fn criteria(&self) -> &[SortCriterion] {
        &self.criteria
    }

    /// Check if any sort is defined
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Get number of sort criteria
    pub fn len(&self) -> usize {
        self.criteria.len()
    }
}

/// Normalize a `$sort` value into an ordered sort specification.
///
/// Accepted forms:
/// - a string: sort ascending by that attribute;
/// - an array of strings: sort ascending by each, order preserved;
/// - a mapping of attribute to direction code: `1` means ascending, any
///   other code means descending, entry order preserved.
///
/// Only the mapping form checks attributes against the schema. The string
/// and array forms pass through unchecked, mirroring the validator, which
/// defers all `$sort` attribute checking to this point; unknown attributes
/// in those forms surface as store errors when the order clause executes.
pub fn normalize_sort(value: &ConfigValue, schema: &ModelSchema) -> QueryResult<SortOrder> {
    let mut order = SortOrder::new();
    match value {
        ConfigValue::String(attribute) => {
            order.add(SortCriterion::asc(attribute.clone()));
        }
        ConfigValue::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                match item {
                    ConfigValue::String(attribute) => {
                        order.add(SortCriterion::asc(attribute.clone()));
                    }
                    _ => {
                        return Err(QueryError::InvalidValue {
                            path: format!("$sort[{index}]"),
                            expected: "a string",
                        })
                    }
                }
            }
        }
        ConfigValue::Object(entries) => {
            for (attribute, code) in entries {
                if !schema.contains(attribute) {
                    return Err(QueryError::UnknownAttribute {
                        attribute: attribute.clone(),
                        path: "$sort".to_string(),
                    });
                }
                let direction = if is_ascending_code(code) {
                    SortDirection::Asc
                } else {
                    SortDirection::Desc
                };
                order.add(SortCriterion::new(attribute.clone(), direction));
            }
        }
        _ => {
            return Err(QueryError::InvalidValue {
                path: "$sort".to_string(),
                expected: "a string, an array, or an object",
            })
        }
    }
    Ok(order)
}

/// A direction code means ascending only when it equals the number 1.
fn is_ascending_code(code: &ConfigValue) -> bool {
    match code {
        ConfigValue::Int(n) => *n == 1,
        ConfigValue::Float(f) => *f == 1.0,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ModelSchema {
        ModelSchema::new(["name", "age", "city"])
    }

    #[test]
    fn test_sort_direction_as_str() {
        assert_eq!(SortDirection::Asc.as_str(), "asc");
        assert_eq!(SortDirection::Desc.as_str(), "desc");
    }

    #[test]
    fn test_sort_criterion() {
        let criterion = SortCriterion::asc("name");
        assert_eq!(criterion.attribute, "name");
        assert_eq!(criterion.direction, SortDirection::Asc);

        let criterion = SortCriterion::desc("age");
        assert_eq!(criterion.direction, SortDirection::Desc);
    }

    #[test]
    fn test_normalize_string_form() {
        let value = ConfigValue::String("name".to_string());
        let order = normalize_sort(&value, &schema()).unwrap();
        assert_eq!(order.criteria(), [SortCriterion::asc("name")]);
    }

    #[test]
    fn test_normalize_array_form_preserves_order() {
        let value: ConfigValue = serde_json::from_str(r#"["city", "name"]"#).unwrap();
        let order = normalize_sort(&value, &schema()).unwrap();
        assert_eq!(
            order.criteria(),
            [SortCriterion::asc("city"), SortCriterion::asc("name")]
        );
    }

    #[test]
    fn test_normalize_array_rejects_non_string_element() {
        let value: ConfigValue = serde_json::from_str(r#"["name", 5]"#).unwrap();
        let err = normalize_sort(&value, &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$sort[1]".to_string(),
                expected: "a string",
            }
        );
    }

    #[test]
    fn test_normalize_map_form_preserves_order() {
        let value: ConfigValue = serde_json::from_str(r#"{"name": 1, "age": -1}"#).unwrap();
        let order = normalize_sort(&value, &schema()).unwrap();
        assert_eq!(
            order.criteria(),
            [SortCriterion::asc("name"), SortCriterion::desc("age")]
        );
    }

    #[test]
    fn test_normalize_map_rejects_unknown_attribute() {
        let value: ConfigValue = serde_json::from_str(r#"{"height": 1}"#).unwrap();
        let err = normalize_sort(&value, &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownAttribute {
                attribute: "height".to_string(),
                path: "$sort".to_string(),
            }
        );
    }

    #[test]
    fn test_normalize_direction_codes() {
        let value: ConfigValue =
            serde_json::from_str(r#"{"name": 1.0, "age": 2, "city": "asc"}"#).unwrap();
        let order = normalize_sort(&value, &schema()).unwrap();
        // Only the number 1 means ascending; every other code descends.
        assert_eq!(
            order.criteria(),
            [
                SortCriterion::asc("name"),
                SortCriterion::desc("age"),
                SortCriterion::desc("city"),
            ]
        );
    }

    #[test]
    fn test_normalize_rejects_other_shapes() {
        let err = normalize_sort(&ConfigValue::Int(1), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$sort".to_string(),
                expected: "a string, an array, or an object",
            }
        );

        let err = normalize_sort(&ConfigValue::Bool(true), &schema()).unwrap_err();
        assert!(matches!(err, QueryError::InvalidValue { .. }));
    }

    #[test]
    fn test_string_and_array_forms_skip_schema_check() {
        let value = ConfigValue::String("height".to_string());
        assert!(normalize_sort(&value, &schema()).is_ok());

        let value: ConfigValue = serde_json::from_str(r#"["height"]"#).unwrap();
        assert!(normalize_sort(&value, &schema()).is_ok());
    }
}
