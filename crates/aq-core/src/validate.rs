//! Query Validator
//!
//! Recursive-descent check of a query config against the operator grammar
//! and a model's attribute whitelist. The walk is fail-fast: the first
//! violation aborts with the offending path, and a rejected config must be
//! discarded whole.
//!
//! Key classification is purely by operator-table membership. A constraint
//! operator (comparison, membership, pattern) with an object value applies
//! per attribute: each inner key is checked as a model attribute and the
//! operator's shape validator runs against each inner value. Every other
//! operator value, and a constraint operator's non-object value, gets the
//! shape validator directly. Bare attribute keys only need schema
//! membership, their values are unconstrained.

use indexmap::IndexMap;

use crate::config::QueryConfig;
use crate::error::{QueryError, QueryResult};
use crate::operator::{Operator, ValueShape};
use crate::schema::ModelSchema;
use crate::value::ConfigValue;

/// Check a query config against `schema`.
///
/// The root is an object by construction; nested nodes reached through
/// `$and`/`$or` are shape-checked here.
pub fn validate(config: &QueryConfig, schema: &ModelSchema) -> QueryResult<()> {
    validate_entries(config.entries(), schema, "")
}

fn validate_node(value: &ConfigValue, schema: &ModelSchema, path: &str) -> QueryResult<()> {
    match value {
        ConfigValue::Object(entries) => validate_entries(entries, schema, path),
        _ => Err(QueryError::InvalidShape {
            path: path.to_string(),
        }),
    }
}

fn validate_entries(
    entries: &IndexMap<String, ConfigValue>,
    schema: &ModelSchema,
    path: &str,
) -> QueryResult<()> {
    for (key, value) in entries {
        let current = join_path(path, key);
        match Operator::from_token(key) {
            Some(operator) => match value {
                // A constraint operator applied per attribute: the shape
                // contract holds for each inner value, not the object
                // itself. Logical, number, and sort values always go to
                // their shape validator whole, so a `$sort` mapping stays
                // structural here and `$or`/`$and` mappings recurse as
                // nested configs.
                ConfigValue::Object(inner) if operator.is_constraint() => {
                    for (attribute, inner_value) in inner {
                        if !schema.contains(attribute) {
                            return Err(QueryError::UnknownAttribute {
                                attribute: attribute.clone(),
                                path: current,
                            });
                        }
                        validate_shape(operator, inner_value, schema, &current)?;
                    }
                }
                _ => validate_shape(operator, value, schema, &current)?,
            },
            None => {
                if !schema.contains(key) {
                    return Err(QueryError::UnknownAttribute {
                        attribute: key.clone(),
                        path: current,
                    });
                }
                // Bare attribute: implicit equality/membership, value
                // unconstrained.
            }
        }
    }
    Ok(())
}

fn validate_shape(
    operator: Operator,
    value: &ConfigValue,
    schema: &ModelSchema,
    path: &str,
) -> QueryResult<()> {
    match operator.value_shape() {
        ValueShape::Object => match value {
            ConfigValue::Object(_) => Ok(()),
            _ => Err(QueryError::InvalidValue {
                path: path.to_string(),
                expected: "an object",
            }),
        },
        ValueShape::Array => match value {
            ConfigValue::Array(_) => Ok(()),
            _ => Err(QueryError::InvalidValue {
                path: path.to_string(),
                expected: "an array",
            }),
        },
        ValueShape::Number => match value {
            ConfigValue::Int(_) | ConfigValue::Float(_) => Ok(()),
            _ => Err(QueryError::InvalidValue {
                path: path.to_string(),
                expected: "a number",
            }),
        },
        ValueShape::Logical => match value {
            ConfigValue::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    validate_node(item, schema, &format!("{path}[{index}]"))?;
                }
                Ok(())
            }
            ConfigValue::Object(_) => validate_node(value, schema, path),
            _ => Err(QueryError::InvalidValue {
                path: path.to_string(),
                expected: "an object or an array",
            }),
        },
        // Structural check only. Attribute membership for the mapping form
        // is deferred to sort normalization at translation time.
        ValueShape::Sort => match value {
            ConfigValue::String(_) | ConfigValue::Array(_) | ConfigValue::Object(_) => Ok(()),
            _ => Err(QueryError::InvalidValue {
                path: path.to_string(),
                expected: "a string, an array, or an object",
            }),
        },
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ModelSchema {
        ModelSchema::new(["name", "age", "tags"])
    }

    fn config(json: &str) -> QueryConfig {
        QueryConfig::from_json_str(json).unwrap()
    }

    #[test]
    fn test_accepts_empty_config() {
        assert!(validate(&QueryConfig::new(), &schema()).is_ok());
    }

    #[test]
    fn test_accepts_known_attributes_with_any_value() {
        let config = config(r#"{"name": "alice", "age": 30, "tags": [1, 2]}"#);
        assert!(validate(&config, &schema()).is_ok());
    }

    #[test]
    fn test_rejects_unknown_attribute() {
        let err = validate(&config(r#"{"email": "x"}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownAttribute {
                attribute: "email".to_string(),
                path: "email".to_string(),
            }
        );
    }

    #[test]
    fn test_attribute_major_operator_map_is_unconstrained() {
        // The inner $gt is an attribute value here, not an operator entry.
        let config = config(r#"{"age": {"$gt": 18}}"#);
        assert!(validate(&config, &schema()).is_ok());
    }

    #[test]
    fn test_operator_object_checks_inner_attributes() {
        let err = validate(&config(r#"{"$eq": {"email": "x"}}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownAttribute {
                attribute: "email".to_string(),
                path: "$eq".to_string(),
            }
        );
    }

    #[test]
    fn test_comparison_shape_applies_to_inner_values() {
        // The object shape contract holds per inner value, so a scalar
        // under $gt fails even though the attribute is known.
        let err = validate(&config(r#"{"$gt": {"age": 18}}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$gt".to_string(),
                expected: "an object",
            }
        );
    }

    #[test]
    fn test_comparison_rejects_bare_null() {
        let err = validate(&config(r#"{"$eq": null}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$eq".to_string(),
                expected: "an object",
            }
        );
    }

    #[test]
    fn test_membership_accepts_array_inner_values() {
        let config = config(r#"{"$in": {"tags": [1, 2]}, "$nin": {"age": [30]}}"#);
        assert!(validate(&config, &schema()).is_ok());
    }

    #[test]
    fn test_membership_rejects_non_array_inner_value() {
        let err = validate(&config(r#"{"$in": {"tags": 5}}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$in".to_string(),
                expected: "an array",
            }
        );
    }

    #[test]
    fn test_membership_accepts_bare_array() {
        // Shape validator applied directly; translation rejects this form.
        let config = config(r#"{"$in": [1, 2]}"#);
        assert!(validate(&config, &schema()).is_ok());
    }

    #[test]
    fn test_pattern_operators_validate_like_comparisons() {
        // Same per-inner-value object contract as $eq: a scalar pattern
        // under operator-major $like fails; the usable form is
        // attribute-major, e.g. {"name": {"$like": "ali%"}}.
        let err = validate(&config(r#"{"$like": {"name": "ali%"}}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$like".to_string(),
                expected: "an object",
            }
        );

        let err = validate(&config(r#"{"$notlike": {"email": "x%"}}"#), &schema()).unwrap_err();
        assert!(matches!(err, QueryError::UnknownAttribute { .. }));

        let attribute_major = config(r#"{"name": {"$like": "ali%"}}"#);
        assert!(validate(&attribute_major, &schema()).is_ok());
    }

    #[test]
    fn test_number_operators() {
        assert!(validate(&config(r#"{"$skip": 5, "$limit": 10}"#), &schema()).is_ok());

        let err = validate(&config(r#"{"$limit": "ten"}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$limit".to_string(),
                expected: "a number",
            }
        );
    }

    #[test]
    fn test_logical_array_recurses_with_index() {
        let config = config(r#"{"$or": [{"name": "a"}, {"email": "x"}]}"#);
        let err = validate(&config, &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownAttribute {
                attribute: "email".to_string(),
                path: "$or[1].email".to_string(),
            }
        );
    }

    #[test]
    fn test_logical_single_mapping_recurses_as_nested_config() {
        let ok = config(r#"{"$or": {"name": "a", "age": {"$gt": 18}}}"#);
        assert!(validate(&ok, &schema()).is_ok());

        let err = validate(&config(r#"{"$or": {"bogus": 1}}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownAttribute {
                attribute: "bogus".to_string(),
                path: "$or.bogus".to_string(),
            }
        );
    }

    #[test]
    fn test_logical_array_element_must_be_object() {
        let err = validate(&config(r#"{"$or": [{"name": "a"}, 5]}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidShape {
                path: "$or[1]".to_string(),
            }
        );
    }

    #[test]
    fn test_logical_rejects_scalar_value() {
        let err = validate(&config(r#"{"$and": 5}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$and".to_string(),
                expected: "an object or an array",
            }
        );
    }

    #[test]
    fn test_deeply_nested_unknown_attribute() {
        let config = config(
            r#"{"$and": [{"$or": [{"age": 1}, {"bogus": 2}]}]}"#,
        );
        let err = validate(&config, &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownAttribute {
                attribute: "bogus".to_string(),
                path: "$and[0].$or[1].bogus".to_string(),
            }
        );
    }

    #[test]
    fn test_sort_is_structural_only() {
        // Unknown attributes pass here; normalization checks the mapping
        // form at translation time.
        let config = config(r#"{"$sort": {"height": 1}}"#);
        assert!(validate(&config, &schema()).is_ok());

        let config = QueryConfig::from_json_str(r#"{"$sort": "height"}"#).unwrap();
        assert!(validate(&config, &schema()).is_ok());

        let config = QueryConfig::from_json_str(r#"{"$sort": ["name", "age"]}"#).unwrap();
        assert!(validate(&config, &schema()).is_ok());
    }

    #[test]
    fn test_sort_rejects_number() {
        let err = validate(&config(r#"{"$sort": 5}"#), &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidValue {
                path: "$sort".to_string(),
                expected: "a string, an array, or an object",
            }
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let config = config(r#"{"bogus": 1, "also_bogus": 2}"#);
        let err = validate(&config, &schema()).unwrap_err();
        assert_eq!(
            err,
            QueryError::UnknownAttribute {
                attribute: "bogus".to_string(),
                path: "bogus".to_string(),
            }
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let config = config(r#"{"$or": [{"name": "a"}], "age": 30, "$limit": 3}"#);
        let first = validate(&config, &schema());
        let second = validate(&config, &schema());
        assert_eq!(first, second);

        let bad = QueryConfig::from_json_str(r#"{"email": "x"}"#).unwrap();
        assert_eq!(
            validate(&bad, &schema()),
            validate(&bad, &schema())
        );
    }
}
