//! Backend Translator
//!
//! Lowers a validated query config into the PostgreSQL-native
//! [`TranslatedQuery`]: a filter tree plus the sort and page specs carried
//! outside it. Translation is pure; its only effect is returning an error.
//!
//! Bare attributes are lowered first in config order, then the constraint
//! operators in their fixed vocabulary order, then `$or`/`$and` recursion.
//! `$skip`, `$limit`, and `$sort` are read at the root only; inside nested
//! configs they validate but translate to nothing.

use aq_core::{
    normalize_sort, ConfigValue, ModelSchema, Operator, PageSpec, QueryConfig, QueryError,
    QueryResult, Scalar, SortOrder, CONSTRAINT_OPERATORS,
};
use indexmap::IndexMap;

use crate::filter::{CompareOp, Constraint, SqlFilter};

/// A query config lowered to store-executable form.
///
/// Filter, sort, and page together fully determine the store query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslatedQuery {
    pub filter: SqlFilter,
    pub sort: Option<SortOrder>,
    pub page: PageSpec,
}

/// Lower `config` into a [`TranslatedQuery`].
///
/// Callers run [`aq_core::validate`] first; translation assumes a
/// structurally valid config and re-checks only the narrower constraints it
/// owns: membership values must be arrays of scalars, comparison values
/// scalars, patterns strings, page numbers non-negative integers, and
/// `$sort` mapping attributes schema members.
pub fn translate(config: &QueryConfig, schema: &ModelSchema) -> QueryResult<TranslatedQuery> {
    let filter = translate_entries(config.entries(), schema, "")?;

    let mut page = PageSpec::default();
    if let Some(value) = config.get(Operator::Skip.token()) {
        page.offset = Some(page_value(value, Operator::Skip.token())?);
    }
    if let Some(value) = config.get(Operator::Limit.token()) {
        page.limit = Some(page_value(value, Operator::Limit.token())?);
    }

    let sort = match config.get(Operator::Sort.token()) {
        Some(value) => Some(normalize_sort(value, schema)?),
        None => None,
    };

    Ok(TranslatedQuery { filter, sort, page })
}

fn translate_entries(
    entries: &IndexMap<String, ConfigValue>,
    schema: &ModelSchema,
    path: &str,
) -> QueryResult<SqlFilter> {
    let mut filter = SqlFilter::new();

    // Bare attributes first, in config order. Validation has already
    // rejected unknown keys, so anything else is skipped here.
    for (key, value) in entries {
        if Operator::from_token(key).is_some() || !schema.contains(key) {
            continue;
        }
        add_implicit(&mut filter, key, value, &join_path(path, key))?;
    }

    // Operator-major constraints merge in fixed vocabulary order, not in
    // config entry order.
    for operator in CONSTRAINT_OPERATORS {
        let Some(value) = entries.get(operator.token()) else {
            continue;
        };
        let op_path = join_path(path, operator.token());
        let ConfigValue::Object(per_attribute) = value else {
            return Err(QueryError::InvalidValue {
                path: op_path,
                expected: "an object mapping attributes to values",
            });
        };
        for (attribute, op_value) in per_attribute {
            if !schema.contains(attribute) {
                return Err(QueryError::UnknownAttribute {
                    attribute: attribute.clone(),
                    path: op_path.clone(),
                });
            }
            let constraint = build_constraint(operator, op_value, &join_path(&op_path, attribute))?;
            filter.add_constraint(attribute, constraint);
        }
    }

    if let Some(value) = entries.get(Operator::Or.token()) {
        let or_path = join_path(path, Operator::Or.token());
        match value {
            ConfigValue::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let group = translate_node(item, schema, &format!("{or_path}[{index}]"))?;
                    filter.add_or_group(group);
                }
            }
            // A single nested config becomes an OR with one branch.
            ConfigValue::Object(_) => {
                let group = translate_node(value, schema, &or_path)?;
                filter.add_or_group(group);
            }
            _ => {
                return Err(QueryError::InvalidValue {
                    path: or_path,
                    expected: "an object or an array",
                })
            }
        }
    }

    if let Some(value) = entries.get(Operator::And.token()) {
        let and_path = join_path(path, Operator::And.token());
        match value {
            ConfigValue::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let group = translate_node(item, schema, &format!("{and_path}[{index}]"))?;
                    filter.add_and_group(group);
                }
            }
            ConfigValue::Object(_) => {
                let group = translate_node(value, schema, &and_path)?;
                filter.add_and_group(group);
            }
            _ => {
                return Err(QueryError::InvalidValue {
                    path: and_path,
                    expected: "an object or an array",
                })
            }
        }
    }

    Ok(filter)
}

fn translate_node(value: &ConfigValue, schema: &ModelSchema, path: &str) -> QueryResult<SqlFilter> {
    match value {
        ConfigValue::Object(entries) => translate_entries(entries, schema, path),
        _ => Err(QueryError::InvalidShape {
            path: path.to_string(),
        }),
    }
}

/// Lower a bare attribute entry: scalar means equality, array means
/// membership, and an object is an attribute-major operator map like
/// `{"age": {"$gt": 18}}`.
fn add_implicit(
    filter: &mut SqlFilter,
    attribute: &str,
    value: &ConfigValue,
    path: &str,
) -> QueryResult<()> {
    match value {
        ConfigValue::Array(items) => {
            filter.add_constraint(
                attribute,
                Constraint::Membership {
                    negated: false,
                    values: scalar_items(items, path)?,
                },
            );
            Ok(())
        }
        ConfigValue::Object(operators) => {
            for (token, op_value) in operators {
                let op_path = join_path(path, token);
                let Some(operator) =
                    Operator::from_token(token).filter(|op| op.is_constraint())
                else {
                    return Err(QueryError::InvalidValue {
                        path: op_path,
                        expected: "a comparison, membership, or pattern operator",
                    });
                };
                let constraint = build_constraint(operator, op_value, &op_path)?;
                filter.add_constraint(attribute, constraint);
            }
            Ok(())
        }
        scalar_value => {
            if let Some(scalar) = scalar_value.as_scalar() {
                filter.add_constraint(
                    attribute,
                    Constraint::Compare {
                        op: CompareOp::Eq,
                        value: scalar,
                    },
                );
            }
            Ok(())
        }
    }
}

fn build_constraint(
    operator: Operator,
    value: &ConfigValue,
    path: &str,
) -> QueryResult<Constraint> {
    match operator {
        Operator::In | Operator::Nin => {
            // The narrower membership check: validation accepted the
            // operator-level shape, array-ness per attribute lands here.
            let ConfigValue::Array(items) = value else {
                return Err(QueryError::InvalidValue {
                    path: path.to_string(),
                    expected: "an array",
                });
            };
            Ok(Constraint::Membership {
                negated: operator == Operator::Nin,
                values: scalar_items(items, path)?,
            })
        }
        Operator::Like | Operator::NotLike => match value {
            ConfigValue::String(pattern) => Ok(Constraint::Pattern {
                negated: operator == Operator::NotLike,
                pattern: pattern.clone(),
            }),
            _ => Err(QueryError::InvalidValue {
                path: path.to_string(),
                expected: "a string pattern",
            }),
        },
        _ => {
            let Some(op) = compare_op(operator) else {
                return Err(QueryError::InvalidValue {
                    path: path.to_string(),
                    expected: "a comparison, membership, or pattern operator",
                });
            };
            let Some(scalar) = value.as_scalar() else {
                return Err(QueryError::InvalidValue {
                    path: path.to_string(),
                    expected: "a scalar value",
                });
            };
            Ok(Constraint::Compare { op, value: scalar })
        }
    }
}

fn compare_op(operator: Operator) -> Option<CompareOp> {
    match operator {
        Operator::Eq => Some(CompareOp::Eq),
        Operator::Ne => Some(CompareOp::Ne),
        Operator::Gt => Some(CompareOp::Gt),
        Operator::Gte => Some(CompareOp::Gte),
        Operator::Lt => Some(CompareOp::Lt),
        Operator::Lte => Some(CompareOp::Lte),
        _ => None,
    }
}

fn scalar_items(items: &[ConfigValue], path: &str) -> QueryResult<Vec<Scalar>> {
    items
        .iter()
        .map(|item| {
            item.as_scalar().ok_or_else(|| QueryError::InvalidValue {
                path: path.to_string(),
                expected: "an array of scalars",
            })
        })
        .collect()
}

fn page_value(value: &ConfigValue, path: &str) -> QueryResult<u64> {
    match value {
        ConfigValue::Int(n) if *n >= 0 => Ok(*n as u64),
        ConfigValue::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Ok(*f as u64),
        _ => Err(QueryError::InvalidValue {
            path: path.to_string(),
            expected: "a non-negative integer",
        }),
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
