//! SQL Filter Tree
//!
//! The PostgreSQL-native form of a translated query config: per-attribute
//! constraint lists plus nested OR/AND groups, rendered to a WHERE fragment
//! with `$n` placeholders and the bind parameters collected alongside.

use aq_core::Scalar;
use indexmap::IndexMap;

/// Comparison operators over a single scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    fn sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// A single constraint on one attribute.
///
/// Multiple constraints on the same attribute accumulate and are conjoined;
/// the translator never overwrites an earlier constraint with a later one.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Scalar comparison: `=`, `<>`, `>`, `>=`, `<`, `<=`.
    Compare { op: CompareOp, value: Scalar },
    /// `IN` / `NOT IN` over a list of scalars.
    Membership { negated: bool, values: Vec<Scalar> },
    /// `LIKE` / `NOT LIKE` against a caller-supplied pattern.
    Pattern { negated: bool, pattern: String },
}

/// Collects bind parameters during rendering, in placeholder order.
#[derive(Debug, Default)]
pub struct SqlParams {
    values: Vec<Scalar>,
}

impl SqlParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter and return its `$n` placeholder.
    pub(crate) fn push(&mut self, value: Scalar) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    /// Parameters in placeholder order.
    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Backend-native filter tree for one query.
///
/// Attribute order and per-attribute constraint order follow translation
/// order, so rendering is deterministic for a given config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    constraints: IndexMap<String, Vec<Constraint>>,
    or_groups: Vec<SqlFilter>,
    and_groups: Vec<SqlFilter>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a constraint to an attribute's accumulated set.
    pub fn add_constraint(&mut self, attribute: impl Into<String>, constraint: Constraint) {
        self.constraints
            .entry(attribute.into())
            .or_default()
            .push(constraint);
    }

    /// Add one branch of a logical OR.
    pub fn add_or_group(&mut self, group: SqlFilter) {
        self.or_groups.push(group);
    }

    /// Add one conjoined AND group.
    pub fn add_and_group(&mut self, group: SqlFilter) {
        self.and_groups.push(group);
    }

    /// Constraints per attribute, in translation order.
    pub fn constraints(&self) -> &IndexMap<String, Vec<Constraint>> {
        &self.constraints
    }

    /// Branches of the logical OR, if any.
    pub fn or_groups(&self) -> &[SqlFilter] {
        &self.or_groups
    }

    /// Conjoined groups, if any.
    pub fn and_groups(&self) -> &[SqlFilter] {
        &self.and_groups
    }

    /// Whether the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty() && self.or_groups.is_empty() && self.and_groups.is_empty()
    }

    /// Render the filter as a WHERE fragment (without the `WHERE` keyword),
    /// appending bind parameters to `params` in placeholder order.
    ///
    /// An empty filter renders to an empty string.
    pub fn to_sql(&self, params: &mut SqlParams) -> String {
        let mut conditions: Vec<String> = Vec::new();

        for (attribute, constraints) in &self.constraints {
            let column = quote_ident(attribute);
            for constraint in constraints {
                conditions.push(constraint.to_sql(&column, params));
            }
        }

        if !self.or_groups.is_empty() {
            let branches: Vec<String> = self
                .or_groups
                .iter()
                .map(|group| {
                    let sql = group.to_sql(params);
                    if sql.is_empty() {
                        // An empty branch matches everything.
                        "(1 = 1)".to_string()
                    } else {
                        format!("({sql})")
                    }
                })
                .collect();
            conditions.push(format!("({})", branches.join(" OR ")));
        }

        for group in &self.and_groups {
            let sql = group.to_sql(params);
            if !sql.is_empty() {
                conditions.push(format!("({sql})"));
            }
        }

        conditions.join(" AND ")
    }
}

impl Constraint {
    fn to_sql(&self, column: &str, params: &mut SqlParams) -> String {
        match self {
            Self::Compare { op, value } => match (op, value) {
                (CompareOp::Eq, Scalar::Null) => format!("{column} IS NULL"),
                (CompareOp::Ne, Scalar::Null) => format!("{column} IS NOT NULL"),
                // Comparing against NULL yields no rows; keep the literal.
                (op, Scalar::Null) => format!("{column} {} NULL", op.sql()),
                (op, value) => {
                    let placeholder = params.push(value.clone());
                    format!("{column} {} {placeholder}", op.sql())
                }
            },
            Self::Membership { negated, values } => {
                if values.is_empty() {
                    // IN over nothing matches no rows, NOT IN matches all.
                    return if *negated { "1 = 1" } else { "1 = 0" }.to_string();
                }
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|value| match value {
                        Scalar::Null => "NULL".to_string(),
                        value => params.push(value.clone()),
                    })
                    .collect();
                let keyword = if *negated { "NOT IN" } else { "IN" };
                format!("{column} {keyword} ({})", placeholders.join(", "))
            }
            Self::Pattern { negated, pattern } => {
                let placeholder = params.push(Scalar::Text(pattern.clone()));
                let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
                format!("{column} {keyword} {placeholder}")
            }
        }
    }
}

/// Quote an identifier for PostgreSQL, doubling embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
