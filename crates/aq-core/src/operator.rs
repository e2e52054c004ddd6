//! Operator Grammar
//!
//! The closed vocabulary of `$`-prefixed operator tokens and the value shape
//! each one requires. Keys are classified as operator vs attribute purely by
//! membership in this table, so attribute names must never collide with
//! operator tokens. Adding an operator means adding one variant plus its
//! token and shape arms; no other component changes.

/// A recognized query operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Equals (`$eq`)
    Eq,
    /// Not equals (`$ne`)
    Ne,
    /// Greater than (`$gt`)
    Gt,
    /// Greater than or equal (`$gte`)
    Gte,
    /// Less than (`$lt`)
    Lt,
    /// Less than or equal (`$lte`)
    Lte,
    /// Member of an array (`$in`)
    In,
    /// Not a member of an array (`$nin`)
    Nin,
    /// SQL LIKE pattern (`$like`)
    Like,
    /// SQL NOT LIKE pattern (`$notlike`)
    NotLike,
    /// Logical disjunction of nested configs (`$or`)
    Or,
    /// Logical conjunction of nested configs (`$and`)
    And,
    /// Result offset (`$skip`)
    Skip,
    /// Result count cap (`$limit`)
    Limit,
    /// Sort specification (`$sort`)
    Sort,
}

/// The structural form an operator's value must take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// A non-null mapping (not an array).
    Object,
    /// An ordered sequence.
    Array,
    /// A bare number.
    Number,
    /// A nested config, or an ordered sequence of nested configs.
    Logical,
    /// A string, an ordered sequence, or a mapping.
    Sort,
}

/// Constraint operators in their fixed translation order.
///
/// The translator walks this sequence, not config entry order, when merging
/// operator-major constraints.
pub const CONSTRAINT_OPERATORS: [Operator; 10] = [
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Gte,
    Operator::Lt,
    Operator::Lte,
    Operator::In,
    Operator::Nin,
    Operator::Like,
    Operator::NotLike,
];

impl Operator {
    /// Look up an operator by its wire token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "$eq" => Some(Self::Eq),
            "$ne" => Some(Self::Ne),
            "$gt" => Some(Self::Gt),
            "$gte" => Some(Self::Gte),
            "$lt" => Some(Self::Lt),
            "$lte" => Some(Self::Lte),
            "$in" => Some(Self::In),
            "$nin" => Some(Self::Nin),
            "$like" => Some(Self::Like),
            "$notlike" => Some(Self::NotLike),
            "$or" => Some(Self::Or),
            "$and" => Some(Self::And),
            "$skip" => Some(Self::Skip),
            "$limit" => Some(Self::Limit),
            "$sort" => Some(Self::Sort),
            _ => None,
        }
    }

    /// The wire token for this operator.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
            Self::In => "$in",
            Self::Nin => "$nin",
            Self::Like => "$like",
            Self::NotLike => "$notlike",
            Self::Or => "$or",
            Self::And => "$and",
            Self::Skip => "$skip",
            Self::Limit => "$limit",
            Self::Sort => "$sort",
        }
    }

    /// The value shape this operator's grammar requires.
    pub fn value_shape(&self) -> ValueShape {
        match self {
            Self::Eq | Self::Ne | Self::Gt | Self::Gte | Self::Lt | Self::Lte => {
                ValueShape::Object
            }
            Self::Like | Self::NotLike => ValueShape::Object,
            Self::In | Self::Nin => ValueShape::Array,
            Self::Or | Self::And => ValueShape::Logical,
            Self::Skip | Self::Limit => ValueShape::Number,
            Self::Sort => ValueShape::Sort,
        }
    }

    /// Whether this operator produces a per-attribute constraint
    /// (comparison, membership, or pattern family).
    pub fn is_constraint(&self) -> bool {
        !matches!(
            self,
            Self::Or | Self::And | Self::Skip | Self::Limit | Self::Sort
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Operator; 15] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Nin,
        Operator::Like,
        Operator::NotLike,
        Operator::Or,
        Operator::And,
        Operator::Skip,
        Operator::Limit,
        Operator::Sort,
    ];

    #[test]
    fn test_token_round_trip() {
        for op in ALL {
            assert_eq!(Operator::from_token(op.token()), Some(op));
        }
    }

    #[test]
    fn test_unknown_tokens() {
        assert_eq!(Operator::from_token("$bogus"), None);
        assert_eq!(Operator::from_token("name"), None);
        assert_eq!(Operator::from_token("eq"), None);
        assert_eq!(Operator::from_token("$EQ"), None);
    }

    #[test]
    fn test_value_shapes() {
        assert_eq!(Operator::Eq.value_shape(), ValueShape::Object);
        assert_eq!(Operator::Like.value_shape(), ValueShape::Object);
        assert_eq!(Operator::In.value_shape(), ValueShape::Array);
        assert_eq!(Operator::Or.value_shape(), ValueShape::Logical);
        assert_eq!(Operator::Skip.value_shape(), ValueShape::Number);
        assert_eq!(Operator::Sort.value_shape(), ValueShape::Sort);
    }

    #[test]
    fn test_constraint_family() {
        for op in CONSTRAINT_OPERATORS {
            assert!(op.is_constraint());
        }
        assert!(!Operator::Or.is_constraint());
        assert!(!Operator::And.is_constraint());
        assert!(!Operator::Skip.is_constraint());
        assert!(!Operator::Limit.is_constraint());
        assert!(!Operator::Sort.is_constraint());
    }

    #[test]
    fn test_constraint_order_is_fixed() {
        assert_eq!(CONSTRAINT_OPERATORS.len(), 10);
        assert_eq!(CONSTRAINT_OPERATORS[0], Operator::Eq);
        assert_eq!(CONSTRAINT_OPERATORS[9], Operator::NotLike);
    }
}
