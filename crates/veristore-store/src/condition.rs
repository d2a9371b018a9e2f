//! Search conditions and orderings.
//!
//! A small tree of comparisons that every backend understands: SQLite
//! renders it to a parameterized WHERE clause, the in-memory store
//! evaluates it directly against rows. Column names pass through an
//! identifier check before reaching SQL text.

use crate::error::{Result, StoreError};
use crate::row::{RecordRow, Scalar};

/// Check that a name is safe to splice into SQL as an identifier.
pub(crate) fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidColumn(name.to_string()))
    }
}

/// A filter over record rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equal(String, Scalar),
    NotEqual(String, Scalar),
    GreaterThan(String, Scalar),
    GreaterThanOrEqual(String, Scalar),
    LessThan(String, Scalar),
    LessThanOrEqual(String, Scalar),
    IsNull(String),
    IsNotNull(String),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    /// Render to a SQL fragment, pushing bound values onto `params`.
    pub fn to_sql(&self, params: &mut Vec<Scalar>) -> Result<String> {
        match self {
            Condition::Equal(column, value) => comparison(column, "=", value, params),
            Condition::NotEqual(column, value) => comparison(column, "<>", value, params),
            Condition::GreaterThan(column, value) => comparison(column, ">", value, params),
            Condition::GreaterThanOrEqual(column, value) => {
                comparison(column, ">=", value, params)
            }
            Condition::LessThan(column, value) => comparison(column, "<", value, params),
            Condition::LessThanOrEqual(column, value) => comparison(column, "<=", value, params),
            Condition::IsNull(column) => {
                validate_identifier(column)?;
                Ok(format!("{column} IS NULL"))
            }
            Condition::IsNotNull(column) => {
                validate_identifier(column)?;
                Ok(format!("{column} IS NOT NULL"))
            }
            Condition::And(children) => join_sql(children, " AND ", params),
            Condition::Or(children) => join_sql(children, " OR ", params),
        }
    }

    /// Evaluate against a row. Missing columns and incomparable values
    /// never match, mirroring SQL null semantics.
    pub fn matches(&self, row: &RecordRow) -> bool {
        use std::cmp::Ordering::*;

        let ordered = |column: &str, value: &Scalar, accept: &[std::cmp::Ordering]| {
            row.column(column)
                .and_then(|actual| actual.compare(value))
                .is_some_and(|ordering| accept.contains(&ordering))
        };

        match self {
            Condition::Equal(column, value) => ordered(column, value, &[Equal]),
            Condition::NotEqual(column, value) => ordered(column, value, &[Less, Greater]),
            Condition::GreaterThan(column, value) => ordered(column, value, &[Greater]),
            Condition::GreaterThanOrEqual(column, value) => {
                ordered(column, value, &[Greater, Equal])
            }
            Condition::LessThan(column, value) => ordered(column, value, &[Less]),
            Condition::LessThanOrEqual(column, value) => ordered(column, value, &[Less, Equal]),
            Condition::IsNull(column) => row.column(column).is_some_and(|v| v.is_null()),
            Condition::IsNotNull(column) => row.column(column).is_some_and(|v| !v.is_null()),
            Condition::And(children) => children.iter().all(|c| c.matches(row)),
            Condition::Or(children) => children.iter().any(|c| c.matches(row)),
        }
    }
}

fn comparison(
    column: &str,
    op: &str,
    value: &Scalar,
    params: &mut Vec<Scalar>,
) -> Result<String> {
    validate_identifier(column)?;
    params.push(value.clone());
    Ok(format!("{column} {op} ?{}", params.len()))
}

fn join_sql(children: &[Condition], separator: &str, params: &mut Vec<Scalar>) -> Result<String> {
    let mut parts = Vec::with_capacity(children.len());
    for child in children {
        parts.push(child.to_sql(params)?);
    }
    Ok(format!("({})", parts.join(separator)))
}

/// Sort direction for an ordering term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Descending,
        }
    }

    pub fn to_sql(&self) -> Result<String> {
        validate_identifier(&self.column)?;
        let direction = match self.direction {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        };
        Ok(format!("{} {}", self.column, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_to_sql() {
        let mut params = Vec::new();
        let sql = Condition::Equal("sensor".into(), "attic".into())
            .to_sql(&mut params)
            .unwrap();
        assert_eq!(sql, "sensor = ?1");
        assert_eq!(params, vec![Scalar::Text("attic".into())]);
    }

    #[test]
    fn test_nested_tree_numbers_params_in_order() {
        let condition = Condition::And(vec![
            Condition::Equal("sensor".into(), "attic".into()),
            Condition::Or(vec![
                Condition::GreaterThan("celsius".into(), 20.0.into()),
                Condition::IsNull("nonce".into()),
            ]),
        ]);
        let mut params = Vec::new();
        let sql = condition.to_sql(&mut params).unwrap();
        assert_eq!(sql, "(sensor = ?1 AND (celsius > ?2 OR nonce IS NULL))");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_injection_rejected() {
        let mut params = Vec::new();
        assert!(matches!(
            Condition::Equal("id; DROP TABLE readings".into(), "x".into()).to_sql(&mut params),
            Err(StoreError::InvalidColumn(_))
        ));
        assert!(matches!(
            OrderBy::ascending("seq DESC; --").to_sql(),
            Err(StoreError::InvalidColumn(_))
        ));
    }

    #[test]
    fn test_matches_row() {
        let row = RecordRow {
            id: "Eid".into(),
            prefix: "Eprefix".into(),
            sequence_number: 3,
            previous: Some("Eprev".into()),
            nonce: None,
            created_at: None,
            signing_identity: None,
            signature: None,
            payload: vec![("celsius".into(), Scalar::Real(19.5))],
            body: String::new(),
        };

        assert!(Condition::Equal("prefix".into(), "Eprefix".into()).matches(&row));
        assert!(Condition::GreaterThanOrEqual("sequence_number".into(), 3.into()).matches(&row));
        assert!(Condition::LessThan("celsius".into(), 20.0.into()).matches(&row));
        assert!(Condition::IsNull("nonce".into()).matches(&row));
        assert!(!Condition::IsNull("previous".into()).matches(&row));
        // Unknown columns never match, even negated comparisons.
        assert!(!Condition::NotEqual("missing".into(), "x".into()).matches(&row));
    }
}
