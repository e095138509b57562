use serde::{Deserialize, Serialize};

use crate::error::ExpressionError;

/// Boolean operator joining the children of an [`ExpressionOperator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    #[default]
    And,
    Or,
    Not,
}

/// Comparison applied by an [`ExpressionTerm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[default]
    Equals,
    Contains,
    GreaterThan,
    LessThan,
    Between,
    In,
}

/// A single `field <condition> value` leaf of a query expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionTerm {
    pub field: String,
    #[serde(default)]
    pub condition: Condition,
    pub value: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl ExpressionTerm {
    #[must_use]
    pub fn new(field: impl Into<String>, condition: Condition, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            condition,
            value: value.into(),
            enabled: true,
        }
    }
}

/// Child of an [`ExpressionOperator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExpressionItem {
    Operator(ExpressionOperator),
    Term(ExpressionTerm),
}

/// Root or branch of a query expression tree.
///
/// The session only carries expressions from the caller to the transport; it
/// never evaluates them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpressionOperator {
    #[serde(default)]
    pub op: Operator,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub children: Vec<ExpressionItem>,
}

impl ExpressionOperator {
    #[must_use]
    pub fn new(op: Operator) -> Self {
        Self {
            op,
            enabled: true,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_term(mut self, term: ExpressionTerm) -> Self {
        self.children.push(ExpressionItem::Term(term));
        self
    }

    #[must_use]
    pub fn with_operator(mut self, operator: ExpressionOperator) -> Self {
        self.children.push(ExpressionItem::Operator(operator));
        self
    }

    /// Build an `AND` of `Equals` terms from `FIELD=VALUE` strings.
    ///
    /// # Errors
    ///
    /// Returns an [`ExpressionError`] if a term has no `=` or an empty field.
    pub fn from_terms<I, S>(terms: I) -> Result<Self, ExpressionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut root = Self::new(Operator::And);
        for raw in terms {
            let raw = raw.as_ref();
            let Some((field, value)) = raw.split_once('=') else {
                return Err(ExpressionError::MissingSeparator {
                    term: raw.to_string(),
                });
            };
            let field = field.trim();
            if field.is_empty() {
                return Err(ExpressionError::EmptyField {
                    term: raw.to_string(),
                });
            }
            root = root.with_term(ExpressionTerm::new(field, Condition::Equals, value.trim()));
        }
        Ok(root)
    }

    /// Number of terms in this tree, counting nested operators.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                ExpressionItem::Term(_) => 1,
                ExpressionItem::Operator(op) => op.term_count(),
            })
            .sum()
    }
}

fn enabled_by_default() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_terms_builds_and_of_equals() {
        let expr = ExpressionOperator::from_terms(["Feed=EVENTS", " UserId = alice "]).unwrap();
        assert_eq!(expr.op, Operator::And);
        assert_eq!(
            expr.children,
            vec![
                ExpressionItem::Term(ExpressionTerm::new("Feed", Condition::Equals, "EVENTS")),
                ExpressionItem::Term(ExpressionTerm::new("UserId", Condition::Equals, "alice")),
            ]
        );
    }

    #[test]
    fn from_terms_rejects_malformed_terms() {
        assert_eq!(
            ExpressionOperator::from_terms(["Feed"]),
            Err(ExpressionError::MissingSeparator {
                term: "Feed".into()
            })
        );
        assert_eq!(
            ExpressionOperator::from_terms(["=x"]),
            Err(ExpressionError::EmptyField { term: "=x".into() })
        );
    }

    #[test]
    fn nested_tree_deserializes_from_json() {
        let json = r#"{
            "op": "or",
            "children": [
                {"type": "term", "field": "Feed", "value": "A"},
                {"type": "operator", "op": "not", "children": [
                    {"type": "term", "field": "Host", "condition": "contains", "value": "test"}
                ]}
            ]
        }"#;
        let expr: ExpressionOperator = serde_json::from_str(json).unwrap();
        assert_eq!(expr.op, Operator::Or);
        assert!(expr.enabled);
        assert_eq!(expr.term_count(), 2);
    }
}
