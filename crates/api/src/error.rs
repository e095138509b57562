use thiserror::Error;

/// Errors raised while turning user supplied terms into an expression tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpressionError {
    /// The term did not contain a `=` separating field and value.
    #[error("term '{term}' must have the form FIELD=VALUE")]
    MissingSeparator { term: String },

    /// The field part of the term was blank.
    #[error("term '{term}' has an empty field name")]
    EmptyField { term: String },
}
