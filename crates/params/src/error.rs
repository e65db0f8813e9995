//! Error types: schema defects caught at construction versus rule
//! violations reported per request.

use crate::condition::ConditionParseError;

/// A defect in the field declarations themselves.
///
/// Schema errors surface from [`Validator::new`](crate::Validator::new)
/// and mean the validator cannot be built; they never occur once
/// construction has succeeded.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Field name must not be empty")]
    EmptyFieldName,

    #[error("Duplicate field: {0}")]
    DuplicateField(String),

    #[error("Field {field} references unknown field {reference}")]
    UnknownReference { field: String, reference: String },

    #[error("Field {field} has a malformed {rule} condition: {source}")]
    InvalidCondition {
        field: String,
        rule: &'static str,
        source: ConditionParseError,
    },

    #[error("Field {field} has an invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        field: String,
        pattern: String,
        source: regex::Error,
    },

    #[error("Field {field} default {value:?} is not a valid {expected}")]
    InvalidDefault {
        field: String,
        value: String,
        expected: &'static str,
    },
}

/// A rule violation found while validating one parameter map.
///
/// Population aborts at the first violation. Fields processed earlier
/// keep their writes, so the target record must not be trusted after an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("Missing required parameter: {field}")]
    MissingRequired { field: String },

    #[error("Parameter {field} requires {condition}")]
    UnmetDependency { field: String, condition: String },

    #[error("Parameter {field} must not be used together with {other}")]
    MutuallyExclusive { field: String, other: String },

    #[error("Parameter {field} value {value:?} does not match {pattern}")]
    PatternMismatch {
        field: String,
        value: String,
        pattern: String,
    },

    #[error("Parameter {field} value {value:?} is not a valid {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },
}

impl Violation {
    /// The external name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequired { field }
            | Self::UnmetDependency { field, .. }
            | Self::MutuallyExclusive { field, .. }
            | Self::PatternMismatch { field, .. }
            | Self::InvalidValue { field, .. } => field,
        }
    }
}
