// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use std::fmt;

/// Error taxonomy shared by every revi crate.
///
/// Alignment and inference failures carry enough context for a caller to
/// display a corrective message (field name, expected vs. actual arity).
/// Empty subsets and zero denominators in the metrics engines are NOT
/// errors; they resolve to sentinel values inside those engines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReviError {
    /// Malformed arguments: unknown columns, invalid configuration,
    /// unsorted series, overlapping schema claims.
    InvalidInput(String),
    /// A declared input field is absent from the raw record.
    MissingField { field: String },
    /// An input field holds the wrong scalar kind.
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
    /// Aligned-vector arity disagrees with the model's expected input arity.
    SchemaMismatch { expected: usize, actual: usize },
    /// The historical series is too short to estimate a trend.
    InsufficientHistory(String),
}

impl ReviError {
    /// Builds an `InvalidInput` error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Builds a `MissingField` error naming the absent field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Builds a `TypeMismatch` error naming the field and both kinds.
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    /// Builds a `SchemaMismatch` error carrying both arities.
    pub fn schema_mismatch(expected: usize, actual: usize) -> Self {
        Self::SchemaMismatch { expected, actual }
    }

    /// Builds an `InsufficientHistory` error.
    pub fn insufficient_history(msg: impl Into<String>) -> Self {
        Self::InsufficientHistory(msg.into())
    }

    /// True when the condition can be fixed by correcting user input and
    /// retrying. `SchemaMismatch` is an integration bug and is fatal to
    /// the request.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SchemaMismatch { .. })
    }
}

impl fmt::Display for ReviError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::MissingField { field } => {
                write!(f, "missing required field: {field}")
            }
            Self::TypeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {field} expects a {expected} value; got a {actual} value"
            ),
            Self::SchemaMismatch { expected, actual } => write!(
                f,
                "model expects {expected} features; aligned vector has {actual}"
            ),
            Self::InsufficientHistory(msg) => {
                write!(f, "insufficient history: {msg}")
            }
        }
    }
}

impl std::error::Error for ReviError {}

#[cfg(test)]
mod tests {
    use super::ReviError;

    #[test]
    fn display_carries_field_context() {
        let err = ReviError::missing_field("CAC");
        assert_eq!(err.to_string(), "missing required field: CAC");

        let err = ReviError::type_mismatch("Valor_Venda", "number", "label");
        assert_eq!(
            err.to_string(),
            "field Valor_Venda expects a number value; got a label value"
        );
    }

    #[test]
    fn display_carries_arity_context() {
        let err = ReviError::schema_mismatch(14, 11);
        assert_eq!(
            err.to_string(),
            "model expects 14 features; aligned vector has 11"
        );
    }

    #[test]
    fn schema_mismatch_is_the_only_fatal_variant() {
        assert!(ReviError::invalid_input("x").is_recoverable());
        assert!(ReviError::missing_field("x").is_recoverable());
        assert!(ReviError::type_mismatch("x", "number", "label").is_recoverable());
        assert!(ReviError::insufficient_history("x").is_recoverable());
        assert!(!ReviError::schema_mismatch(2, 3).is_recoverable());
    }
}
