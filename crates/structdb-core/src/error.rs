use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable classification.
/// Every failure raised by the orchestrator or translator is one of these;
/// sink implementations construct them with [`InternalError::write_failure`].
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    #[must_use]
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a configuration error raised while loading or validating config.
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Configuration, ErrorOrigin::Config, message)
    }

    /// Construct the error raised when a required collaborator is absent.
    pub(crate) fn missing_collaborator(origin: ErrorOrigin, name: &str) -> Self {
        Self::new(
            ErrorClass::Configuration,
            origin,
            format!("required collaborator missing: {name}"),
        )
    }

    /// Construct a translation error for a node the predicate compiler cannot accept.
    pub(crate) fn translation(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Translation, ErrorOrigin::Query, message)
    }

    /// Construct a write failure reported by a write sink.
    #[must_use]
    pub fn write_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::WriteFailure, ErrorOrigin::Sink, message)
    }

    /// Construct a failure observed when joining the background grouping task.
    pub(crate) fn concurrency_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::ConcurrencyFailure, ErrorOrigin::Insert, message)
    }

    /// Construct a model-origin invariant violation.
    pub(crate) fn model_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Model, message)
    }

    /// Construct a query-origin invariant violation.
    pub(crate) fn query_invariant(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvariantViolation, ErrorOrigin::Query, message)
    }

    #[must_use]
    pub const fn is_write_failure(&self) -> bool {
        matches!(self.class, ErrorClass::WriteFailure)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Translation,
    WriteFailure,
    ConcurrencyFailure,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Translation => "translation",
            Self::WriteFailure => "write_failure",
            Self::ConcurrencyFailure => "concurrency_failure",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Model,
    Insert,
    Query,
    Sink,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Model => "model",
            Self::Insert => "insert",
            Self::Query => "query",
            Self::Sink => "sink",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_prefixes_origin_and_class() {
        let err = InternalError::write_failure("bulk copy rejected");

        assert_eq!(
            err.display_with_class(),
            "sink:write_failure: bulk copy rejected"
        );
        assert!(err.is_write_failure());
    }

    #[test]
    fn missing_collaborator_is_configuration_class() {
        let err = InternalError::missing_collaborator(ErrorOrigin::Insert, "write sink");

        assert_eq!(err.class, ErrorClass::Configuration);
        assert_eq!(err.origin, ErrorOrigin::Insert);
        assert_eq!(err.to_string(), "required collaborator missing: write sink");
    }
}
