use serde::{Deserialize, Serialize};
use structdb_core::{
    config::ConfigError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    #[must_use]
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::Configuration => ErrorKind::Configuration,
            ErrorClass::Translation => ErrorKind::Query,
            ErrorClass::WriteFailure => ErrorKind::Write,
            ErrorClass::ConcurrencyFailure | ErrorClass::InvariantViolation => {
                ErrorKind::Internal
            }
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Missing collaborator or invalid configuration.
    Configuration,

    /// The query cannot be compiled as given.
    Query,

    /// The write sink rejected a write.
    Write,

    /// The caller cannot remediate this.
    Internal,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Model,
    Insert,
    Query,
    Sink,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Model => Self::Model,
            CoreErrorOrigin::Insert => Self::Insert,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Sink => Self::Sink,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failure_keeps_message_and_sink_origin() {
        let err: Error = InternalError::write_failure("disk full").into();

        assert_eq!(err.kind, ErrorKind::Write);
        assert_eq!(err.origin, ErrorOrigin::Sink);
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn config_parse_errors_map_to_configuration() {
        let err: Error = structdb_core::config::StoreConfig::from_toml_str("[insert]\nbogus = 1")
            .expect_err("unknown key")
            .into();

        assert_eq!(err.kind, ErrorKind::Configuration);
        assert_eq!(err.origin, ErrorOrigin::Config);
    }
}
