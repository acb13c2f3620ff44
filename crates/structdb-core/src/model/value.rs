use chrono::NaiveDateTime;
use std::fmt::{self, Display};
use ulid::Ulid;

///
/// Value
///
/// Scalar carried by index rows and bound query parameters.
/// `List` only appears as the single parameter of a set-membership predicate.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Guid(Ulid),
    Text(String),
    Enum(String),
    List(Vec<Self>),
}

impl Value {
    /// Stable one-byte tag used when hashing values.
    #[must_use]
    pub const fn tag(&self) -> u8 {
        match self {
            Self::Null => 0x00,
            Self::Int(_) => 0x01,
            Self::Float(_) => 0x02,
            Self::Bool(_) => 0x03,
            Self::DateTime(_) => 0x04,
            Self::Guid(_) => 0x05,
            Self::Text(_) => 0x06,
            Self::Enum(_) => 0x07,
            Self::List(_) => 0x08,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Guid(v) => write!(f, "{v}"),
            Self::Text(v) | Self::Enum(v) => f.write_str(v),
            Self::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Ulid> for Value {
    fn from(value: Ulid) -> Self {
        Self::Guid(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
