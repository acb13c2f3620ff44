use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

///
/// DataTypeCode
///
/// Storage classification of an indexable value.
/// Doubles as the routing key onto per-type physical index tables.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[repr(u8)]
pub enum DataTypeCode {
    IntegerNumber = 0x01,
    FractalNumber = 0x02,
    Bool = 0x03,
    DateTime = 0x04,
    Guid = 0x05,
    String = 0x06,
    Enum = 0x07,
    Text = 0x08,
}

impl DataTypeCode {
    pub const ALL: [Self; 8] = [
        Self::IntegerNumber,
        Self::FractalNumber,
        Self::Bool,
        Self::DateTime,
        Self::Guid,
        Self::String,
        Self::Enum,
        Self::Text,
    ];

    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Physical index table this code is written to.
    /// Enum values are string-compatible and share the strings table.
    #[must_use]
    pub const fn index_table(self) -> IndexTableKind {
        match self {
            Self::IntegerNumber => IndexTableKind::Integers,
            Self::FractalNumber => IndexTableKind::Fractals,
            Self::Bool => IndexTableKind::Booleans,
            Self::DateTime => IndexTableKind::Dates,
            Self::Guid => IndexTableKind::Guids,
            Self::String | Self::Enum => IndexTableKind::Strings,
            Self::Text => IndexTableKind::Texts,
        }
    }

    #[must_use]
    pub const fn is_value_type(self) -> bool {
        matches!(self.index_table().row_shape(), IndexRowShape::ValueType)
    }
}

impl Display for DataTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::IntegerNumber => "IntegerNumber",
            Self::FractalNumber => "FractalNumber",
            Self::Bool => "Bool",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::String => "String",
            Self::Enum => "Enum",
            Self::Text => "Text",
        };
        write!(f, "{label}")
    }
}

///
/// IndexTableKind
///
/// One physical index table per kind. There is no enum table.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum IndexTableKind {
    Integers,
    Fractals,
    Booleans,
    Dates,
    Guids,
    Strings,
    Texts,
}

impl IndexTableKind {
    pub const ALL: [Self; 7] = [
        Self::Integers,
        Self::Fractals,
        Self::Booleans,
        Self::Dates,
        Self::Guids,
        Self::Strings,
        Self::Texts,
    ];

    /// Table name suffix appended to the structure schema name.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Integers => "Integers",
            Self::Fractals => "Fractals",
            Self::Booleans => "Booleans",
            Self::Dates => "Dates",
            Self::Guids => "Guids",
            Self::Strings => "Strings",
            Self::Texts => "Texts",
        }
    }

    #[must_use]
    pub const fn row_shape(self) -> IndexRowShape {
        match self {
            Self::Integers | Self::Fractals | Self::Booleans | Self::Dates | Self::Guids => {
                IndexRowShape::ValueType
            }
            Self::Strings => IndexRowShape::String,
            Self::Texts => IndexRowShape::Text,
        }
    }
}

///
/// IndexRowShape
///
/// Row adapter family used when writing one index table.
/// Value-type rows carry a rendered `StringValue` column; string and text
/// rows leave it out.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IndexRowShape {
    ValueType,
    String,
    Text,
}

impl IndexRowShape {
    #[must_use]
    pub const fn writes_string_value(self) -> bool {
        matches!(self, Self::ValueType)
    }
}
