use core::fmt;

use serde::{Deserialize, Serialize};

/// The structural classification of a type.
///
/// A walker picks one dehydration branch per shape:
///
/// - `Value`: scalars with a printable form (`bool`, numbers, strings).
/// - `Reference`: composites, walked member by member.
/// - `Collection`: ordered element sequences.
/// - `Dictionary`: key/value entry sequences.
/// - `Enum`: a labelled integral value.
/// - `Null`: nothing is known about the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Value,
    Reference,
    Collection,
    Dictionary,
    Enum,
    Null,
}

impl Shape {
    /// Returns `true` for shapes whose values are walked structurally.
    #[inline]
    pub const fn is_structural(self) -> bool {
        matches!(self, Self::Reference | Self::Collection | Self::Dictionary)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => f.pad("Value"),
            Self::Reference => f.pad("Reference"),
            Self::Collection => f.pad("Collection"),
            Self::Dictionary => f.pad("Dictionary"),
            Self::Enum => f.pad("Enum"),
            Self::Null => f.pad("Null"),
        }
    }
}
