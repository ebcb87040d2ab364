//! Unit basis of a property query.

use std::fmt;

/// Basis under which a property value is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyBasis {
    Mole,
    Mass,
    #[default]
    Undefined,
}

impl PropertyBasis {
    /// Token passed through to the provider.
    pub fn token(self) -> &'static str {
        match self {
            Self::Mole => "Mole",
            Self::Mass => "Mass",
            Self::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for PropertyBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
