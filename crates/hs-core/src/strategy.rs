//! Inter-storage power flow policy.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Control strategy applied to a storage pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// Power may flow between the base and the peak unit.
    #[default]
    Inter,
    /// Each unit only serves its own share of the demand.
    NoInter,
}

impl Strategy {
    /// Canonical token, as accepted by [`FromStr`].
    pub fn token(self) -> &'static str {
        match self {
            Self::Inter => "inter",
            Self::NoInter => "nointer",
        }
    }

    /// Whether power may flow between the units.
    pub fn allows_interchange(self) -> bool {
        matches!(self, Self::Inter)
    }
}

impl FromStr for Strategy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inter" => Ok(Self::Inter),
            "nointer" => Ok(Self::NoInter),
            _ => Err(CoreError::UnknownStrategy {
                token: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
