//! Validated team identifiers.
//!
//! Team names double as file stems in the state directory, so only ASCII
//! letters are accepted.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScavengerError};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamName(Arc<str>);

impl TeamName {
    /// Accepts one or more ASCII letters, nothing else.
    pub fn parse(s: impl AsRef<str>) -> Result<Self> {
        let s = s.as_ref();

        if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ScavengerError::InvalidTeamName(s.to_string()));
        }

        Ok(Self(s.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TeamName {
    type Error = ScavengerError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<TeamName> for String {
    fn from(name: TeamName) -> Self {
        name.0.to_string()
    }
}

impl AsRef<str> for TeamName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
