use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

/// Opaque identifier of a taxonomy term.
///
/// Terms form a hierarchy through parent links (see
/// [`Taxonomy`](crate::domain::Taxonomy)); the identifier itself carries no
/// structure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct TermId(u64);

impl TermId {
    /// Wraps a raw term identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for TermId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TermId {
    type Err = ParseTermIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|source| ParseTermIdError {
                value: s.to_string(),
                source,
            })
    }
}

/// Error returned when a string is not a valid term identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid term id '{value}': {source}")]
pub struct ParseTermIdError {
    value: String,
    source: ParseIntError,
}

/// Opaque identifier of an entity referencing taxonomy terms.
///
/// The filter never inspects the entity itself; the identifier only appears
/// in reference rows and result sets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Wraps a raw entity identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
