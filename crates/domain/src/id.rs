//! Entity identifier newtype (`domain.object_id`).

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MalformedInputError;

/// Domain of group entities.
pub const GROUP_DOMAIN: &str = "group";

/// Identifier of an [`Entity`](crate::entity::Entity), e.g. `light.kitchen`.
///
/// Always contains a non-empty domain and a non-empty object id separated by
/// the first `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityId(String);

impl EntityId {
    /// Validate and wrap a raw id.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError::InvalidEntityId`] when the separator is
    /// missing or either side of it is empty.
    pub fn parse(raw: impl Into<String>) -> Result<Self, MalformedInputError> {
        let raw = raw.into();
        match raw.split_once('.') {
            Some((domain, object_id)) if !domain.is_empty() && !object_id.is_empty() => {
                Ok(Self(raw))
            }
            _ => Err(MalformedInputError::InvalidEntityId { id: raw }),
        }
    }

    /// The part before the first `.`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.split().0
    }

    /// The part after the first `.`.
    #[must_use]
    pub fn object_id(&self) -> &str {
        self.split().1
    }

    /// Whether this id names a group entity.
    #[must_use]
    pub fn is_group(&self) -> bool {
        self.domain() == GROUP_DOMAIN
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn split(&self) -> (&str, &str) {
        // validated in `parse`
        self.0.split_once('.').unwrap_or((&self.0, ""))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = MalformedInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntityId {
    type Error = MalformedInputError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityId> for String {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
