use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::SecRequirement;

/// Wildcard accepted in either half of a capability.
pub const WILDCARD: &str = "*";

/// A named grant of the form `"<Resource>.<Action>"`, e.g. `Books.Read`.
///
/// Either half may be `*`. Matching is ASCII case-insensitive so that
/// `books.read` and `Books.Read` name the same grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability {
    resource: String,
    action: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CapabilityParseError {
    #[error("capability '{0}' must have the form '<resource>.<action>'")]
    MissingSeparator(String),

    #[error("capability '{0}' has an empty resource or action")]
    EmptyPart(String),

    #[error("capability '{value}' contains invalid character '{ch}'")]
    InvalidChar { value: String, ch: char },
}

impl Capability {
    #[must_use]
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    /// `*.*`, granting everything.
    #[must_use]
    pub fn all() -> Self {
        Self::new(WILDCARD, WILDCARD)
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Whether this grant satisfies `requirement`.
    #[must_use]
    pub fn grants(&self, requirement: &SecRequirement) -> bool {
        part_matches(&self.resource, &requirement.resource)
            && part_matches(&self.action, &requirement.action)
    }
}

fn part_matches(granted: &str, required: &str) -> bool {
    granted == WILDCARD || granted.eq_ignore_ascii_case(required)
}

fn valid_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '*')
}

impl FromStr for Capability {
    type Err = CapabilityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (resource, action) = s
            .rsplit_once('.')
            .ok_or_else(|| CapabilityParseError::MissingSeparator(s.to_owned()))?;

        if resource.is_empty() || action.is_empty() {
            return Err(CapabilityParseError::EmptyPart(s.to_owned()));
        }

        if let Some(ch) = resource
            .chars()
            .chain(action.chars())
            .find(|c| !valid_char(*c) && *c != '.')
        {
            return Err(CapabilityParseError::InvalidChar {
                value: s.to_owned(),
                ch,
            });
        }

        Ok(Self::new(resource, action))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.action)
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
