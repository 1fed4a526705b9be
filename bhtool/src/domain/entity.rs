//! Entity kinds and identifiers addressed by ownership operations.
//!
//! BloodHound stores principals as graph nodes labelled by kind. Only users
//! and computers can be flagged as owned by this tool; both are addressed by
//! their `name` property (for example `ALICE@CORP.COM`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Kind of graph node an ownership operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityType {
    /// A user principal.
    #[default]
    User,
    /// A computer account.
    Computer,
}

impl EntityType {
    /// Every supported entity type, in display order.
    pub const ALL: [Self; 2] = [Self::User, Self::Computer];

    /// Lower-case selector accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Computer => "computer",
        }
    }

    /// Noun form matching `count`: singular for exactly one, plural otherwise.
    ///
    /// # Examples
    /// ```
    /// use bhtool::domain::EntityType;
    ///
    /// assert_eq!(EntityType::User.noun(1), "user");
    /// assert_eq!(EntityType::Computer.noun(0), "computers");
    /// ```
    #[must_use]
    pub const fn noun(self, count: usize) -> &'static str {
        match (self, count) {
            (Self::User, 1) => "user",
            (Self::User, _) => "users",
            (Self::Computer, 1) => "computer",
            (Self::Computer, _) => "computers",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a selector names an entity type the tool does not support.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported entity type '{value}'")]
pub struct UnsupportedEntityType {
    /// Selector as supplied by the caller.
    pub value: String,
}

impl FromStr for EntityType {
    type Err = UnsupportedEntityType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnsupportedEntityType {
                value: value.to_owned(),
            })
    }
}

/// Validation errors raised by [`EntityName::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityNameValidationError {
    /// The name was empty once trimmed.
    #[error("entity name must not be empty")]
    Empty,
    /// The name carried leading or trailing whitespace.
    #[error("entity name '{value}' must not have surrounding whitespace")]
    Untrimmed {
        /// Offending input.
        value: String,
    },
}

/// Identifier of a graph node, matched against its `name` property.
///
/// ## Invariants
/// - non-empty;
/// - no leading or trailing whitespace.
///
/// Case is preserved; BloodHound stores names upper-cased, so callers are
/// expected to supply them that way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityName(String);

impl EntityName {
    /// Validate and wrap an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EntityNameValidationError`] when the value is empty or not
    /// trimmed.
    ///
    /// # Examples
    /// ```
    /// use bhtool::domain::EntityName;
    ///
    /// let name = EntityName::new("ALICE@CORP.COM").expect("valid name");
    /// assert_eq!(name.as_ref(), "ALICE@CORP.COM");
    /// assert!(EntityName::new("  ").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, EntityNameValidationError> {
        let raw: String = value.into();
        if raw.trim().is_empty() {
            return Err(EntityNameValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(EntityNameValidationError::Untrimmed { value: raw });
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityName {
    type Err = EntityNameValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}
