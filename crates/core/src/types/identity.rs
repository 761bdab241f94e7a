//! Visitor identity used to key persisted comparison lists.
//!
//! A visitor is either signed in (a [`UserId`]) or browsing anonymously with
//! a session id handed out by the front-end ([`AnonymousId`]). Exactly one of
//! the two is active at a time.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Errors that can occur when parsing an [`AnonymousId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnonymousIdError {
    /// The input string is empty or only whitespace.
    #[error("anonymous id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("anonymous id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("anonymous id contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// An anonymous session id.
///
/// ## Constraints
///
/// - Length: 1-128 characters after trimming
/// - ASCII alphanumerics, `-` and `_` only
///
/// ## Examples
///
/// ```
/// use stayhub_core::AnonymousId;
///
/// assert!(AnonymousId::parse("anon_1699999999_k3j2h1").is_ok());
/// assert!(AnonymousId::parse("").is_err());
/// assert!(AnonymousId::parse("has space").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct AnonymousId(String);

impl AnonymousId {
    /// Maximum length of an anonymous id.
    pub const MAX_LENGTH: usize = 128;

    /// Parse an `AnonymousId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains characters outside `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, AnonymousIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AnonymousIdError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(AnonymousIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(AnonymousIdError::InvalidCharacter(c));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnonymousId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AnonymousId {
    type Err = AnonymousIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AnonymousId {
    type Error = AnonymousIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AnonymousId> for String {
    fn from(id: AnonymousId) -> Self {
        id.0
    }
}

/// The key a comparison list is persisted under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Identity {
    /// A signed-in user.
    User(UserId),
    /// An anonymous visitor session.
    Anonymous(AnonymousId),
}

impl Identity {
    /// Query-string key/value pair identifying this visitor to the API.
    #[must_use]
    pub fn query_pair(&self) -> (&'static str, String) {
        match self {
            Self::User(id) => ("user_id", id.to_string()),
            Self::Anonymous(id) => ("anonymous_id", id.to_string()),
        }
    }

    /// Returns the user id if the visitor is signed in.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Anonymous(_) => None,
        }
    }

    /// Returns true for anonymous sessions.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous(_))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Anonymous(id) => write!(f, "anonymous:{id}"),
        }
    }
}

impl From<UserId> for Identity {
    fn from(id: UserId) -> Self {
        Self::User(id)
    }
}

impl From<AnonymousId> for Identity {
    fn from(id: AnonymousId) -> Self {
        Self::Anonymous(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_anonymous_ids() {
        assert!(AnonymousId::parse("anon_123").is_ok());
        assert!(AnonymousId::parse("a").is_ok());
        assert!(AnonymousId::parse("session-AbC-09_x").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(AnonymousId::parse(""), Err(AnonymousIdError::Empty));
        assert_eq!(AnonymousId::parse("   "), Err(AnonymousIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(AnonymousId::MAX_LENGTH + 1);
        assert!(matches!(
            AnonymousId::parse(&long),
            Err(AnonymousIdError::TooLong { .. })
        ));
        assert!(AnonymousId::parse(&"a".repeat(AnonymousId::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            AnonymousId::parse("anon/123"),
            Err(AnonymousIdError::InvalidCharacter('/'))
        );
    }

    #[test]
    fn test_parse_trims() {
        let id = AnonymousId::parse("  anon_1 ").unwrap();
        assert_eq!(id.as_str(), "anon_1");
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<AnonymousId, _> = serde_json::from_str("\"bad id\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_query_pair() {
        let user = UserId::generate();
        assert_eq!(
            Identity::User(user).query_pair(),
            ("user_id", user.to_string())
        );

        let anon = AnonymousId::parse("anon_1").unwrap();
        assert_eq!(
            Identity::Anonymous(anon).query_pair(),
            ("anonymous_id", "anon_1".to_string())
        );
    }

    #[test]
    fn test_identity_display() {
        let anon = Identity::from(AnonymousId::parse("anon_1").unwrap());
        assert_eq!(anon.to_string(), "anonymous:anon_1");
        assert!(anon.is_anonymous());
        assert_eq!(anon.user_id(), None);
    }
}
