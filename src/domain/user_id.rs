//! Logical user identity used as the registry key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Opaque, non-empty identifier of the logical owner of zero or more
/// connections.
///
/// The gateway never interprets the value; it is whatever the transport
/// adapter authenticated or the client declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validates and wraps a user identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `raw` is empty or
    /// consists only of whitespace.
    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        Self::try_from(raw.to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = GatewayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "user_id must not be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}
