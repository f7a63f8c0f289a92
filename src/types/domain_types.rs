// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;

/// The `token_v2` session cookie used to read private workspaces.
///
/// Public pages need no token; when one is configured it is sent as a cookie
/// on every request to the unofficial API.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new session token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        let token = token.trim();

        if token.is_empty() {
            return Err(ValidationError::InvalidToken {
                reason: "token cannot be empty".to_string(),
            });
        }

        if token.len() < 20 {
            return Err(ValidationError::InvalidToken {
                reason: "token is too short".to_string(),
            });
        }

        if token.contains(|c: char| c.is_whitespace() || c == ';') {
            return Err(ValidationError::InvalidToken {
                reason: "token must not contain whitespace or ';'".to_string(),
            });
        }

        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact token in display
        let head: String = self.0.chars().take(8).collect();
        write!(f, "{}...", head)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken({})", self)
    }
}
