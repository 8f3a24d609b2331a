// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;

/// Integration token for Notion API authentication
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation.
    ///
    /// Only the shape is checked here. Whether the token is live is up to
    /// the remote (`notion auth login` verifies it against `/v1/users/me`).
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into().trim().to_string();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "token cannot be empty".to_string(),
            });
        }

        if key.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidApiKey {
                reason: "token must not contain whitespace".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact API key in display
        let visible: String = self.0.chars().take(10).collect();
        write!(f, "{}...", visible)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}
