//! Type-safe wrapper for namespace identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CommonError;

/// Namespace a concrete shard entity is registered under.
///
/// Plays the role of a module path: `"apps.demo.models"` and `"default"` are
/// both valid. Lookups in the entity catalog are always namespace-scoped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NamespaceId(String);

impl NamespaceId {
    /// Name of the namespace used when the configuration does not pick one.
    pub const DEFAULT: &'static str = "default";

    /// Creates a new NamespaceId from a string without validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a NamespaceId, rejecting empty names and characters outside
    /// `[A-Za-z0-9_.]`, leading or trailing dots and empty path segments.
    pub fn try_new(id: impl Into<String>) -> Result<Self, CommonError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CommonError::invalid_input("Namespace cannot be empty"));
        }
        if let Some(bad) = id.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '.')) {
            return Err(CommonError::invalid_input(format!(
                "Namespace '{}' contains invalid character '{}'",
                id, bad
            )));
        }
        if id.split('.').any(str::is_empty) {
            return Err(CommonError::invalid_input(format!(
                "Namespace '{}' has an empty path segment",
                id
            )));
        }
        Ok(Self(id))
    }

    /// Returns the namespace ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for NamespaceId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NamespaceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for NamespaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
