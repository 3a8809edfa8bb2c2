//! Fully qualified logical name of an abstract entity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::CommonError;

/// Registry key of an abstract entity, e.g. `"demo.user"`.
///
/// Labels are lower-cased on construction so `"demo.User"` and `"demo.user"`
/// address the same registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityLabel(String);

impl EntityLabel {
    pub fn try_new(label: impl Into<String>) -> Result<Self, CommonError> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(CommonError::invalid_input("Entity label cannot be empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(CommonError::invalid_input(format!(
                "Entity label '{}' cannot contain whitespace",
                trimmed
            )));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EntityLabel {
    type Error = CommonError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.0
    }
}
