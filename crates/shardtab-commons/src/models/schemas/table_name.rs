//! Type-safe wrapper for physical table names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a table name fails validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNameValidationError {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for TableNameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid table name '{}': {}", self.name, self.reason)
    }
}

impl std::error::Error for TableNameValidationError {}

/// Physical table name of one shard (`user_3`, `log_2021`).
///
/// Names are case-insensitive and stored lower-cased. Generated names end up
/// as storage identifiers, so the following are rejected:
/// - Empty strings
/// - Names containing `..` (parent directory traversal)
/// - Names containing `/` or `\` (path separators)
/// - Names containing whitespace or null bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    fn validate(name: &str) -> Result<(), TableNameValidationError> {
        let reject = |reason: &str| {
            Err(TableNameValidationError {
                name: name.to_string(),
                reason: reason.to_string(),
            })
        };

        if name.is_empty() {
            return reject("Table name cannot be empty");
        }
        if name.contains("..") {
            return reject("Table name cannot contain '..' (path traversal)");
        }
        if name.contains('/') || name.contains('\\') {
            return reject("Table name cannot contain path separators");
        }
        if name.contains('\0') {
            return reject("Table name cannot contain null bytes");
        }
        if name.chars().any(char::is_whitespace) {
            return reject("Table name cannot contain whitespace");
        }

        Ok(())
    }

    /// Creates a new TableName, normalised to lowercase.
    ///
    /// `TableName::try_new("User_3")` and `TableName::try_new("user_3")` are equal.
    pub fn try_new(name: impl Into<String>) -> Result<Self, TableNameValidationError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name.to_lowercase()))
    }

    /// Returns the table name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TableName {
    type Error = TableNameValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_case_insensitive() {
        let name1 = TableName::try_new("User_3").unwrap();
        let name2 = TableName::try_new("user_3").unwrap();
        assert_eq!(name1, name2);
        assert_eq!(name1.as_str(), "user_3");
    }

    #[test]
    fn test_try_new_valid_names() {
        assert!(TableName::try_new("user_0").is_ok());
        assert!(TableName::try_new("log_2021").is_ok());
        assert!(TableName::try_new("log_2021-03").is_ok());
        assert!(TableName::try_new("a").is_ok());
    }

    #[test]
    fn test_try_new_rejects_empty() {
        let err = TableName::try_new("").unwrap_err();
        assert!(err.reason.contains("empty"));
    }

    #[test]
    fn test_try_new_rejects_path_traversal() {
        let err = TableName::try_new("../users").unwrap_err();
        assert!(err.reason.contains("path traversal"));
        assert!(TableName::try_new("log_..2021").is_err());
    }

    #[test]
    fn test_try_new_rejects_separators_and_whitespace() {
        assert!(TableName::try_new("log_2021/03").unwrap_err().reason.contains("path separators"));
        assert!(TableName::try_new("log_2021\\03").unwrap_err().reason.contains("path separators"));
        assert!(TableName::try_new("log 2021").unwrap_err().reason.contains("whitespace"));
        assert!(TableName::try_new("log\02021").unwrap_err().reason.contains("null bytes"));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: TableName = serde_json::from_str("\"User_1\"").unwrap();
        assert_eq!(ok.as_str(), "user_1");
        assert!(serde_json::from_str::<TableName>("\"../x\"").is_err());
    }
}
