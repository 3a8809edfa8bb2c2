// Composite key of the entity catalog

use serde::{Deserialize, Serialize};
use std::fmt;

use super::namespace_id::NamespaceId;
use crate::models::schemas::TableName;

/// Composite key for concrete shard entities: (namespace_id, table_name)
///
/// Displays as `"namespace.table"`, e.g. `"apps.demo.models.user_3"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId {
    namespace_id: NamespaceId,
    table_name: TableName,
}

impl TableId {
    /// Create a new TableId from namespace ID and table name
    #[inline]
    pub fn new(namespace_id: NamespaceId, table_name: TableName) -> Self {
        Self {
            namespace_id,
            table_name,
        }
    }

    /// Get the namespace ID component
    #[inline]
    pub fn namespace_id(&self) -> &NamespaceId {
        &self.namespace_id
    }

    /// Get the table name component
    #[inline]
    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace_id, self.table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_id_display() {
        let id = TableId::new(
            NamespaceId::new("apps.demo.models"),
            TableName::try_new("user_3").unwrap(),
        );
        assert_eq!(id.to_string(), "apps.demo.models.user_3");
        assert_eq!(id.namespace_id().as_str(), "apps.demo.models");
        assert_eq!(id.table_name().as_str(), "user_3");
    }
}
