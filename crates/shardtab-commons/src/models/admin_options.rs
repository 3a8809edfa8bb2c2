//! Display options forwarded to admin tooling.

use serde::{Deserialize, Serialize};

/// Admin/display options of one logical entity.
///
/// The engine never interprets these; it stores them per label and hands them
/// back through registry snapshots. Field order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOptions {
    /// Columns shown in list views
    #[serde(default)]
    pub list_display: Vec<String>,

    /// Columns searchable from list views
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_fields: Vec<String>,

    /// Columns offered as list filters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub list_filter: Vec<String>,
}

impl AdminOptions {
    pub fn with_list_display<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            list_display: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.list_display.is_empty() && self.search_fields.is_empty() && self.list_filter.is_empty()
    }
}
