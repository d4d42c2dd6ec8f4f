//! Index selection options for a search call.

use serde::{Deserialize, Serialize};

/// Selects the index a search runs against.
///
/// `api` names an endpoint declared in the data configuration; `index` names a
/// logical index directly. Only one is expected. When both are given `api`
/// takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Configured API endpoint name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,

    /// Logical index name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl SearchOptions {
    /// Search the index configured for an API endpoint.
    ///
    /// # Example
    ///
    /// ```
    /// use search_api_shared::SearchOptions;
    ///
    /// let options = SearchOptions::api("colleges");
    /// assert_eq!(options.api.as_deref(), Some("colleges"));
    /// ```
    pub fn api(api: impl Into<String>) -> Self {
        Self {
            api: Some(api.into()),
            index: None,
        }
    }

    /// Search a logical index directly.
    pub fn index(index: impl Into<String>) -> Self {
        Self {
            api: None,
            index: Some(index.into()),
        }
    }

    /// Set the logical index as well.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// Returns true if both `api` and `index` are set.
    pub fn is_ambiguous(&self) -> bool {
        self.api.is_some() && self.index.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ambiguous() {
        assert!(!SearchOptions::api("colleges").is_ambiguous());
        assert!(!SearchOptions::index("places").is_ambiguous());
        assert!(SearchOptions::api("colleges")
            .with_index("other")
            .is_ambiguous());
        assert!(!SearchOptions::default().is_ambiguous());
    }
}
