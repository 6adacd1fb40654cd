//! Router configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`Router`](crate::Router).
///
/// Loadable from JSON:
///
/// ```json
/// {"basename": "/app", "initialEntries": ["/", "/a"], "initialIndex": 1}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterConfig {
    /// Prefix added to every href produced by `create_href`.
    pub basename: String,

    /// Initial memory history entries. Empty means `["/"]`.
    pub initial_entries: Vec<String>,

    /// Index of the initial entry. Defaults to the last one; clamped.
    pub initial_index: Option<usize>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            basename: "/".to_string(),
            initial_entries: vec!["/".to_string()],
            initial_index: None,
        }
    }
}

impl RouterConfig {
    pub fn with_basename(mut self, basename: impl Into<String>) -> Self {
        self.basename = basename.into();
        self
    }

    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_entries = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.initial_index = Some(index);
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config = RouterConfig::from_json(r#"{"basename": "/app"}"#).unwrap();
        assert_eq!(config.basename, "/app");
        assert_eq!(config.initial_entries, vec!["/".to_string()]);
        assert_eq!(config.initial_index, None);
    }

    #[test]
    fn camel_case_fields() {
        let config =
            RouterConfig::from_json(r#"{"initialEntries": ["/", "/a"], "initialIndex": 0}"#)
                .unwrap();
        assert_eq!(config, RouterConfig::default().with_entries(["/", "/a"]).with_index(0));
    }
}
