//! Locations and transition actions.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::path::Path;

/// Key of the first entry in a freshly created history.
pub const DEFAULT_KEY: &str = "default";

/// How the current location was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// A new entry was pushed onto the history stack.
    Push,
    /// The current entry was replaced.
    Replace,
    /// The history index moved (back/forward/go), or the initial load.
    Pop,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Push => "PUSH",
            Action::Replace => "REPLACE",
            Action::Pop => "POP",
        };
        f.write_str(s)
    }
}

/// An immutable navigable position.
///
/// Every transition produces a new `Location`; nothing mutates one in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub pathname: String,
    pub search: String,
    pub hash: String,
    #[serde(default)]
    pub state: Value,
    pub key: String,
}

impl Location {
    /// Create a location with a fresh key.
    pub fn new(path: Path, state: Value) -> Self {
        Self::with_key(path, state, create_key())
    }

    /// Create a location with an explicit key.
    pub fn with_key(path: Path, state: Value, key: impl Into<String>) -> Self {
        Location {
            pathname: path.pathname,
            search: path.search,
            hash: path.hash,
            state,
            key: key.into(),
        }
    }

    /// The path part of this location.
    pub fn path(&self) -> Path {
        Path {
            pathname: self.pathname.clone(),
            search: self.search.clone(),
            hash: self.hash.clone(),
        }
    }

    /// `pathname + search + hash`, without any basename.
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::with_key(Path::root(), Value::Null, DEFAULT_KEY)
    }
}

/// Generate a short random location key.
pub fn create_key() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
