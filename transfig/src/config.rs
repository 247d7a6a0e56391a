//! State configuration
//!
//! ```yaml
//! suppress_unchanged: true
//! initial:
//!   name: John
//!   job:
//!     title: Developer
//! ```

use crate::error::ConfigError;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options a [`State`](crate::State) is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Skip writes whose value equals what is already stored at the path
    pub suppress_unchanged: bool,

    /// Tree the state starts with; seeding it notifies nobody
    pub initial: Tree,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            suppress_unchanged: true,
            initial: Tree::new(),
        }
    }
}

impl StateConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Start from `initial` instead of an empty tree
    pub fn with_initial(mut self, initial: Tree) -> Self {
        self.initial = initial;
        self
    }

    /// Toggle suppression of unchanged writes
    pub fn suppress_unchanged(mut self, enabled: bool) -> Self {
        self.suppress_unchanged = enabled;
        self
    }
}
