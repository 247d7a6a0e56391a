//! Selectors: what part of the state a subscriber cares about
//!
//! A [`Selector`] answers two questions:
//! - does a write at some path concern me? ([`Selector::contains`])
//! - what does my slice of the tree look like right now? ([`Selector::select`])

use crate::path::Path;
use crate::tree::{self, Tree};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Descriptor of interest in part of the state tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// A single top-level key
    Key(String),
    /// One fixed multi-segment path
    Nested(Path),
    /// Everything
    Wildcard,
}

impl Selector {
    /// Selector for a top-level key
    pub fn key(key: impl Into<String>) -> Self {
        Selector::Key(key.into())
    }

    /// Selector for a nested path
    pub fn nested(path: impl Into<Path>) -> Self {
        Selector::Nested(path.into())
    }

    /// Selector matching every write
    pub fn wildcard() -> Self {
        Selector::Wildcard
    }

    /// Does a write at `changed` affect this selector?
    ///
    /// A nested selector matches when the two paths agree on every index
    /// they both have. That covers writes to the selected path itself, to
    /// anything beneath it, and to any ancestor (which replaces the whole
    /// branch). Indices past the end of the shorter path are never read.
    pub fn contains(&self, changed: &Path) -> bool {
        match self {
            Selector::Key(key) => changed.first() == Some(key.as_str()),
            Selector::Nested(path) => {
                !path.is_empty()
                    && !changed.is_empty()
                    && path.iter().zip(changed.iter()).all(|(a, b)| a == b)
            }
            Selector::Wildcard => true,
        }
    }

    /// Extract this selector's view of `tree` as a standalone mapping
    ///
    /// Missing values show up as `null` rather than being left out, so the
    /// shape of the view depends only on the selector.
    pub fn select(&self, tree: &Tree) -> Map<String, Value> {
        let mut view = Map::new();
        match self {
            Selector::Key(key) => {
                let value = tree.get(key).cloned().unwrap_or(Value::Null);
                view.insert(key.clone(), value);
            }
            Selector::Nested(path) => {
                let Some((first, rest)) = path.segments().split_first() else {
                    return view;
                };
                let mut value = tree::get(tree, path).cloned().unwrap_or(Value::Null);
                for segment in rest.iter().rev() {
                    let mut wrapper = Map::new();
                    wrapper.insert(segment.clone(), value);
                    value = Value::Object(wrapper);
                }
                view.insert(first.clone(), value);
            }
            Selector::Wildcard => {
                view.extend(tree.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        view
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Key(key) => write!(f, "key:{}", key),
            Selector::Nested(path) => write!(f, "nested:{}", path),
            Selector::Wildcard => f.write_str("*"),
        }
    }
}
