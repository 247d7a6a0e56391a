//! The state facade
//!
//! [`State`] owns the storage tree and the subscription registry. Every
//! method takes `&self`: storage and registry sit behind `RefCell`s whose
//! borrows end before any callback runs, so the state can be re-entered
//! while a notification pass is in progress. Callbacks are `Send + Sync`
//! and `State` is not `Sync`, so a callback reaches the state that
//! notified it through a [`SharedState`](crate::SharedState) or
//! [`WeakState`](crate::WeakState) handle.

use crate::config::StateConfig;
use crate::error::{Result, StateError};
use crate::path::Path;
use crate::subscription::{Subscription, SubscriptionRegistry};
use crate::tree::{self, Tree};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;

/// Nested reactive state container
///
/// Single-owner and not `Sync`; wrap it in a
/// [`SharedState`](crate::SharedState) to use it from several threads.
///
/// ```
/// use std::sync::{Arc, Mutex};
/// use serde_json::json;
/// use transfig::{State, Subscription};
///
/// let state = State::new();
/// state.set("name", "John");
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
/// state.subscribe(
///     Subscription::new("greeter")
///         .with_key("name")
///         .calls(move |args| sink.lock().unwrap().push(args.clone())),
/// );
///
/// state.set("name", "Mike");
/// assert_eq!(seen.lock().unwrap()[0], json!({"name": "Mike"}));
/// ```
pub struct State {
    tree: RefCell<Tree>,
    subscriptions: RefCell<SubscriptionRegistry>,
    suppress_unchanged: bool,
}

impl State {
    /// Create an empty state with default configuration
    pub fn new() -> Self {
        Self::with_config(StateConfig::default())
    }

    /// Create a state from configuration
    pub fn with_config(config: StateConfig) -> Self {
        Self {
            tree: RefCell::new(config.initial),
            subscriptions: RefCell::new(SubscriptionRegistry::new()),
            suppress_unchanged: config.suppress_unchanged,
        }
    }

    /// Value under a top-level key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.tree.borrow().get(key).cloned()
    }

    /// Value at `path`; the root path never has one
    pub fn get_nested(&self, path: impl Into<Path>) -> Option<Value> {
        tree::get(&self.tree.borrow(), &path.into()).cloned()
    }

    /// True if a value is stored at `path`
    pub fn contains(&self, path: impl Into<Path>) -> bool {
        tree::get(&self.tree.borrow(), &path.into()).is_some()
    }

    /// Value at `path` converted to `T`
    pub fn get_as<T: DeserializeOwned>(&self, path: impl Into<Path>) -> Result<T> {
        let path = path.into();
        let value = self
            .get_nested(path.clone())
            .ok_or_else(|| StateError::NotFound(path.clone()))?;
        serde_json::from_value(value).map_err(|source| StateError::TypeMismatch { path, source })
    }

    /// Store `value` under a top-level key
    ///
    /// Returns whether the state changed.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key: String = key.into();
        self.set_nested(Path::from(key), value)
    }

    /// Store `value` at `path` and notify affected subscriptions
    ///
    /// Nothing happens for the root path, or when `value` equals what is
    /// already stored at exactly this path (unless suppression is turned
    /// off in the configuration). Returns whether the state changed.
    pub fn set_nested(&self, path: impl Into<Path>, value: impl Into<Value>) -> bool {
        let path = path.into();
        if path.is_empty() {
            tracing::trace!("Ignoring write to the root path");
            return false;
        }
        let value = value.into();
        {
            let mut root = self.tree.borrow_mut();
            if self.suppress_unchanged && tree::get(&root, &path) == Some(&value) {
                tracing::trace!(path = %path, "Suppressing unchanged write");
                return false;
            }
            tree::set(&mut root, &path, value);
        }
        self.notify_on_change(&path);
        true
    }

    /// Serialize `value` and store it at `path`
    pub fn set_as<T: Serialize>(&self, path: impl Into<Path>, value: &T) -> Result<bool> {
        let path = path.into();
        let value = serde_json::to_value(value).map_err(|source| StateError::Serialize {
            path: path.clone(),
            source,
        })?;
        Ok(self.set_nested(path, value))
    }

    /// Remove whatever is stored at `path` and notify affected subscriptions
    ///
    /// Returns the removed value; `None` means nothing was there and nobody
    /// was notified.
    pub fn clear_nested(&self, path: impl Into<Path>) -> Option<Value> {
        let path = path.into();
        let removed = tree::clear(&mut self.tree.borrow_mut(), &path);
        match removed {
            Some(value) => {
                self.notify_on_change(&path);
                Some(value)
            }
            None => {
                tracing::trace!(path = %path, "Nothing to clear");
                None
            }
        }
    }

    /// Register a subscription, replacing any with the same name
    pub fn subscribe(&self, subscription: Subscription) {
        let name = subscription.name().to_string();
        let selectors = subscription.selectors().len();
        let replaced = self.subscriptions.borrow_mut().subscribe(subscription);
        tracing::debug!(
            subscription = %name,
            selectors,
            replaced = replaced.is_some(),
            "Subscribed"
        );
    }

    /// Remove a subscription; returns whether one was registered
    pub fn unsubscribe(&self, name: &str) -> bool {
        let removed = self.subscriptions.borrow_mut().unsubscribe(name);
        tracing::debug!(subscription = %name, removed, "Unsubscribed");
        removed
    }

    /// True if a subscription is registered under `name`
    pub fn is_subscribed(&self, name: &str) -> bool {
        self.subscriptions.borrow().contains(name)
    }

    /// Number of registered subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Names of registered subscriptions, sorted
    pub fn subscription_names(&self) -> Vec<String> {
        self.subscriptions.borrow().names()
    }

    /// Independent deep copy of the whole tree
    pub fn as_map(&self) -> Tree {
        tree::deep_copy(&self.tree.borrow())
    }

    /// Run one notification pass for a write at `path`
    ///
    /// The affected set is fixed before the first callback runs. Arguments
    /// are built right before each subscription fires, so they include
    /// writes made by callbacks that ran earlier in the pass.
    fn notify_on_change(&self, path: &Path) {
        let affected = self.subscriptions.borrow().affected(path);
        tracing::debug!(path = %path, affected = affected.len(), "Notifying subscriptions");
        for subscription in affected {
            let args = subscription.build_args(&self.tree.borrow());
            tracing::trace!(subscription = %subscription.name(), "Dispatching");
            subscription.notify(&args);
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("tree", &self.tree.borrow())
            .field("subscriptions", &self.subscription_names())
            .field("suppress_unchanged", &self.suppress_unchanged)
            .finish()
    }
}
