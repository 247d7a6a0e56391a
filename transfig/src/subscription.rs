//! Named subscriptions and the registry that dispatches to them
//!
//! A [`Subscription`] bundles selectors (OR semantics) with callbacks. When
//! a write lands at some path, every subscription with at least one
//! selector containing that path fires once, with arguments built from
//! *all* of its selectors.

use crate::path::Path;
use crate::selector::Selector;
use crate::tree::{self, Tree};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with a subscription's view of the state
pub type Callback = Arc<dyn Fn(&CallbackArgs) + Send + Sync>;

/// Snapshot handed to callbacks
///
/// Built fresh for every notification from the subscription's selectors.
/// It owns its data, so later writes to the state never show through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackArgs(Map<String, Value>);

impl CallbackArgs {
    /// Wrap an already built view
    pub fn new(view: Map<String, Value>) -> Self {
        Self(view)
    }

    /// Raw value under a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Value under a top-level key converted to `T`
    ///
    /// Yields `None` both when the key is missing and when the value has
    /// another type.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.0.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Value at a nested path inside the view
    pub fn get_nested(&self, path: impl Into<Path>) -> Option<&Value> {
        tree::get(&self.0, &path.into())
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the view has no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying mapping
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the underlying mapping
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for CallbackArgs {
    fn from(view: Map<String, Value>) -> Self {
        Self(view)
    }
}

impl PartialEq<Map<String, Value>> for CallbackArgs {
    fn eq(&self, other: &Map<String, Value>) -> bool {
        &self.0 == other
    }
}

impl PartialEq<Value> for CallbackArgs {
    fn eq(&self, other: &Value) -> bool {
        matches!(other, Value::Object(map) if map == &self.0)
    }
}

/// A named bundle of selectors and callbacks
///
/// ```
/// use transfig::{Selector, Subscription};
///
/// let sub = Subscription::new("profile")
///     .with_key("name")
///     .with_nested(["job", "title"])
///     .with(Selector::key("age"))
///     .calls(|args| println!("profile changed: {:?}", args));
/// assert_eq!(sub.selectors().len(), 3);
/// ```
#[derive(Clone)]
pub struct Subscription {
    name: String,
    selectors: Vec<Selector>,
    callbacks: Vec<Callback>,
}

impl Subscription {
    /// Create an empty subscription
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selectors: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    /// Add a selector
    pub fn with(mut self, selector: Selector) -> Self {
        self.selectors.push(selector);
        self
    }

    /// Add a top-level key selector
    pub fn with_key(self, key: impl Into<String>) -> Self {
        self.with(Selector::key(key))
    }

    /// Add a nested path selector
    pub fn with_nested(self, path: impl Into<Path>) -> Self {
        self.with(Selector::nested(path))
    }

    /// Add a selector matching every write
    pub fn with_wildcard(self) -> Self {
        self.with(Selector::Wildcard)
    }

    /// Add a callback, run after the ones already added
    pub fn calls<F>(mut self, callback: F) -> Self
    where
        F: Fn(&CallbackArgs) + Send + Sync + 'static,
    {
        self.callbacks.push(Arc::new(callback));
        self
    }

    /// Subscription name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Selectors in registration order
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Number of callbacks
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// True if any selector is affected by a write at `changed`
    pub fn matches(&self, changed: &Path) -> bool {
        self.selectors.iter().any(|s| s.contains(changed))
    }

    /// Merge every selector's view of `tree`, later selectors winning
    pub fn build_args(&self, tree: &Tree) -> CallbackArgs {
        let mut view = Map::new();
        for selector in &self.selectors {
            view.extend(selector.select(tree));
        }
        CallbackArgs(view)
    }

    /// Run every callback with the same arguments
    pub fn notify(&self, args: &CallbackArgs) {
        for callback in &self.callbacks {
            callback(args);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("name", &self.name)
            .field("selectors", &self.selectors)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Subscriptions registered on one state, keyed by name
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<String, Arc<Subscription>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscription, returning the one it replaced
    pub fn subscribe(&mut self, subscription: Subscription) -> Option<Arc<Subscription>> {
        self.subscriptions
            .insert(subscription.name.clone(), Arc::new(subscription))
    }

    /// Remove a subscription by name
    pub fn unsubscribe(&mut self, name: &str) -> bool {
        self.subscriptions.remove(name).is_some()
    }

    /// True if a subscription is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.subscriptions.contains_key(name)
    }

    /// Number of registered subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.subscriptions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Subscriptions affected by a write at `changed`
    ///
    /// The returned list is detached from the registry, so it stays stable
    /// while callbacks subscribe or unsubscribe. Names are unique, so each
    /// subscription appears at most once.
    pub fn affected(&self, changed: &Path) -> Vec<Arc<Subscription>> {
        self.subscriptions
            .values()
            .filter(|sub| sub.matches(changed))
            .cloned()
            .collect()
    }
}
