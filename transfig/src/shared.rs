//! Thread-safe handle to a [`State`]
//!
//! [`State`] does no locking of its own. [`SharedState`] puts one
//! reentrant lock around every facade call, so the state can be shared
//! across threads while callbacks (which run with the lock held) can still
//! call back into the same handle from the notifying thread.

use crate::config::StateConfig;
use crate::error::Result;
use crate::path::Path;
use crate::state::State;
use crate::subscription::Subscription;
use crate::tree::Tree;
use parking_lot::ReentrantMutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Weak};

/// Cloneable, `Send + Sync` reference to a [`State`]
///
/// ```
/// use serde_json::json;
/// use transfig::{SharedState, Subscription};
///
/// let shared = SharedState::new();
/// let mirror = shared.downgrade();
/// shared.subscribe(
///     Subscription::new("mirror")
///         .with_key("source")
///         .calls(move |args| {
///             if let (Some(state), Some(value)) = (mirror.upgrade(), args.get("source")) {
///                 state.set("copy", value.clone());
///             }
///         }),
/// );
///
/// shared.set("source", 42);
/// assert_eq!(shared.get("copy"), Some(json!(42)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<ReentrantMutex<State>>,
}

impl SharedState {
    /// Share a fresh state with default configuration
    pub fn new() -> Self {
        Self::from_state(State::new())
    }

    /// Share a fresh state built from configuration
    pub fn with_config(config: StateConfig) -> Self {
        Self::from_state(State::with_config(config))
    }

    /// Share an existing state
    pub fn from_state(state: State) -> Self {
        Self {
            inner: Arc::new(ReentrantMutex::new(state)),
        }
    }

    /// Run `f` with the lock held
    pub fn with<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    /// Non-owning handle, for callbacks that refer back to this state
    pub fn downgrade(&self) -> WeakState {
        WeakState {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// See [`State::get`]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.with(|state| state.get(key))
    }

    /// See [`State::get_nested`]
    pub fn get_nested(&self, path: impl Into<Path>) -> Option<Value> {
        self.with(|state| state.get_nested(path))
    }

    /// See [`State::get_as`]
    pub fn get_as<T: DeserializeOwned>(&self, path: impl Into<Path>) -> Result<T> {
        self.with(|state| state.get_as(path))
    }

    /// See [`State::set`]
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        self.with(|state| state.set(key, value))
    }

    /// See [`State::set_nested`]
    pub fn set_nested(&self, path: impl Into<Path>, value: impl Into<Value>) -> bool {
        self.with(|state| state.set_nested(path, value))
    }

    /// See [`State::set_as`]
    pub fn set_as<T: Serialize>(&self, path: impl Into<Path>, value: &T) -> Result<bool> {
        self.with(|state| state.set_as(path, value))
    }

    /// See [`State::clear_nested`]
    pub fn clear_nested(&self, path: impl Into<Path>) -> Option<Value> {
        self.with(|state| state.clear_nested(path))
    }

    /// See [`State::subscribe`]
    pub fn subscribe(&self, subscription: Subscription) {
        self.with(|state| state.subscribe(subscription))
    }

    /// See [`State::unsubscribe`]
    pub fn unsubscribe(&self, name: &str) -> bool {
        self.with(|state| state.unsubscribe(name))
    }

    /// See [`State::as_map`]
    pub fn as_map(&self) -> Tree {
        self.with(State::as_map)
    }
}

/// Weak counterpart of [`SharedState`]
#[derive(Debug, Clone, Default)]
pub struct WeakState {
    inner: Weak<ReentrantMutex<State>>,
}

impl WeakState {
    /// Upgrade to a [`SharedState`] if the state is still alive
    pub fn upgrade(&self) -> Option<SharedState> {
        self.inner.upgrade().map(|inner| SharedState { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_shared_across_threads() {
        let shared = SharedState::new();
        let counter = Arc::new(Mutex::new(0usize));
        let sink = counter.clone();
        shared.subscribe(
            Subscription::new("count")
                .with_wildcard()
                .calls(move |_| *sink.lock() += 1),
        );

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.set_nested(["workers", format!("w{i}").as_str()], i);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*counter.lock(), 4);
        assert_eq!(shared.get("workers").unwrap().as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_callback_reenters_shared_state() {
        let shared = SharedState::new();
        let weak = shared.downgrade();
        shared.subscribe(Subscription::new("derive").with_key("celsius").calls(move |args| {
            let Some(state) = weak.upgrade() else { return };
            if let Some(c) = args.get_as::<f64>("celsius") {
                state.set("fahrenheit", c * 9.0 / 5.0 + 32.0);
            }
        }));

        shared.set("celsius", 100.0);
        assert_eq!(shared.get_as::<f64>("fahrenheit").unwrap(), 212.0);
    }

    #[test]
    fn test_callback_unsubscribes_itself() {
        let shared = SharedState::new();
        let weak = shared.downgrade();
        let calls = Arc::new(Mutex::new(0));
        let sink = calls.clone();
        shared.subscribe(Subscription::new("once").with_wildcard().calls(move |_| {
            *sink.lock() += 1;
            if let Some(state) = weak.upgrade() {
                state.unsubscribe("once");
            }
        }));

        shared.set("a", 1);
        shared.set("b", 2);
        assert_eq!(*calls.lock(), 1);
        assert!(!shared.with(|state| state.is_subscribed("once")));
    }

    #[test]
    fn test_weak_handle_does_not_keep_state_alive() {
        let shared = SharedState::new();
        let weak = shared.downgrade();
        assert!(weak.upgrade().is_some());
        drop(shared);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_as_map_and_clear() {
        let shared = SharedState::with_config(
            StateConfig::default().with_initial(json!({"a": {"b": 1}}).as_object().cloned().unwrap()),
        );
        assert_eq!(shared.clear_nested(["a", "b"]), Some(json!(1)));
        assert_eq!(Value::Object(shared.as_map()), json!({"a": {}}));
    }
}
