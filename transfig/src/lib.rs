//! Transfig - reactive hierarchical state
//!
//! This crate provides an in-memory tree of JSON-like values with named
//! subscriptions. Callers read and write values by key or by nested path;
//! subscribers declare which parts of the tree they care about and are
//! called synchronously, with a fresh snapshot of those parts, whenever a
//! write touches them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SharedState (optional)                     │
//! │        (Arc + reentrant lock, Send + Sync handle)           │
//! ├─────────────────────────────────────────────────────────────┤
//! │                          State                              │
//! │   get / get_nested / set / set_nested / clear_nested        │
//! │   subscribe / unsubscribe / as_map                          │
//! │                                                             │
//! │  ┌─────────────────────┐     ┌───────────────────────────┐  │
//! │  │        Tree         │     │   SubscriptionRegistry    │  │
//! │  │ (nested JSON map,   │     │  name -> Subscription     │  │
//! │  │  path get/set/clear)│     │  ┌─────────────────────┐  │  │
//! │  └──────────┬──────────┘     │  │ Selectors (OR)      │  │  │
//! │             │                │  │ Callbacks (ordered) │  │  │
//! │             │   write at     │  └─────────────────────┘  │  │
//! │             └── Path ───────▶│  affected(path)           │  │
//! │                              └───────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! ## Tree and paths
//!
//! The state is a [`Tree`], a string-keyed map whose values are either
//! nested maps (nodes) or anything else (leaves). A [`Path`] is a sequence
//! of keys from the root. Writing through a leaf replaces it with a node;
//! reading through a leaf finds nothing.
//!
//! ## Selectors
//!
//! A [`Selector`] declares interest in part of the tree:
//! - `Key`: one top-level key and everything below it
//! - `Nested`: one path; ancestors and descendants of it count as touching it
//! - `Wildcard`: the whole tree
//!
//! ## Subscriptions
//!
//! A [`Subscription`] is a named list of selectors plus ordered callbacks.
//! It fires once per write if any selector is touched, and its callbacks
//! receive [`CallbackArgs`] built from all of its selectors. Registering a
//! name twice replaces the earlier subscription.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use serde_json::json;
//! use transfig::{State, Subscription};
//!
//! let state = State::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//!
//! state.subscribe(
//!     Subscription::new("salary")
//!         .with_nested(["job", "compensation", "amount"])
//!         .calls(move |args| sink.lock().unwrap().push(args.clone())),
//! );
//!
//! state.set_nested(["job", "compensation", "amount"], 1000);
//! state.set_nested(["job", "title"], "Developer");
//! state.set("job", "unemployed");
//!
//! let seen = seen.lock().unwrap();
//! assert_eq!(seen.len(), 2);
//! assert_eq!(seen[0], json!({"job": {"compensation": {"amount": 1000}}}));
//! assert_eq!(seen[1], json!({"job": {"compensation": {"amount": null}}}));
//! ```

// Modules
pub mod config;
pub mod error;
pub mod path;
pub mod selector;
pub mod shared;
pub mod state;
pub mod subscription;
pub mod tree;

// Re-exports for convenience
pub use config::StateConfig;
pub use error::{ConfigError, Result, StateError};
pub use path::Path;
pub use selector::Selector;
pub use shared::{SharedState, WeakState};
pub use state::State;
pub use subscription::{Callback, CallbackArgs, Subscription, SubscriptionRegistry};
pub use tree::Tree;
