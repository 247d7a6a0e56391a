//! Shared helpers for integration tests

#![allow(dead_code)]

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use transfig::{CallbackArgs, Subscription, Tree};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber honoring `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Arguments collected by a recording callback
pub type Recorder = Arc<Mutex<Vec<CallbackArgs>>>;

/// Attach a callback to `subscription` that records every call
pub fn recording(subscription: Subscription) -> (Subscription, Recorder) {
    let calls: Recorder = Arc::new(Mutex::new(Vec::new()));
    let sink = calls.clone();
    let subscription = subscription.calls(move |args| sink.lock().push(args.clone()));
    (subscription, calls)
}

/// Unwrap a JSON object literal into a tree
pub fn tree(value: Value) -> Tree {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}
