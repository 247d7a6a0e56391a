//! Property tests for storage and notification invariants

mod common;

use common::recording;
use proptest::prelude::*;
use serde_json::{json, Value};
use transfig::{Path, State, Subscription};

fn segment() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

fn path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..5)
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 16, 4, |inner| {
        prop::collection::btree_map(segment(), inner, 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect()))
    })
}

proptest! {
    #[test]
    fn set_then_get_returns_value(
        writes in prop::collection::vec((path(), value()), 0..6),
        target in path(),
        v in value(),
    ) {
        let state = State::new();
        for (p, w) in writes {
            state.set_nested(p, w);
        }
        state.set_nested(target.clone(), v.clone());
        prop_assert_eq!(state.get_nested(target), Some(v));
    }

    #[test]
    fn repeated_write_notifies_at_most_once(target in path(), v in value()) {
        let state = State::new();
        let (sub, calls) = recording(Subscription::new("all").with_wildcard());
        state.subscribe(sub);

        let first = state.set_nested(target.clone(), v.clone());
        let second = state.set_nested(target, v);
        prop_assert!(first);
        prop_assert!(!second);
        prop_assert_eq!(calls.lock().len(), 1);
    }

    #[test]
    fn key_selector_fires_iff_first_segment_matches(key in segment(), target in path()) {
        let state = State::new();
        let (sub, calls) = recording(Subscription::new("key").with_key(key.clone()));
        state.subscribe(sub);

        state.set_nested(target.clone(), json!("written"));
        let expected = usize::from(target[0] == key);
        prop_assert_eq!(calls.lock().len(), expected);
    }

    #[test]
    fn nested_selector_fires_iff_paths_share_prefix(watched in path(), target in path()) {
        let state = State::new();
        let (sub, calls) = recording(Subscription::new("nested").with_nested(watched.clone()));
        state.subscribe(sub);

        state.set_nested(target.clone(), json!("written"));
        let (target, watched) = (Path::from(target), Path::from(watched));
        let related = target.starts_with(&watched) || watched.starts_with(&target);
        prop_assert_eq!(calls.lock().len(), usize::from(related));
    }

    #[test]
    fn as_map_is_detached(target in path(), v in value(), other in value()) {
        let state = State::new();
        state.set_nested(target.clone(), v.clone());
        let mut snapshot = state.as_map();
        snapshot.insert("extra".to_string(), other);
        snapshot.clear();
        prop_assert_eq!(state.get_nested(target), Some(v));
    }

    #[test]
    fn root_writes_are_ignored(v in value()) {
        let state = State::new();
        let (sub, calls) = recording(Subscription::new("all").with_wildcard());
        state.subscribe(sub);

        prop_assert!(!state.set_nested(Path::root(), v));
        prop_assert_eq!(state.clear_nested(Path::root()), None);
        prop_assert!(calls.lock().is_empty());
        prop_assert!(state.as_map().is_empty());
    }
}
