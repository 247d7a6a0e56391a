//! Nested storage engine
//!
//! Free functions over a root mapping. A node is either a leaf (any JSON
//! value that is not an object) or a mapping (`Value::Object`). These
//! functions know nothing about subscriptions and never fail: a missing
//! path or a leaf in the way is reported as `None` or ignored.
//!
//! Every walk is a loop over segments, so deep paths cost heap, not stack.

use crate::path::Path;
use serde_json::{Map, Value};

/// Root mapping of a state tree
pub type Tree = Map<String, Value>;

/// Look up the value stored at `path`
///
/// Fails when the path is empty or when a leaf is hit while segments
/// remain.
pub fn get<'a>(root: &'a Tree, path: &Path) -> Option<&'a Value> {
    let (last, parents) = path.segments().split_last()?;
    let mut node = root;
    for segment in parents {
        node = node.get(segment)?.as_object()?;
    }
    node.get(last)
}

/// Store `value` at `path`
///
/// Intermediate segments that are missing or hold a leaf are replaced by
/// empty mappings; whatever they held before is discarded. The empty path
/// is ignored.
pub fn set(root: &mut Tree, path: &Path, value: Value) {
    let Some((last, parents)) = path.segments().split_last() else {
        return;
    };
    let mut node = root;
    for segment in parents {
        let slot = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        node = match slot.as_object_mut() {
            Some(map) => map,
            None => return,
        };
    }
    node.insert(last.clone(), value);
}

/// Remove the leaf or subtree at `path`, returning it
///
/// Mappings left empty by the removal stay in place; readers treat an
/// empty mapping the same as an absent one.
pub fn clear(root: &mut Tree, path: &Path) -> Option<Value> {
    let (last, parents) = path.segments().split_last()?;
    let mut node = root;
    for segment in parents {
        node = node.get_mut(segment)?.as_object_mut()?;
    }
    node.remove(last)
}

/// Independent copy of the whole tree
pub fn deep_copy(root: &Tree) -> Tree {
    root.clone()
}
