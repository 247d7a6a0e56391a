//! Path addressing for the state tree
//!
//! A [`Path`] is an ordered list of string segments. The empty path names
//! the tree root, which has no addressable value of its own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Location in the state tree
///
/// Paths are plain structural identifiers: two paths are equal when their
/// segments are equal element by element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    /// Create a path from any sequence of segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The empty path
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted path such as `job.compensation.amount`
    ///
    /// Whitespace around each segment is trimmed and empty segments are
    /// dropped, so `" job . title "` parses to `job.title` and `""` and
    /// `"."` both parse to the root.
    pub fn parse(dotted: &str) -> Self {
        Self::new(dotted.split('.').map(str::trim).filter(|s| !s.is_empty()))
    }

    /// The segments of this path
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment, if any
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A new path one segment deeper
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// True if `prefix` is a leading run of this path's segments
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Iterate over segments
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}

impl AsRef<[String]> for Path {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A bare string is a single-segment path (a top-level key)
impl From<&str> for Path {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl From<String> for Path {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

impl From<&[&str]> for Path {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

impl From<Vec<String>> for Path {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<Vec<&str>> for Path {
    fn from(segments: Vec<&str>) -> Self {
        Self::new(segments)
    }
}

impl From<&Path> for Path {
    fn from(path: &Path) -> Self {
        path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted() {
        let path = Path::parse("job.compensation.amount");
        assert_eq!(path, Path::from(["job", "compensation", "amount"]));
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some("job"));
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        assert_eq!(Path::parse("job..title."), Path::from(["job", "title"]));
        assert!(Path::parse("").is_empty());
        assert!(Path::parse(".").is_empty());
    }

    #[test]
    fn test_parse_trims_segments() {
        assert_eq!(Path::parse(" job . title "), Path::from(["job", "title"]));
        assert!(Path::parse(" . ").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Path::from(["job", "title"]).to_string(), "job.title");
        assert_eq!(Path::root().to_string(), "<root>");
    }

    #[test]
    fn test_child_and_starts_with() {
        let job = Path::from("job");
        let title = job.child("title");
        assert_eq!(title, Path::from(["job", "title"]));
        assert!(title.starts_with(&job));
        assert!(title.starts_with(&Path::root()));
        assert!(!job.starts_with(&title));
    }

    #[test]
    fn test_equality_is_elementwise() {
        assert_eq!(Path::from(vec!["a", "b"]), Path::new(["a", "b"]));
        assert_ne!(Path::from(["a", "b"]), Path::from(["b", "a"]));
        assert_ne!(Path::from(["a"]), Path::from(["a", "b"]));
    }

    #[test]
    fn test_serde_transparent() {
        let path = Path::from(["job", "title"]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["job","title"]"#);
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
