//! Key-path access into a configuration tree.
//!
//! [`ConfigTree`] wraps the accumulated `serde_json` map and lets callers
//! address nested values with dotted strings (`"db.host"`) or explicit
//! segment lists (`&["db", "host"]`).

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A path into the configuration tree, one segment per nesting level.
///
/// # Examples
///
/// ```
/// use confstack::KeyPath;
///
/// let dotted = KeyPath::from("db.primary.host");
/// let segmented = KeyPath::from(&["db", "primary", "host"][..]);
/// assert_eq!(dotted, segmented);
/// assert_eq!(dotted.segments().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// The individual path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self(path.split('.').map(str::to_string).collect())
    }
}

impl From<String> for KeyPath {
    fn from(path: String) -> Self {
        Self::from(path.as_str())
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<&[&str; N]> for KeyPath {
    fn from(segments: &[&str; N]) -> Self {
        Self::from(&segments[..])
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

/// The accumulated configuration data with path-based accessors.
///
/// # Examples
///
/// ```
/// use confstack::ConfigTree;
/// use serde_json::json;
///
/// let mut tree = ConfigTree::new();
/// tree.set("db.host", json!("localhost"));
/// assert_eq!(tree.get("db.host"), Some(&json!("localhost")));
/// assert_eq!(tree.get_or("db.port", json!(5432)), json!(5432));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    data: Map<String, Value>,
}

impl ConfigTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the whole tree.
    #[must_use]
    pub fn all(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Returns the whole tree mutably; used by the merge step.
    pub(crate) fn all_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Looks up the value at `path`.
    ///
    /// Numeric segments index into lists.
    pub fn get<P: Into<KeyPath>>(&self, path: P) -> Option<&Value> {
        let path = path.into();
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.data.get(first)?;
        for segment in rest {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Looks up the value at `path`, falling back to `default` on a miss.
    pub fn get_or<P: Into<KeyPath>>(&self, path: P, default: Value) -> Value {
        self.get(path).cloned().unwrap_or(default)
    }

    /// Deserializes the value at `path` into `T`.
    ///
    /// Returns `Ok(None)` when nothing is stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value does not have the shape of `T`.
    pub fn get_as<T, P>(&self, path: P) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        P: Into<KeyPath>,
    {
        let path = path.into();
        match self.get(path.clone()) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| Error::Serialize {
                    format: "value",
                    message: format!("'{}': {e}", path.segments().join(".")),
                }),
        }
    }

    /// Returns true if a value is stored at `path`.
    pub fn has<P: Into<KeyPath>>(&self, path: P) -> bool {
        self.get(path).is_some()
    }

    /// Stores `value` at `path`, creating intermediate maps as needed.
    ///
    /// Any intermediate that is not a map is replaced by an empty map.
    pub fn set<P: Into<KeyPath>>(&mut self, path: P, value: Value) {
        let path = path.into();
        let Some((last, parents)) = path.segments().split_last() else {
            return;
        };

        let mut current = &mut self.data;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            current = descend_mut(slot);
        }
        current.insert(last.clone(), value);
    }
}

/// Finds (or creates) the map a `set` should continue into.
pub(crate) fn descend_mut(slot: &mut Value) -> &mut Map<String, Value> {
    match slot {
        Value::Object(map) => map,
        other => {
            *other = Value::Object(Map::new());
            descend_mut(other)
        }
    }
}

impl From<Map<String, Value>> for ConfigTree {
    fn from(data: Map<String, Value>) -> Self {
        Self { data }
    }
}
