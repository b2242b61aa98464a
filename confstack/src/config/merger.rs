//! Deep merging of parsed documents into the accumulated tree.
//!
//! Documents are merged in load order. Maps are merged key by key; every
//! other value (scalars, lists, and values whose type changed) is replaced
//! wholesale by the later document.

use serde_json::{Map, Value};

/// Merges parsed configuration documents.
///
/// # Examples
///
/// ```
/// use confstack::ConfigMerger;
/// use serde_json::json;
///
/// let mut target = json!({"db": {"host": "x"}, "list": [1, 2, 3]});
/// let source = json!({"db": {"port": 5432}, "list": [9]});
///
/// ConfigMerger::merge_into(
///     target.as_object_mut().unwrap(),
///     source.as_object().unwrap().clone(),
/// );
/// assert_eq!(target, json!({"db": {"host": "x", "port": 5432}, "list": [9]}));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge every document in order onto an empty tree.
    #[must_use]
    pub fn merge<I>(documents: I) -> Map<String, Value>
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let mut result = Map::new();
        for document in documents {
            Self::merge_into(&mut result, document);
        }
        result
    }

    /// Merge `source` into `target` (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Map onto map: recursive, union of keys
    /// - Anything else: source replaces target
    /// - Lists are never concatenated or merged element-wise
    pub fn merge_into(target: &mut Map<String, Value>, source: Map<String, Value>) {
        for (key, incoming) in source {
            let incoming = match incoming {
                Value::Object(nested) => {
                    if let Some(Value::Object(existing)) = target.get_mut(&key) {
                        Self::merge_into(existing, nested);
                        continue;
                    }
                    Value::Object(nested)
                }
                other => other,
            };

            if target.contains_key(&key) {
                log::trace!("overriding key '{key}'");
            }
            target.insert(key, incoming);
        }
    }

    /// Coerce a parsed document to a tree.
    ///
    /// Null becomes an empty tree, a list is keyed by its indices, and a bare
    /// scalar is stored under the key `"0"`.
    #[must_use]
    pub fn into_tree(document: Value) -> Map<String, Value> {
        match document {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
            scalar => {
                let mut map = Map::new();
                map.insert("0".to_string(), scalar);
                map
            }
        }
    }
}
