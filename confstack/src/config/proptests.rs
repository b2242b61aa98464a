//! Property-based tests for deep merging and key-path access.

use super::merger::ConfigMerger;
use super::tree::ConfigTree;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
    ]
}

fn scalar_map_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,6}", scalar_strategy(), 0..8)
        .prop_map(|entries| entries.into_iter().collect())
}

fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn tree_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,4}", value_strategy(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Merging the same scalar-only document twice changes nothing.
    #[test]
    fn merge_scalar_document_is_idempotent(doc in scalar_map_strategy()) {
        let once = ConfigMerger::merge([doc.clone()]);
        let twice = ConfigMerger::merge([doc.clone(), doc]);
        prop_assert_eq!(once, twice);
    }

    // Merging onto an empty tree yields the document itself.
    #[test]
    fn merge_onto_empty_is_identity(doc in tree_strategy()) {
        let mut target = Map::new();
        ConfigMerger::merge_into(&mut target, doc.clone());
        prop_assert_eq!(target, doc);
    }

    // Every non-map value of the later document wins.
    #[test]
    fn merge_later_non_maps_win(low in tree_strategy(), high in tree_strategy()) {
        let merged = ConfigMerger::merge([low, high.clone()]);
        for (key, value) in &high {
            if !value.is_object() {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    // Keys from either side are never lost.
    #[test]
    fn merge_keeps_every_top_level_key(low in tree_strategy(), high in tree_strategy()) {
        let merged = ConfigMerger::merge([low.clone(), high.clone()]);
        for key in low.keys().chain(high.keys()) {
            prop_assert!(merged.contains_key(key));
        }
    }

    // A value stored with `set` is read back with `get` at the same path.
    #[test]
    fn tree_set_then_get(
        doc in tree_strategy(),
        path in prop::collection::vec("[a-z]{1,4}", 1..4),
        value in scalar_strategy()
    ) {
        let mut tree = ConfigTree::from(doc);
        tree.set(path.clone(), value.clone());
        prop_assert_eq!(tree.get(path), Some(&value));
    }
}
