//! Leaf-level merging of the source layers.
//!
//! Every key observed in any layer is resolved independently with strict
//! precedence Flag > Environment > File. Nested mappings are not deep-merged:
//! a leaf in a higher layer replaces the same leaf in a lower one, while
//! sibling leaves from different layers all survive.

use super::key::CanonicalKey;
use super::source::SourceLayer;
use super::value::{Layer, RawValue, Value};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// The merged snapshot: winning raw value for every discovered key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    entries: IndexMap<CanonicalKey, RawValue>,
}

impl ConfigTree {
    pub fn get(&self, key: &CanonicalKey) -> Option<&RawValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &CanonicalKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalKey, &RawValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layer each key was resolved from.
    pub fn provenance(&self) -> impl Iterator<Item = (&CanonicalKey, Layer)> {
        self.entries.iter().map(|(key, raw)| (key, raw.layer))
    }

    /// The snapshot as one nested mapping.
    pub fn to_value(&self) -> Value {
        let mut root = IndexMap::new();
        for (key, raw) in &self.entries {
            insert_path(&mut root, key.segments(), raw.value.clone());
        }
        Value::Map(root)
    }
}

/// Insert `value` at `path`, creating intermediate mappings.
///
/// A non-mapping value found on the way is replaced by a mapping.
pub fn insert_path(map: &mut IndexMap<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = map;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Map(IndexMap::new()));
        if !matches!(entry, Value::Map(_)) {
            *entry = Value::Map(IndexMap::new());
        }
        current = match entry {
            Value::Map(next) => next,
            _ => return,
        };
    }
    current.insert(last.clone(), value);
}

/// Merge `layers` into a single snapshot.
///
/// The candidate keys are `known` (the binding registry) followed by every key
/// the layers enumerate, in first-seen order. For each candidate the first
/// layer in precedence order holding an explicitly set value wins; a key no
/// layer sets is left out entirely.
pub fn merge(known: &[CanonicalKey], layers: &[&dyn SourceLayer]) -> ConfigTree {
    let mut ordered: Vec<&dyn SourceLayer> = layers.to_vec();
    ordered.sort_by(|a, b| b.layer().cmp(&a.layer()));

    let mut candidates: IndexSet<CanonicalKey> = known.iter().cloned().collect();
    for layer in layers {
        candidates.extend(layer.keys());
    }

    let mut entries = IndexMap::new();
    for key in candidates {
        let winner = ordered.iter().find_map(|layer| layer.lookup_present(&key));
        match winner {
            Some(raw) => {
                debug!(key = %key, layer = %raw.layer, "Resolved key");
                entries.insert(key, raw);
            }
            None => debug!(key = %key, "No layer sets key"),
        }
    }

    ConfigTree { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::{EnvLayer, MapEnv};
    use crate::config::file::FileLayer;
    use crate::config::key::KeySpace;
    use std::path::Path;

    /// Minimal in-memory flag layer.
    struct Flags(Vec<(CanonicalKey, Value, bool)>);

    impl SourceLayer for Flags {
        fn layer(&self) -> Layer {
            Layer::Flag
        }

        fn keys(&self) -> Vec<CanonicalKey> {
            self.0.iter().map(|(k, _, _)| k.clone()).collect()
        }

        fn lookup(&self, key: &CanonicalKey) -> Option<RawValue> {
            self.0
                .iter()
                .find(|(k, _, _)| k == key)
                .map(|(_, v, set)| RawValue::flag(v.clone(), Value::Integer(0), *set))
        }
    }

    fn key(path: &str) -> CanonicalKey {
        CanonicalKey::parse(path).unwrap()
    }

    fn file(content: &str) -> FileLayer {
        FileLayer::parse(content, Path::new("config.yaml")).unwrap()
    }

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file = file("server:\n  port: 8080\n");
        let env = EnvLayer::new(
            KeySpace::default(),
            MapEnv::from_pairs([("MYAPP_SERVER_PORT", "8081")]),
        );
        let flags = Flags(vec![(key("server.port"), Value::Integer(8082), true)]);

        let tree = merge(&[key("server.port")], &[&file, &env, &flags]);
        let raw = tree.get(&key("server.port")).unwrap();
        assert_eq!(raw.value, Value::Integer(8082));
        assert_eq!(raw.layer, Layer::Flag);
    }

    #[test]
    fn test_layer_argument_order_does_not_matter() {
        let file = file("server:\n  port: 8080\n");
        let env = EnvLayer::new(
            KeySpace::default(),
            MapEnv::from_pairs([("MYAPP_SERVER_PORT", "8081")]),
        );

        let tree = merge(&[key("server.port")], &[&env, &file]);
        assert_eq!(tree.get(&key("server.port")).unwrap().layer, Layer::Environment);
    }

    #[test]
    fn test_unset_flag_falls_through() {
        let file = file("server:\n  port: 8080\n");
        let flags = Flags(vec![(key("server.port"), Value::Integer(0), false)]);

        let tree = merge(&[], &[&file, &flags]);
        let raw = tree.get(&key("server.port")).unwrap();
        assert_eq!(raw.value, Value::Integer(8080));
        assert_eq!(raw.layer, Layer::File);
    }

    #[test]
    fn test_absent_key_is_left_out() {
        let flags = Flags(vec![(key("server.port"), Value::Integer(0), false)]);
        let tree = merge(&[key("app.name")], &[&flags]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_sibling_leaves_from_different_layers() {
        let file = file("server:\n  host: localhost\n  port: 8080\n");
        let flags = Flags(vec![(key("server.port"), Value::Integer(9000), true)]);

        let tree = merge(&[], &[&file, &flags]);
        assert_eq!(tree.len(), 2);
        assert_eq!(
            tree.to_value(),
            Value::Map(IndexMap::from([(
                "server".to_string(),
                Value::Map(IndexMap::from([
                    ("host".to_string(), Value::from("localhost")),
                    ("port".to_string(), Value::Integer(9000)),
                ])),
            )]))
        );
    }

    #[test]
    fn test_provenance() {
        let file = file("app:\n  name: FileApp\nserver:\n  port: 8080\n");
        let env = EnvLayer::new(
            KeySpace::default(),
            MapEnv::from_pairs([("MYAPP_APP_NAME", "EnvApp")]),
        );
        let tree = merge(&[], &[&file, &env]);
        let provenance: Vec<(String, Layer)> = tree
            .provenance()
            .map(|(k, layer)| (k.to_string(), layer))
            .collect();
        assert_eq!(
            provenance,
            vec![
                ("app.name".to_string(), Layer::Environment),
                ("server.port".to_string(), Layer::File),
            ]
        );
    }

    #[test]
    fn test_insert_path_replaces_scalar_parent() {
        let mut map = IndexMap::new();
        map.insert("a".to_string(), Value::Integer(1));
        insert_path(&mut map, &["a".to_string(), "b".to_string()], Value::Boolean(true));
        assert_eq!(
            map["a"],
            Value::Map(IndexMap::from([("b".to_string(), Value::Boolean(true))]))
        );
    }
}
