//! Binding the merged snapshot onto `Config`.
//!
//! Every key in the snapshot goes to exactly one place: a fixed field, or the
//! extensions bag under its top-level segment. Keys inside a fixed group that
//! match no fixed field have no legal destination and fail the bind.

use super::bindings::{self, Binding, FieldKind};
use super::merge::{ConfigTree, insert_path};
use super::types::Config;
use super::value::Value;
use crate::error::{ConfigError, ConfigResult};
use tracing::debug;

/// Bind `tree` onto a fresh `Config`.
///
/// Fixed fields absent from the tree keep their zero value.
pub fn bind(tree: &ConfigTree, bindings: &[Binding]) -> ConfigResult<Config> {
    let mut config = Config::default();
    let groups = bindings::fixed_groups(bindings);

    for (key, raw) in tree.iter() {
        if let Some(binding) = bindings::find(bindings, key) {
            let value = coerce(&key.to_string(), &raw.value, binding.kind)?;
            if !config.set_field(key, value) {
                return Err(ConfigError::UnknownField {
                    key: key.to_string(),
                });
            }
            continue;
        }

        if groups.contains(&key.group()) {
            if key.len() == 1 {
                match &raw.value {
                    // `server: {}` sets nothing.
                    Value::Map(m) if m.is_empty() => continue,
                    other => {
                        return Err(ConfigError::type_mismatch(
                            key.to_string(),
                            "mapping",
                            describe(other),
                        ));
                    }
                }
            }
            return Err(ConfigError::UnknownField {
                key: key.to_string(),
            });
        }

        debug!(key = %key, "Captured as extension");
        insert_path(&mut config.extensions, key.segments(), raw.value.clone());
    }

    Ok(config)
}

/// Coerce a raw value to a field's declared type.
///
/// Strings pass through; scalars bound to a string field are rendered as
/// text. Integer fields accept integers and numeric strings. Boolean fields
/// accept booleans and `true/false/1/0/yes/no` strings.
pub fn coerce(key: &str, value: &Value, kind: FieldKind) -> ConfigResult<Value> {
    let mismatch = || ConfigError::type_mismatch(key, kind.to_string(), describe(value));

    match (kind, value) {
        (FieldKind::String, Value::String(_)) => Ok(value.clone()),
        (FieldKind::String, Value::Integer(n)) => Ok(Value::String(n.to_string())),
        (FieldKind::String, Value::Float(x)) => Ok(Value::String(x.to_string())),
        (FieldKind::String, Value::Boolean(b)) => Ok(Value::String(b.to_string())),

        (FieldKind::Integer, Value::Integer(_)) => Ok(value.clone()),
        (FieldKind::Integer, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| mismatch()),

        (FieldKind::Boolean, Value::Boolean(_)) => Ok(value.clone()),
        (FieldKind::Boolean, Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Boolean(true)),
            "false" | "0" | "no" => Ok(Value::Boolean(false)),
            _ => Err(mismatch()),
        },

        _ => Err(mismatch()),
    }
}

/// `string "abc"`, `integer 5`, `mapping {...}`.
fn describe(value: &Value) -> String {
    format!("{} {}", value.type_name(), value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::bindings::default_bindings;
    use crate::config::file::FileLayer;
    use crate::config::key::CanonicalKey;
    use crate::config::merge::merge;
    use indexmap::IndexMap;
    use std::path::Path;

    fn tree(content: &str) -> ConfigTree {
        let file = FileLayer::parse(content, Path::new("config.yaml")).unwrap();
        merge(&[], &[&file])
    }

    #[test]
    fn test_bind_fixed_fields() {
        let config = bind(
            &tree("app:\n  name: Demo\nserver:\n  port: \"8080\"\n  timeout: 30\n"),
            &default_bindings().unwrap(),
        )
        .unwrap();
        assert_eq!(config.app.name, "Demo");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.timeout, 30);
        assert_eq!(config.database.host, "");
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn test_bind_captures_extensions_with_nested_shape() {
        let content = r#"
app:
  name: Demo
features:
  enable_metrics: true
  cache:
    ttl: 300
custom:
  tags: [a, b]
"#;
        let config = bind(&tree(content), &default_bindings().unwrap()).unwrap();
        assert_eq!(
            config.extensions["features"],
            Value::Map(IndexMap::from([
                ("enable_metrics".to_string(), Value::Boolean(true)),
                (
                    "cache".to_string(),
                    Value::Map(IndexMap::from([("ttl".to_string(), Value::Integer(300))]))
                ),
            ]))
        );
        assert_eq!(
            config.extensions["custom"],
            Value::Map(IndexMap::from([(
                "tags".to_string(),
                Value::List(vec![Value::from("a"), Value::from("b")])
            )]))
        );
        assert!(!config.extensions.contains_key("app"));
    }

    #[test]
    fn test_type_mismatch_for_non_numeric_port() {
        let err = bind(
            &tree("server:\n  port: abc\n"),
            &default_bindings().unwrap(),
        )
        .unwrap_err();
        match err {
            ConfigError::TypeMismatch {
                key,
                expected,
                actual,
            } => {
                assert_eq!(key, "server.port");
                assert_eq!(expected, "integer");
                assert_eq!(actual, "string \"abc\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_field_in_fixed_group() {
        let err = bind(
            &tree("server:\n  hostname: x\n"),
            &default_bindings().unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownField { key } if key == "server.hostname"));
    }

    #[test]
    fn test_scalar_fixed_group_is_type_mismatch() {
        let err = bind(&tree("server: 5\n"), &default_bindings().unwrap()).unwrap_err();
        assert!(
            matches!(err, ConfigError::TypeMismatch { ref expected, .. } if expected == "mapping")
        );
    }

    #[test]
    fn test_empty_fixed_group_is_ignored() {
        let config = bind(&tree("server: {}\n"), &default_bindings().unwrap()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_coerce_rules() {
        assert_eq!(
            coerce("k", &Value::from(" 42 "), FieldKind::Integer).unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            coerce("k", &Value::Integer(1), FieldKind::String).unwrap(),
            Value::from("1")
        );
        assert_eq!(
            coerce("k", &Value::from("Yes"), FieldKind::Boolean).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            coerce("k", &Value::from("0"), FieldKind::Boolean).unwrap(),
            Value::Boolean(false)
        );
        assert!(coerce("k", &Value::from("maybe"), FieldKind::Boolean).is_err());
        assert!(coerce("k", &Value::Boolean(true), FieldKind::Integer).is_err());
        assert!(coerce("k", &Value::Float(1.5), FieldKind::Integer).is_err());
        assert!(coerce("k", &Value::List(vec![]), FieldKind::String).is_err());
    }

    #[test]
    fn test_every_default_binding_names_a_field() {
        let config = Config::default();
        for binding in default_bindings().unwrap() {
            assert!(config.field(&binding.key).is_some(), "{}", binding.key);
        }
        assert!(config.field(&CanonicalKey::parse("app").unwrap()).is_none());
    }
}
