//! Explicit registry of configuration fields.
//!
//! Every fixed field is declared once here with its canonical key, declared
//! type and command-line flag. The resolver, the flag front end and the
//! diagnostics all read the same table.

use super::key::CanonicalKey;
use super::value::Value;
use crate::error::ConfigResult;
use std::fmt;

/// Declared type of a fixed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
}

impl FieldKind {
    /// Zero value a field takes when no layer supplies it.
    pub fn zero(&self) -> Value {
        match self {
            FieldKind::String => Value::String(String::new()),
            FieldKind::Integer => Value::Integer(0),
            FieldKind::Boolean => Value::Boolean(false),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Boolean => write!(f, "boolean"),
        }
    }
}

/// Command-line flag bound to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub long: &'static str,
    pub short: Option<char>,
    pub help: &'static str,
}

/// One fixed field: its key, its type and how it is supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: CanonicalKey,
    pub kind: FieldKind,
    pub flag: Option<FlagSpec>,
}

impl Binding {
    pub fn new(key: &str, kind: FieldKind) -> ConfigResult<Self> {
        Ok(Self {
            key: CanonicalKey::parse(key)?,
            kind,
            flag: None,
        })
    }

    pub fn with_flag(mut self, long: &'static str, short: Option<char>, help: &'static str) -> Self {
        self.flag = Some(FlagSpec { long, short, help });
        self
    }
}

/// The application's fixed fields in declaration order.
pub fn default_bindings() -> ConfigResult<Vec<Binding>> {
    use FieldKind::{Integer, String};

    Ok(vec![
        Binding::new("app.name", String)?.with_flag("app-name", Some('n'), "Application name"),
        Binding::new("app.version", String)?.with_flag(
            "app-version",
            Some('v'),
            "Application version",
        ),
        Binding::new("app.environment", String)?.with_flag(
            "app-environment",
            Some('e'),
            "Application environment",
        ),
        Binding::new("server.host", String)?.with_flag("server-host", None, "Server host"),
        Binding::new("server.port", Integer)?.with_flag("server-port", Some('p'), "Server port"),
        Binding::new("server.timeout", Integer)?.with_flag(
            "server-timeout",
            Some('t'),
            "Server timeout in seconds",
        ),
        Binding::new("database.host", String)?.with_flag("db-host", None, "Database host"),
        Binding::new("database.port", Integer)?.with_flag("db-port", None, "Database port"),
        Binding::new("database.username", String)?.with_flag(
            "db-username",
            Some('u'),
            "Database username",
        ),
        Binding::new("database.password", String)?.with_flag(
            "db-password",
            None,
            "Database password",
        ),
        Binding::new("database.name", String)?.with_flag("db-name", Some('d'), "Database name"),
        Binding::new("logging.level", String)?.with_flag("log-level", Some('l'), "Logging level"),
        Binding::new("logging.format", String)?.with_flag(
            "log-format",
            Some('f'),
            "Logging format",
        ),
    ])
}

/// Top-level groups owned by fixed fields, in declaration order.
pub fn fixed_groups(bindings: &[Binding]) -> Vec<&str> {
    let mut groups: Vec<&str> = Vec::new();
    for binding in bindings {
        let group = binding.key.group();
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups
}

/// Find the binding for a key, if the key names a fixed field.
pub fn find<'a>(bindings: &'a [Binding], key: &CanonicalKey) -> Option<&'a Binding> {
    bindings.iter().find(|b| &b.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_cover_all_fields() {
        let bindings = default_bindings().unwrap();
        assert_eq!(bindings.len(), 13);
        assert!(bindings.iter().all(|b| b.flag.is_some()));
    }

    #[test]
    fn test_fixed_groups_in_declaration_order() {
        let bindings = default_bindings().unwrap();
        assert_eq!(
            fixed_groups(&bindings),
            vec!["app", "server", "database", "logging"]
        );
    }

    #[test]
    fn test_flag_names_are_unique() {
        let bindings = default_bindings().unwrap();
        let mut longs: Vec<&str> = bindings.iter().filter_map(|b| b.flag.map(|f| f.long)).collect();
        longs.sort();
        longs.dedup();
        assert_eq!(longs.len(), bindings.len());
    }

    #[test]
    fn test_find_binding() {
        let bindings = default_bindings().unwrap();
        let key = CanonicalKey::parse("server.port").unwrap();
        let binding = find(&bindings, &key).unwrap();
        assert_eq!(binding.kind, FieldKind::Integer);
        assert_eq!(binding.flag.unwrap().short, Some('p'));
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(FieldKind::String.zero(), Value::from(""));
        assert_eq!(FieldKind::Integer.zero(), Value::Integer(0));
        assert_eq!(FieldKind::Boolean.zero(), Value::Boolean(false));
    }
}
