//! Configuration types and structures.
//!
//! `Config` is the bound, strongly typed result of a resolution call. Its
//! exported shape mirrors the canonical key tree: the fixed groups
//! `app`, `server`, `database` and `logging`, followed by any extension
//! groups.

use super::key::CanonicalKey;
use super::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Residual configuration not matched to a fixed field, keyed by top-level segment.
pub type Extensions = IndexMap<String, Value>;

/// Application identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    /// One of `development`, `staging`, `production`, or empty.
    #[serde(default)]
    pub environment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: i64,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub host: String,

    #[serde(default)]
    pub port: i64,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: String,

    #[serde(default)]
    pub format: String,
}

/// Resolved application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Everything else found in the sources, with its nested shape intact.
    #[serde(flatten)]
    pub extensions: Extensions,
}

impl Config {
    /// Current value of a fixed field, or `None` if `key` names no fixed field.
    pub fn field(&self, key: &CanonicalKey) -> Option<Value> {
        let [group, leaf] = key.segments() else {
            return None;
        };
        let value = match (group.as_str(), leaf.as_str()) {
            ("app", "name") => Value::from(self.app.name.as_str()),
            ("app", "version") => Value::from(self.app.version.as_str()),
            ("app", "environment") => Value::from(self.app.environment.as_str()),
            ("server", "host") => Value::from(self.server.host.as_str()),
            ("server", "port") => Value::Integer(self.server.port),
            ("server", "timeout") => Value::Integer(self.server.timeout),
            ("database", "host") => Value::from(self.database.host.as_str()),
            ("database", "port") => Value::Integer(self.database.port),
            ("database", "username") => Value::from(self.database.username.as_str()),
            ("database", "password") => Value::from(self.database.password.as_str()),
            ("database", "name") => Value::from(self.database.name.as_str()),
            ("logging", "level") => Value::from(self.logging.level.as_str()),
            ("logging", "format") => Value::from(self.logging.format.as_str()),
            _ => return None,
        };
        Some(value)
    }

    /// Assign an already coerced value to a fixed field.
    ///
    /// Returns `false` if `key` names no fixed field or the value has the
    /// wrong shape for it.
    pub fn set_field(&mut self, key: &CanonicalKey, value: Value) -> bool {
        let [group, leaf] = key.segments() else {
            return false;
        };
        let slot_str = |slot: &mut String, value: Value| match value {
            Value::String(s) => {
                *slot = s;
                true
            }
            _ => false,
        };
        let slot_int = |slot: &mut i64, value: Value| match value {
            Value::Integer(n) => {
                *slot = n;
                true
            }
            _ => false,
        };
        match (group.as_str(), leaf.as_str()) {
            ("app", "name") => slot_str(&mut self.app.name, value),
            ("app", "version") => slot_str(&mut self.app.version, value),
            ("app", "environment") => slot_str(&mut self.app.environment, value),
            ("server", "host") => slot_str(&mut self.server.host, value),
            ("server", "port") => slot_int(&mut self.server.port, value),
            ("server", "timeout") => slot_int(&mut self.server.timeout, value),
            ("database", "host") => slot_str(&mut self.database.host, value),
            ("database", "port") => slot_int(&mut self.database.port, value),
            ("database", "username") => slot_str(&mut self.database.username, value),
            ("database", "password") => slot_str(&mut self.database.password, value),
            ("database", "name") => slot_str(&mut self.database.name, value),
            ("logging", "level") => slot_str(&mut self.logging.level, value),
            ("logging", "format") => slot_str(&mut self.logging.format, value),
            _ => false,
        }
    }

    /// Navigate the extensions by path, e.g. `["features", "cache_ttl"]`.
    pub fn extension(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.extensions.get(*first)?;
        for segment in rest {
            current = current.as_map()?.get(*segment)?;
        }
        Some(current)
    }

    pub fn extension_str(&self, path: &[&str]) -> Option<&str> {
        self.extension(path)?.as_str()
    }

    pub fn extension_int(&self, path: &[&str]) -> Option<i64> {
        self.extension(path)?.as_i64()
    }

    pub fn extension_bool(&self, path: &[&str]) -> Option<bool> {
        self.extension(path)?.as_bool()
    }

    /// The exported document: fixed groups followed by extension groups.
    pub fn to_document(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
