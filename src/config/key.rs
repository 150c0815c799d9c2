//! Canonical key naming shared by the file, environment and flag layers.
//!
//! A canonical key is a dotted path such as `server.port`. The file layer
//! addresses it as the same dotted path, the environment layer as
//! `MYAPP_SERVER_PORT`.

use crate::error::{ConfigError, ConfigResult};
use std::fmt;

/// Separator between segments of a canonical key and of a file lookup path.
pub const PATH_SEPARATOR: char = '.';

/// Separator between segments of an environment variable name.
pub const ENV_SEPARATOR: char = '_';

/// Prefix applied to every environment variable the application reads.
pub const DEFAULT_ENV_PREFIX: &str = "MYAPP";

/// A non-empty sequence of lowercase path segments naming one configuration leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(Vec<String>);

impl CanonicalKey {
    /// Parse a dotted path such as `server.port`.
    pub fn parse(path: &str) -> ConfigResult<Self> {
        Self::from_segments(path.split(PATH_SEPARATOR))
    }

    /// Build a key from individual segments, lower-casing each one.
    ///
    /// Segments may not be empty and may not contain the path separator.
    /// Any other character is allowed; only keys with an environment name
    /// are restricted further (see [`KeySpace::env_var`]).
    pub fn from_segments<I, S>(segments: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|s| s.as_ref().to_ascii_lowercase())
            .collect();
        let display = segments.join(".");

        if segments.is_empty() {
            return Err(ConfigError::invalid_key(display, "key has no segments"));
        }

        for segment in &segments {
            if segment.is_empty() {
                return Err(ConfigError::invalid_key(display, "empty segment"));
            }
            if segment.contains(PATH_SEPARATOR) {
                return Err(ConfigError::invalid_key(
                    display,
                    format!("segment '{}' contains '{}'", segment, PATH_SEPARATOR),
                ));
            }
        }

        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// First segment, e.g. `server` for `server.port`.
    pub fn group(&self) -> &str {
        &self.0[0]
    }

    /// Last segment, e.g. `port` for `server.port`.
    pub fn leaf(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new key with `segment` appended.
    pub fn child(&self, segment: &str) -> ConfigResult<Self> {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        Self::from_segments(segments)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Mapping rules between canonical keys and the names each source uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    env_prefix: String,
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl KeySpace {
    pub fn new(env_prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: env_prefix.into().to_ascii_uppercase(),
        }
    }

    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Lookup path of a key inside the parsed file tree.
    pub fn file_path(&self, key: &CanonicalKey) -> String {
        key.segments().join(&PATH_SEPARATOR.to_string())
    }

    /// Environment variable name of a key: `server.port` => `MYAPP_SERVER_PORT`.
    ///
    /// Only keys made of ASCII alphanumeric segments have an environment name;
    /// a segment containing `_` would make the reverse mapping ambiguous.
    pub fn env_var(&self, key: &CanonicalKey) -> ConfigResult<String> {
        let mut name = self.env_prefix.clone();
        for segment in key.segments() {
            if !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::invalid_key(
                    key.to_string(),
                    format!(
                        "segment '{}' cannot be mapped to an environment variable name",
                        segment
                    ),
                ));
            }
            name.push(ENV_SEPARATOR);
            name.push_str(&segment.to_ascii_uppercase());
        }
        Ok(name)
    }

    /// Name of the environment variable that points at an explicit config file.
    pub fn config_file_var(&self) -> String {
        format!("{}{}CONFIG", self.env_prefix, ENV_SEPARATOR)
    }
}
