//! Environment variable layer.
//!
//! A key is present iff `<PREFIX>_<SEGMENT>_..._<SEGMENT>` is set. Values are
//! always strings; the binder coerces them to the field's declared type.

use super::key::{CanonicalKey, KeySpace};
use super::source::SourceLayer;
use super::value::{Layer, RawValue};
use std::collections::HashMap;
use std::env::VarError;
use tracing::{debug, warn};

/// Abstraction over the process environment so tests never mutate it.
pub trait EnvSource {
    /// Get the value of an environment variable by name.
    fn get(&self, name: &str) -> Option<String>;
}

/// Environment source that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        decode_var(name, std::env::var(name))
    }
}

/// A variable that is set but not valid UTF-8 cannot be read as a value; it is
/// reported and treated as unset.
fn decode_var(name: &str, value: Result<String, VarError>) -> Option<String> {
    match value {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            warn!(env = %name, value = ?raw, "Ignoring environment variable that is not valid UTF-8");
            None
        }
    }
}

/// Environment source backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvSource for MapEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// The environment as a source layer.
///
/// The environment cannot enumerate keys on its own; it answers lookups for
/// keys that the binding registry or another layer knows about. Keys whose
/// segments have no environment name (e.g. `features.enable_metrics`) are
/// never present here.
#[derive(Debug, Clone)]
pub struct EnvLayer<E> {
    keys: KeySpace,
    source: E,
}

impl<E: EnvSource> EnvLayer<E> {
    pub fn new(keys: KeySpace, source: E) -> Self {
        Self { keys, source }
    }

    pub fn source(&self) -> &E {
        &self.source
    }
}

impl<E: EnvSource> SourceLayer for EnvLayer<E> {
    fn layer(&self) -> Layer {
        Layer::Environment
    }

    fn keys(&self) -> Vec<CanonicalKey> {
        Vec::new()
    }

    fn lookup(&self, key: &CanonicalKey) -> Option<RawValue> {
        let name = self.keys.env_var(key).ok()?;
        let value = self.source.get(&name)?;
        debug!(env = %name, key = %key, "Environment variable set");
        Some(RawValue::env(value))
    }
}
