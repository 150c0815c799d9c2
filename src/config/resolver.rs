//! One resolution call, end to end: merge, bind, validate.
//!
//! A `Resolver` is built once from an explicit binding registry and rule list
//! and passed by reference to whatever needs it. Each call to
//! [`Resolver::resolve`] is an independent computation over the current state
//! of the source layers; nothing is cached between calls.

use super::bind::bind;
use super::bindings::{self, Binding};
use super::diagnostics::DiagnosticFormatter;
use super::key::{CanonicalKey, KeySpace};
use super::merge::{ConfigTree, merge};
use super::source::SourceLayer;
use super::types::Config;
use super::validate::{self, FieldRule, Violation};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;
use tracing::{debug, info};

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The bound and validated configuration.
    pub config: Config,
    /// The merged snapshot it was bound from, with per-key provenance.
    pub tree: ConfigTree,
}

#[derive(Debug, Clone)]
pub struct Resolver {
    keys: KeySpace,
    bindings: Vec<Binding>,
    rules: Vec<FieldRule>,
}

impl Resolver {
    /// Build a resolver, checking every binding up front.
    ///
    /// Each bound key must be unique, name a field of `Config` of the declared
    /// kind and have an environment variable name. Flag names must be unique.
    /// Any other registry fails construction with `InvalidKey`.
    pub fn new(keys: KeySpace, bindings: Vec<Binding>, rules: Vec<FieldRule>) -> ConfigResult<Self> {
        let defaults = Config::default();
        let mut seen_keys = HashSet::new();
        let mut seen_flags = HashSet::new();
        for binding in &bindings {
            let invalid = |reason: String| ConfigError::invalid_key(binding.key.to_string(), reason);

            keys.env_var(&binding.key)?;
            let Some(slot) = defaults.field(&binding.key) else {
                return Err(invalid("no configuration field with this key".to_string()));
            };
            if slot.type_name() != binding.kind.zero().type_name() {
                return Err(invalid(format!(
                    "declared as {} but the field holds {}",
                    binding.kind,
                    slot.type_name()
                )));
            }
            if !seen_keys.insert(&binding.key) {
                return Err(invalid("bound more than once".to_string()));
            }
            if let Some(flag) = binding.flag {
                if !seen_flags.insert(flag.long) {
                    return Err(invalid(format!("flag --{} is already bound", flag.long)));
                }
            }
        }
        for rule in &rules {
            if bindings::find(&bindings, &rule.key).is_none() {
                return Err(ConfigError::invalid_key(
                    rule.key.to_string(),
                    "validation rule targets an unbound field",
                ));
            }
        }

        Ok(Self {
            keys,
            bindings,
            rules,
        })
    }

    /// The application's resolver: `MYAPP_` prefix, default bindings and rules.
    pub fn standard() -> ConfigResult<Self> {
        Self::new(
            KeySpace::default(),
            bindings::default_bindings()?,
            validate::default_rules()?,
        )
    }

    pub fn keys(&self) -> &KeySpace {
        &self.keys
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn formatter(&self) -> DiagnosticFormatter<'_> {
        DiagnosticFormatter::new(&self.bindings, &self.keys)
    }

    /// Merge the layers into a snapshot without binding it.
    pub fn merge(&self, layers: &[&dyn SourceLayer]) -> ConfigTree {
        let known: Vec<CanonicalKey> = self.bindings.iter().map(|b| b.key.clone()).collect();
        merge(&known, layers)
    }

    /// Merge and bind, without validating.
    ///
    /// Structural errors (`TypeMismatch`, `UnknownField`) abort here.
    pub fn bind(&self, layers: &[&dyn SourceLayer]) -> ConfigResult<Resolution> {
        let tree = self.merge(layers);
        debug!(keys = tree.len(), "Merged configuration layers");
        let config = bind(&tree, &self.bindings)?;
        Ok(Resolution { config, tree })
    }

    /// Evaluate the declared rules against a bound config.
    pub fn validate(&self, config: &Config) -> Vec<Violation> {
        validate::validate(config, &self.rules)
    }

    /// Resolve the layers into a validated `Config`.
    ///
    /// Fails with `ConfigError::Validation` carrying every violation when any
    /// declared rule does not hold.
    pub fn resolve(&self, layers: &[&dyn SourceLayer]) -> ConfigResult<Resolution> {
        let resolution = self.bind(layers)?;
        let violations = self.validate(&resolution.config);
        if !violations.is_empty() {
            info!(count = violations.len(), "Configuration failed validation");
            return Err(ConfigError::Validation(violations));
        }
        Ok(resolution)
    }
}
