//! Layered configuration resolution.
//!
//! Resolves `Config` from three layers with strict precedence:
//! 1. **Flags** - command-line flags explicitly passed (highest priority)
//! 2. **Environment** - `MYAPP_<GROUP>_<FIELD>` variables
//! 3. **File** - `config.yaml` / `config.yml` / `config.json` (lowest priority)
//!
//! ## Pipeline
//! - [`merge`] resolves every observed key independently to the first layer
//!   that sets it, producing a [`ConfigTree`]
//! - [`bind`] coerces fixed fields to their declared types and captures the
//!   rest as extensions
//! - [`validate`] evaluates the declared rules and collects every violation
//!
//! ## Environment Variables
//! - `MYAPP_CONFIG` - Explicit config file (unless `--config` is given)
//! - `MYAPP_<SEGMENT>_..._<SEGMENT>` - Value for the canonical key
//!   `<segment>. ... .<segment>`

pub mod bind;
pub mod bindings;
pub mod diagnostics;
pub mod env;
pub mod file;
pub mod flags;
pub mod key;
pub mod merge;
pub mod resolver;
pub mod source;
pub mod types;
pub mod validate;
pub mod value;

pub use bindings::{Binding, FieldKind, FlagSpec, default_bindings};
pub use diagnostics::DiagnosticFormatter;
pub use env::{EnvLayer, EnvSource, MapEnv, StdEnv};
pub use file::{FileLayer, FileLocation, FileStatus};
pub use flags::FlagLayer;
pub use key::{CanonicalKey, KeySpace};
pub use merge::ConfigTree;
pub use resolver::{Resolution, Resolver};
pub use source::SourceLayer;
pub use types::*;
pub use validate::{FieldRule, Rule, Violation, default_rules};
pub use value::{Layer, RawValue, Value};
