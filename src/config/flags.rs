//! Command-line flag layer.
//!
//! Flags are registered on the clap command from the binding registry. A
//! flag value is present only when the flag was passed on the command line;
//! its declared default never counts as set.

use super::bindings::{Binding, FieldKind};
use super::key::CanonicalKey;
use super::source::SourceLayer;
use super::value::{Layer, RawValue, Value};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use indexmap::IndexMap;

/// Build the clap argument for a binding's flag.
pub fn flag_arg(binding: &Binding) -> Option<Arg> {
    let flag = binding.flag?;
    let mut arg = Arg::new(flag.long).long(flag.long).help(flag.help);
    if let Some(short) = flag.short {
        arg = arg.short(short);
    }

    let arg = match binding.kind {
        FieldKind::String => arg.value_name("STRING").default_value(""),
        FieldKind::Integer => arg
            .value_name("INT")
            .value_parser(value_parser!(i64))
            .allow_negative_numbers(true)
            .default_value("0"),
        FieldKind::Boolean => arg.action(ArgAction::SetTrue),
    };
    Some(arg)
}

/// Register every bound flag on `cmd`.
pub fn register_flags(cmd: Command, bindings: &[Binding]) -> Command {
    bindings
        .iter()
        .filter_map(flag_arg)
        .fold(cmd, |cmd, arg| cmd.arg(arg))
}

/// Flag values by canonical key, captured from parsed arguments.
#[derive(Debug, Clone, Default)]
pub struct FlagLayer {
    values: IndexMap<CanonicalKey, RawValue>,
}

impl FlagLayer {
    /// A layer where no flag was passed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture every bound flag from `matches`.
    pub fn from_matches(matches: &ArgMatches, bindings: &[Binding]) -> Self {
        let mut values = IndexMap::new();
        for binding in bindings {
            let Some(flag) = binding.flag else {
                continue;
            };
            let id = flag.long;
            let value = match binding.kind {
                FieldKind::String => matches
                    .try_get_one::<String>(id)
                    .ok()
                    .flatten()
                    .map(|s| Value::String(s.clone())),
                FieldKind::Integer => matches
                    .try_get_one::<i64>(id)
                    .ok()
                    .flatten()
                    .map(|n| Value::Integer(*n)),
                FieldKind::Boolean => matches
                    .try_get_one::<bool>(id)
                    .ok()
                    .flatten()
                    .map(|b| Value::Boolean(*b)),
            };
            let default = binding.kind.zero();
            let explicitly_set = matches.value_source(id) == Some(ValueSource::CommandLine);
            values.insert(
                binding.key.clone(),
                RawValue::flag(value.unwrap_or_else(|| default.clone()), default, explicitly_set),
            );
        }
        Self { values }
    }

    /// Keys whose flags were passed on the command line.
    pub fn explicit_keys(&self) -> Vec<&CanonicalKey> {
        self.values
            .iter()
            .filter(|(_, raw)| raw.explicitly_set)
            .map(|(key, _)| key)
            .collect()
    }
}

impl SourceLayer for FlagLayer {
    fn layer(&self) -> Layer {
        Layer::Flag
    }

    fn keys(&self) -> Vec<CanonicalKey> {
        self.values.keys().cloned().collect()
    }

    fn lookup(&self, key: &CanonicalKey) -> Option<RawValue> {
        self.values.get(key).cloned()
    }
}
