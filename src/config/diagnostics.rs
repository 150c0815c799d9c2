//! Human-readable rendering of validation violations.

use super::bindings::{self, Binding};
use super::key::KeySpace;
use super::validate::{IDENTITY_KEY, Rule, Violation};
use super::value::Value;
use std::fmt::Write;

/// Renders violations with the field path, the current value and what the
/// rule expects.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticFormatter<'a> {
    bindings: &'a [Binding],
    keys: &'a KeySpace,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(bindings: &'a [Binding], keys: &'a KeySpace) -> Self {
        Self { bindings, keys }
    }

    /// Render every violation under a single heading.
    pub fn render(&self, violations: &[Violation]) -> String {
        let mut out = String::from("Configuration validation failed:\n");
        for violation in violations {
            self.write_violation(&mut out, violation);
        }
        out
    }

    fn write_violation(&self, out: &mut String, violation: &Violation) {
        let _ = writeln!(out, "  - Field '{}' validation failed", violation.field);
        let _ = writeln!(
            out,
            "    Current value: {} (type: {})",
            violation.value,
            violation.value.type_name()
        );
        let _ = writeln!(out, "    Expected: {}", expectation(&violation.rule, &violation.value));

        if violation.rule == Rule::Required && violation.field.to_string() == IDENTITY_KEY {
            self.write_identity_hint(out, violation);
        }
    }

    /// Lists the flag, environment variable and file key that supply the field.
    fn write_identity_hint(&self, out: &mut String, violation: &Violation) {
        let _ = writeln!(
            out,
            "    Hint: Application name is mandatory. Provide it via:"
        );

        let flag = bindings::find(self.bindings, &violation.field).and_then(|b| b.flag);
        if let Some(flag) = flag {
            match flag.short {
                Some(short) => {
                    let _ = writeln!(out, "      • Flag: --{} or -{}", flag.long, short);
                }
                None => {
                    let _ = writeln!(out, "      • Flag: --{}", flag.long);
                }
            }
        }
        if let Ok(var) = self.keys.env_var(&violation.field) {
            let _ = writeln!(out, "      • Environment variable: {}", var);
        }
        let _ = writeln!(
            out,
            "      • Config file: {}",
            self.keys.file_path(&violation.field)
        );
    }
}

/// What the rule expects, specialised to how `value` failed it.
fn expectation(rule: &Rule, value: &Value) -> String {
    match rule {
        Rule::Required => "non-empty value".to_string(),
        Rule::Range { min, max } => match value {
            Value::Integer(n) if n < min => format!("value greater than or equal to {}", min),
            Value::Integer(n) if n > max => format!("value less than or equal to {}", max),
            _ => format!("value between {} and {}", min, max),
        },
        Rule::OneOf(allowed) => format!("one of [{}]", allowed.join(" ")),
    }
}
