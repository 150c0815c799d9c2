//! Field-level validation rules.
//!
//! Rules are declared once in field order and evaluated independently; every
//! violation is collected so all problems can be reported in one pass.

use super::key::CanonicalKey;
use super::types::Config;
use super::value::Value;
use crate::error::ConfigResult;
use std::fmt;

/// Identity field whose `Required` violation carries a remediation hint.
pub const IDENTITY_KEY: &str = "app.name";

/// Allowed values for `app.environment`.
pub const ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];

/// A single-field predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// The string value must be non-empty. Never fires on non-string fields.
    Required,
    /// The integer value must lie in `[min, max]`.
    Range { min: i64, max: i64 },
    /// A non-empty string value must be one of `allowed`. Empty is exempt.
    OneOf(Vec<String>),
}

impl Rule {
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::OneOf(allowed.into_iter().map(Into::into).collect())
    }

    /// Stable name of the rule kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::Range { .. } => "range",
            Rule::OneOf(_) => "one_of",
        }
    }

    /// Whether `value` violates this rule.
    pub fn is_violated_by(&self, value: &Value) -> bool {
        match (self, value) {
            (Rule::Required, Value::String(s)) => s.is_empty(),
            (Rule::Range { min, max }, Value::Integer(n)) => n < min || n > max,
            (Rule::OneOf(allowed), Value::String(s)) => {
                !s.is_empty() && !allowed.iter().any(|a| a == s)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::Range { min, max } => write!(f, "range [{}, {}]", min, max),
            Rule::OneOf(allowed) => write!(f, "one of [{}]", allowed.join(" ")),
        }
    }
}

/// A rule attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub key: CanonicalKey,
    pub rule: Rule,
}

impl FieldRule {
    pub fn new(key: &str, rule: Rule) -> ConfigResult<Self> {
        Ok(Self {
            key: CanonicalKey::parse(key)?,
            rule,
        })
    }
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: CanonicalKey,
    pub rule: Rule,
    /// The bound value that failed the rule.
    pub value: Value,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: value {} violates {}",
            self.field, self.value, self.rule
        )
    }
}

/// The application's rules in field-declaration order.
pub fn default_rules() -> ConfigResult<Vec<FieldRule>> {
    Ok(vec![
        FieldRule::new(IDENTITY_KEY, Rule::Required)?,
        FieldRule::new("app.environment", Rule::one_of(ENVIRONMENTS))?,
        FieldRule::new(
            "server.port",
            Rule::Range {
                min: 1024,
                max: 9000,
            },
        )?,
    ])
}

/// Evaluate every rule against `config`, in declaration order.
pub fn validate(config: &Config, rules: &[FieldRule]) -> Vec<Violation> {
    rules
        .iter()
        .filter_map(|field_rule| {
            let value = config.field(&field_rule.key)?;
            field_rule.rule.is_violated_by(&value).then(|| Violation {
                field: field_rule.key.clone(),
                rule: field_rule.rule.clone(),
                value,
            })
        })
        .collect()
}
