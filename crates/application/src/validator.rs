use std::collections::BTreeMap;

use auberge_core::{AppError, AppResult};
use auberge_domain::{FieldDescriptor, FieldKind};
use chrono::Utc;
use regex::Regex;
use serde_json::{Map, Value};

const EMAIL_GRAMMAR: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// One synthesized validation rule, derived from a field kind.
///
/// The kind fully determines the rule shape; descriptor attributes that do
/// not apply to the kind are ignored during synthesis.
#[derive(Debug, Clone)]
pub enum FieldRule {
    /// Numeric value with optional inclusive bounds.
    Number {
        /// Inclusive lower bound.
        min: Option<f64>,
        /// Inclusive upper bound.
        max: Option<f64>,
    },
    /// String matching a standard email grammar.
    Email {
        /// Compiled email grammar.
        grammar: Regex,
    },
    /// Boolean value; never optional, absence is an error.
    Boolean,
    /// String with optional length and pattern constraints.
    Text {
        /// Minimum length in characters, applied to non-empty input.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Compiled regex constraint, applied to non-empty input.
        pattern: Option<Regex>,
    },
}

/// Synthesized validator for a single field.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    key: String,
    label: String,
    required: bool,
    rule: FieldRule,
}

impl FieldValidator {
    /// Returns the field data key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the display label used in error messages.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns whether a value must be present.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns the synthesized rule.
    #[must_use]
    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    fn check(&self, value: Option<&Value>) -> Result<(), String> {
        let present = value.is_some_and(|value| !value.is_null());

        if let FieldRule::Boolean = self.rule {
            return match value {
                Some(Value::Bool(_)) => Ok(()),
                _ => Err(format!("{} must be switched on or off", self.label)),
            };
        }

        if !present {
            return if self.required {
                Err(format!("{} is required", self.label))
            } else {
                Ok(())
            };
        }

        let value = match value {
            Some(value) => value,
            None => return Ok(()),
        };

        match &self.rule {
            FieldRule::Boolean => Ok(()),
            FieldRule::Number { min, max } => {
                let number = coerce_number(value)
                    .ok_or_else(|| format!("{} must be a number", self.label))?;
                if let Some(min) = min
                    && number < *min
                {
                    return Err(format!("{} must be at least {min}", self.label));
                }
                if let Some(max) = max
                    && number > *max
                {
                    return Err(format!("{} must be at most {max}", self.label));
                }
                Ok(())
            }
            FieldRule::Email { grammar } => {
                let text = value
                    .as_str()
                    .ok_or_else(|| format!("{} must be a text value", self.label))?;
                // Empty input is an absence concern handled by `required`.
                if text.is_empty() || grammar.is_match(text) {
                    Ok(())
                } else {
                    Err(format!("{} must be a valid email address", self.label))
                }
            }
            FieldRule::Text {
                min_length,
                max_length,
                pattern,
            } => {
                let text = value
                    .as_str()
                    .ok_or_else(|| format!("{} must be a text value", self.label))?;
                let length = text.chars().count();
                if let Some(max_length) = max_length
                    && length > *max_length
                {
                    return Err(format!(
                        "{} must be at most {max_length} characters",
                        self.label
                    ));
                }

                // Empty input is an absence concern handled by `required`,
                // not a length/pattern violation.
                if text.is_empty() {
                    return Ok(());
                }

                if let Some(min_length) = min_length
                    && length < *min_length
                {
                    return Err(format!(
                        "{} must be at least {min_length} characters",
                        self.label
                    ));
                }
                if let Some(pattern) = pattern
                    && !pattern.is_match(text)
                {
                    return Err(format!("{} has an invalid format", self.label));
                }
                Ok(())
            }
        }
    }
}

/// All-or-nothing validation outcome: one labeled message per offending
/// field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: BTreeMap<String, String>,
}

impl ValidationReport {
    /// Returns every error message keyed by field.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Returns the message recorded for a field key.
    #[must_use]
    pub fn message(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Returns whether the report carries no errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runtime validation schema synthesized from field descriptors.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSet {
    validators: Vec<FieldValidator>,
}

impl ValidatorSet {
    /// Returns the per-field validators in descriptor order.
    #[must_use]
    pub fn validators(&self) -> &[FieldValidator] {
        &self.validators
    }

    /// Validates a submitted key-value object.
    ///
    /// Submission is rejected as a whole when any field fails; no partial
    /// apply.
    pub fn validate(&self, values: &Map<String, Value>) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::default();
        for validator in &self.validators {
            if let Err(message) = validator.check(values.get(validator.key())) {
                report.errors.insert(validator.key().to_owned(), message);
            }
        }

        if report.is_empty() { Ok(()) } else { Err(report) }
    }
}

/// Synthesizes the validation schema for a field set.
///
/// A pure function of the descriptors: one rule per field, derived from the
/// kind by exhaustive match, linear in field count. An unparseable stored
/// `pattern` is dropped rather than failing synthesis.
pub fn build_schema(fields: &[FieldDescriptor]) -> AppResult<ValidatorSet> {
    let grammar = Regex::new(EMAIL_GRAMMAR)
        .map_err(|error| AppError::Internal(format!("email grammar failed to compile: {error}")))?;

    let validators = fields
        .iter()
        .map(|field| {
            let rule = match field.kind() {
                FieldKind::Number => FieldRule::Number {
                    min: field.min(),
                    max: field.max(),
                },
                FieldKind::Email => FieldRule::Email {
                    grammar: grammar.clone(),
                },
                FieldKind::Switch | FieldKind::Checkbox => FieldRule::Boolean,
                FieldKind::Text | FieldKind::Textarea | FieldKind::Select | FieldKind::Date => {
                    FieldRule::Text {
                        min_length: field.min_length(),
                        max_length: field.max_length(),
                        pattern: field
                            .pattern()
                            .and_then(|pattern| Regex::new(pattern).ok()),
                    }
                }
            };

            FieldValidator {
                key: field.key().as_str().to_owned(),
                label: field.label().as_str().to_owned(),
                required: field.required() || field.kind().is_boolean(),
                rule,
            }
        })
        .collect();

    Ok(ValidatorSet { validators })
}

/// Produces the default value set matching a field set.
///
/// Booleans default to `false`, numbers to their lower bound or zero, dates
/// to the current date (ISO, date-only), and every other kind to the empty
/// string. Every default independently satisfies the synthesized schema.
#[must_use]
pub fn build_defaults(fields: &[FieldDescriptor]) -> Map<String, Value> {
    let mut defaults = Map::new();
    for field in fields {
        let value = match field.kind() {
            FieldKind::Switch | FieldKind::Checkbox => Value::Bool(false),
            FieldKind::Number => {
                let seed = field.min().unwrap_or(0.0);
                serde_json::Number::from_f64(seed)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::Number(0.into()))
            }
            FieldKind::Date => Value::String(Utc::now().date_naive().to_string()),
            FieldKind::Text | FieldKind::Textarea | FieldKind::Select | FieldKind::Email => {
                Value::String(String::new())
            }
        };
        defaults.insert(field.key().as_str().to_owned(), value);
    }

    defaults
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
