use std::str::FromStr;

use auberge_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Deserializer, Serialize};

/// Supported form field kinds.
///
/// Unknown kinds in stored configuration deserialize to [`FieldKind::Text`]
/// so that an evolving default schema never breaks an old stored blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text input.
    #[default]
    Text,
    /// Numeric input.
    Number,
    /// Email address input.
    Email,
    /// Date-only input.
    Date,
    /// Single choice from a fixed option list.
    Select,
    /// Multi-line text input.
    Textarea,
    /// On/off switch.
    Switch,
    /// Checkbox.
    Checkbox,
}

impl FieldKind {
    /// Returns the stable storage value for the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Date => "date",
            Self::Select => "select",
            Self::Textarea => "textarea",
            Self::Switch => "switch",
            Self::Checkbox => "checkbox",
        }
    }

    /// Returns whether the kind carries a boolean value.
    ///
    /// Boolean kinds are never optional: absence means `false`, not "unset".
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Switch | Self::Checkbox)
    }
}

impl FromStr for FieldKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "email" => Ok(Self::Email),
            "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            "textarea" => Ok(Self::Textarea),
            "switch" => Ok(Self::Switch),
            "checkbox" => Ok(Self::Checkbox),
            _ => Err(AppError::Validation(format!(
                "unknown field kind '{value}'"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for FieldKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Unknown kinds degrade to text instead of failing the whole blob.
        let value = String::deserialize(deserializer)?;
        Ok(value.parse().unwrap_or_default())
    }
}

/// One selectable option for a `select` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    value: NonEmptyString,
    label: NonEmptyString,
}

impl SelectOption {
    /// Creates a validated select option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            value: NonEmptyString::new(value)?,
            label: NonEmptyString::new(label)?,
        })
    }

    /// Returns the stored option value.
    #[must_use]
    pub fn value(&self) -> &NonEmptyString {
        &self.value
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }
}

/// Declarative description of one configurable form field.
///
/// The `kind` fully determines which validation attributes are honored;
/// attributes irrelevant to the kind are kept but ignored downstream, never
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    key: NonEmptyString,
    label: NonEmptyString,
    kind: FieldKind,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    options: Vec<SelectOption>,
    #[serde(default)]
    min: Option<f64>,
    #[serde(default)]
    max: Option<f64>,
    #[serde(default)]
    min_length: Option<usize>,
    #[serde(default)]
    max_length: Option<usize>,
    #[serde(default)]
    pattern: Option<String>,
}

impl FieldDescriptor {
    /// Creates a validated field descriptor.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        placeholder: Option<String>,
        required: bool,
        options: Vec<SelectOption>,
        min: Option<f64>,
        max: Option<f64>,
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<String>,
    ) -> AppResult<Self> {
        if kind == FieldKind::Select && options.is_empty() {
            return Err(AppError::Validation(
                "select fields require at least one option".to_owned(),
            ));
        }

        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(AppError::Validation(format!(
                "field min '{min}' must not exceed max '{max}'"
            )));
        }

        if let (Some(min_length), Some(max_length)) = (min_length, max_length)
            && min_length > max_length
        {
            return Err(AppError::Validation(format!(
                "field min_length '{min_length}' must not exceed max_length '{max_length}'"
            )));
        }

        Ok(Self {
            key: NonEmptyString::new(key)?,
            label: NonEmptyString::new(label)?,
            kind,
            placeholder: placeholder.and_then(|value| {
                let trimmed = value.trim().to_owned();
                (!trimmed.is_empty()).then_some(trimmed)
            }),
            required,
            options,
            min,
            max,
            min_length,
            max_length,
            pattern,
        })
    }

    /// Creates a descriptor with only a key, label, and kind.
    pub fn simple(
        key: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
    ) -> AppResult<Self> {
        Self::new(
            key, label, kind, None, false, Vec::new(), None, None, None, None, None,
        )
    }

    /// Returns the stable data/schema key.
    #[must_use]
    pub fn key(&self) -> &NonEmptyString {
        &self.key
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the field kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the optional placeholder text.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Returns whether a submitted value is mandatory.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Returns the ordered option list (meaningful for `select`).
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Returns the numeric lower bound (meaningful for `number`).
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Returns the numeric upper bound (meaningful for `number`).
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Returns the minimum length (meaningful for text-like kinds).
    #[must_use]
    pub fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Returns the maximum length (meaningful for text-like kinds).
    #[must_use]
    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Returns the regex source constraint (meaningful for text-like kinds).
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldDescriptor, FieldKind, SelectOption};

    #[test]
    fn select_fields_require_options() {
        let result = FieldDescriptor::simple("room_type", "Room type", FieldKind::Select);
        assert!(result.is_err());
    }

    #[test]
    fn inverted_numeric_bounds_are_rejected() {
        let result = FieldDescriptor::new(
            "nights",
            "Nights",
            FieldKind::Number,
            None,
            true,
            Vec::new(),
            Some(10.0),
            Some(1.0),
            None,
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn irrelevant_attributes_are_kept_not_rejected() {
        let descriptor = FieldDescriptor::new(
            "notes",
            "Notes",
            FieldKind::Textarea,
            None,
            false,
            Vec::new(),
            Some(1.0),
            Some(5.0),
            None,
            Some(500),
            None,
        );
        assert!(descriptor.is_ok());
    }

    #[test]
    fn unknown_kind_deserializes_to_text() {
        let descriptor: Result<FieldDescriptor, _> = serde_json::from_value(serde_json::json!({
            "key": "legacy",
            "label": "Legacy",
            "kind": "color_picker"
        }));
        assert_eq!(
            descriptor.map(|descriptor| descriptor.kind()).ok(),
            Some(FieldKind::Text)
        );
    }

    #[test]
    fn select_option_round_trips() {
        let option = SelectOption::new("suite", "Suite");
        assert!(option.is_ok());
    }
}
