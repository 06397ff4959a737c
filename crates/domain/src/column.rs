use std::collections::BTreeMap;
use std::str::FromStr;

use auberge_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Deserializer, Serialize};

/// Supported table/list column kinds.
///
/// Unknown kinds in stored configuration deserialize to [`ColumnKind::Text`]
/// and render through the generic text path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Plain text cell.
    #[default]
    Text,
    /// Numeric cell with thousands grouping.
    Number,
    /// Date-only cell.
    Date,
    /// Status badge cell.
    Badge,
    /// Binary glyph cell.
    Boolean,
    /// Row action affordances; suppressed from generic cell rendering.
    Actions,
}

impl ColumnKind {
    /// Returns the stable storage value for the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Badge => "badge",
            Self::Boolean => "boolean",
            Self::Actions => "actions",
        }
    }
}

impl FromStr for ColumnKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "badge" => Ok(Self::Badge),
            "boolean" => Ok(Self::Boolean),
            "actions" => Ok(Self::Actions),
            _ => Err(AppError::Validation(format!(
                "unknown column kind '{value}'"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ColumnKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Unknown kinds degrade to text instead of failing the whole blob.
        let value = String::deserialize(deserializer)?;
        Ok(value.parse().unwrap_or_default())
    }
}

/// Visual variant tag for badge cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    /// Neutral badge.
    #[default]
    Default,
    /// Positive state badge.
    Success,
    /// Attention state badge.
    Warning,
    /// Negative state badge.
    Destructive,
    /// Low-emphasis outline badge.
    Outline,
}

impl BadgeVariant {
    /// Returns the stable storage value for the variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Destructive => "destructive",
            Self::Outline => "outline",
        }
    }
}

impl FromStr for BadgeVariant {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "default" => Ok(Self::Default),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "destructive" => Ok(Self::Destructive),
            "outline" => Ok(Self::Outline),
            _ => Err(AppError::Validation(format!(
                "unknown badge variant '{value}'"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for BadgeVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(value.parse().unwrap_or_default())
    }
}

/// Declarative description of one table/list column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    key: NonEmptyString,
    label: NonEmptyString,
    kind: ColumnKind,
    #[serde(default)]
    sortable: bool,
    #[serde(default)]
    filterable: bool,
    #[serde(default)]
    width: Option<String>,
    #[serde(default)]
    badge_variants: BTreeMap<String, BadgeVariant>,
}

impl ColumnDescriptor {
    /// Creates a validated column descriptor.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<String>,
        kind: ColumnKind,
        sortable: bool,
        filterable: bool,
        width: Option<String>,
        badge_variants: BTreeMap<String, BadgeVariant>,
    ) -> AppResult<Self> {
        Ok(Self {
            key: NonEmptyString::new(key)?,
            label: NonEmptyString::new(label)?,
            kind,
            sortable,
            filterable,
            width: width.and_then(|value| {
                let trimmed = value.trim().to_owned();
                (!trimmed.is_empty()).then_some(trimmed)
            }),
            badge_variants,
        })
    }

    /// Creates a sortable column with only a key, label, and kind.
    pub fn simple(
        key: impl Into<String>,
        label: impl Into<String>,
        kind: ColumnKind,
    ) -> AppResult<Self> {
        Self::new(key, label, kind, true, true, None, BTreeMap::new())
    }

    /// Returns the row data key.
    #[must_use]
    pub fn key(&self) -> &NonEmptyString {
        &self.key
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the column kind.
    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Returns whether the renderer should offer sorting.
    #[must_use]
    pub fn sortable(&self) -> bool {
        self.sortable
    }

    /// Returns whether the renderer should offer filtering.
    #[must_use]
    pub fn filterable(&self) -> bool {
        self.filterable
    }

    /// Returns the optional display width hint.
    #[must_use]
    pub fn width(&self) -> Option<&str> {
        self.width.as_deref()
    }

    /// Returns the literal value to badge variant mapping.
    #[must_use]
    pub fn badge_variants(&self) -> &BTreeMap<String, BadgeVariant> {
        &self.badge_variants
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{BadgeVariant, ColumnDescriptor, ColumnKind};

    #[test]
    fn column_requires_non_empty_key() {
        let result = ColumnDescriptor::simple("", "Room", ColumnKind::Text);
        assert!(result.is_err());
    }

    #[test]
    fn blank_width_hint_is_dropped() {
        let column = ColumnDescriptor::new(
            "price",
            "Price",
            ColumnKind::Number,
            true,
            false,
            Some("   ".to_owned()),
            BTreeMap::new(),
        );
        assert_eq!(column.ok().and_then(|column| column.width().map(str::to_owned)), None);
    }

    #[test]
    fn unknown_column_kind_deserializes_to_text() {
        let column: Result<ColumnDescriptor, _> = serde_json::from_value(serde_json::json!({
            "key": "status",
            "label": "Status",
            "kind": "sparkline"
        }));
        assert_eq!(column.map(|column| column.kind()).ok(), Some(ColumnKind::Text));
    }

    #[test]
    fn badge_variants_round_trip() {
        let mut variants = BTreeMap::new();
        variants.insert("confirmed".to_owned(), BadgeVariant::Success);
        let column = ColumnDescriptor::new(
            "status",
            "Status",
            ColumnKind::Badge,
            true,
            true,
            None,
            variants,
        );
        assert!(column.is_ok());
    }
}
