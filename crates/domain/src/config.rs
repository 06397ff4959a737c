use std::str::FromStr;

use auberge_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnDescriptor;
use crate::descriptor::FieldDescriptor;

/// Component surface selected by a configured event.
///
/// The type selects both the default-config template and the renderer code
/// looked up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Field-driven input form.
    Form,
    /// Column-driven data table.
    Table,
    /// Column-driven compact list.
    List,
    /// Title/description dashboard panel.
    Dashboard,
    /// Title/description settings panel.
    Settings,
}

impl ComponentType {
    /// Returns the stable storage value for the type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Table => "table",
            Self::List => "list",
            Self::Dashboard => "dashboard",
            Self::Settings => "settings",
        }
    }
}

impl FromStr for ComponentType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "form" => Ok(Self::Form),
            "table" => Ok(Self::Table),
            "list" => Ok(Self::List),
            "dashboard" => Ok(Self::Dashboard),
            "settings" => Ok(Self::Settings),
            _ => Err(AppError::Validation(format!(
                "unknown component type '{value}'"
            ))),
        }
    }
}

/// Visibility gates for the five component action affordances.
///
/// Gates only control whether an affordance is offered; the CRUD operations
/// themselves are external collaborators invoked by the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentActions {
    create: bool,
    edit: bool,
    delete: bool,
    view: bool,
    export: bool,
}

impl ComponentActions {
    /// Creates an action set with explicit flags.
    #[must_use]
    pub fn new(create: bool, edit: bool, delete: bool, view: bool, export: bool) -> Self {
        Self {
            create,
            edit,
            delete,
            view,
            export,
        }
    }

    /// Returns whether the create affordance is visible.
    #[must_use]
    pub fn create(&self) -> bool {
        self.create
    }

    /// Returns whether the edit affordance is visible.
    #[must_use]
    pub fn edit(&self) -> bool {
        self.edit
    }

    /// Returns whether the delete affordance is visible.
    #[must_use]
    pub fn delete(&self) -> bool {
        self.delete
    }

    /// Returns whether the view affordance is visible.
    #[must_use]
    pub fn view(&self) -> bool {
        self.view
    }

    /// Returns whether the export affordance is visible.
    #[must_use]
    pub fn export(&self) -> bool {
        self.export
    }
}

impl Default for ComponentActions {
    fn default() -> Self {
        Self::new(true, true, true, true, true)
    }
}

/// Partial stored action flags, merged key-wise onto a full action set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentActionsPatch {
    /// Stored create flag, when present.
    #[serde(default)]
    pub create: Option<bool>,
    /// Stored edit flag, when present.
    #[serde(default)]
    pub edit: Option<bool>,
    /// Stored delete flag, when present.
    #[serde(default)]
    pub delete: Option<bool>,
    /// Stored view flag, when present.
    #[serde(default)]
    pub view: Option<bool>,
    /// Stored export flag, when present.
    #[serde(default)]
    pub export: Option<bool>,
}

impl ComponentActionsPatch {
    /// Applies the patch onto a base action set.
    ///
    /// Present flags override the base; absent flags keep the base value.
    #[must_use]
    pub fn apply(&self, base: ComponentActions) -> ComponentActions {
        ComponentActions::new(
            self.create.unwrap_or(base.create()),
            self.edit.unwrap_or(base.edit()),
            self.delete.unwrap_or(base.delete()),
            self.view.unwrap_or(base.view()),
            self.export.unwrap_or(base.export()),
        )
    }
}

/// Complete configuration for one component surface.
///
/// Always fully populated: merge with type defaults guarantees definite
/// field/column sets and a complete action gate set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    fields: Vec<FieldDescriptor>,
    columns: Vec<ColumnDescriptor>,
    title: Option<String>,
    description: Option<String>,
    page_size: usize,
    actions: ComponentActions,
    data_source: Option<String>,
}

impl ComponentConfig {
    /// Creates a validated component configuration.
    pub fn new(
        fields: Vec<FieldDescriptor>,
        columns: Vec<ColumnDescriptor>,
        title: Option<String>,
        description: Option<String>,
        page_size: usize,
        actions: ComponentActions,
        data_source: Option<String>,
    ) -> AppResult<Self> {
        if page_size == 0 {
            return Err(AppError::Validation(
                "component page size must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            fields,
            columns,
            title,
            description,
            page_size,
            actions,
            data_source,
        })
    }

    /// Returns the form field descriptors.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Returns the table/list column descriptors.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Returns the optional surface title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the optional surface description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the pagination window size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the action visibility gates.
    #[must_use]
    pub fn actions(&self) -> &ComponentActions {
        &self.actions
    }

    /// Returns the opaque data provenance hint.
    #[must_use]
    pub fn data_source(&self) -> Option<&str> {
        self.data_source.as_deref()
    }
}

/// Partial stored component configuration.
///
/// This is the shape read back from the event record's opaque config blob:
/// every key optional, `actions` as a key-wise patch. Unknown keys in the
/// stored blob are ignored rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfigPatch {
    /// Stored field descriptors, when present.
    #[serde(default)]
    pub fields: Option<Vec<FieldDescriptor>>,
    /// Stored column descriptors, when present.
    #[serde(default)]
    pub columns: Option<Vec<ColumnDescriptor>>,
    /// Stored surface title, when present.
    #[serde(default)]
    pub title: Option<String>,
    /// Stored surface description, when present.
    #[serde(default)]
    pub description: Option<String>,
    /// Stored pagination window size, when present.
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Stored partial action flags, when present.
    #[serde(default)]
    pub actions: Option<ComponentActionsPatch>,
    /// Stored data provenance hint, when present.
    #[serde(default)]
    pub data_source: Option<String>,
}

impl ComponentConfigPatch {
    /// Reads a patch from an opaque stored JSON blob.
    ///
    /// A missing or malformed blob yields the empty patch so that rendering
    /// always falls back to type defaults instead of failing.
    #[must_use]
    pub fn from_stored(value: Option<&Value>) -> Self {
        value
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }
}
