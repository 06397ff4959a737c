use auberge_core::{AppResult, Code, EventId, NonEmptyString};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ComponentType;

/// Top-level navigation module of the operator dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    code: Code,
    label: NonEmptyString,
    icon: Option<String>,
    position: i32,
}

impl Module {
    /// Creates a validated module.
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        icon: Option<String>,
        position: i32,
    ) -> AppResult<Self> {
        Ok(Self {
            code: Code::new(code)?,
            label: NonEmptyString::new(label)?,
            icon: icon.and_then(|value| {
                let trimmed = value.trim().to_owned();
                (!trimmed.is_empty()).then_some(trimmed)
            }),
            position,
        })
    }

    /// Returns the stable module code.
    #[must_use]
    pub fn code(&self) -> &Code {
        &self.code
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the optional icon hint.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the navigation position.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.position
    }
}

/// Second-level navigation entry owned by a module.
///
/// The sous-module code doubles as the renderer fallback code when a
/// configured event resolves no type-derived renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SousModule {
    module_code: Code,
    code: Code,
    label: NonEmptyString,
    position: i32,
}

impl SousModule {
    /// Creates a validated sous-module.
    pub fn new(
        module_code: impl Into<String>,
        code: impl Into<String>,
        label: impl Into<String>,
        position: i32,
    ) -> AppResult<Self> {
        Ok(Self {
            module_code: Code::new(module_code)?,
            code: Code::new(code)?,
            label: NonEmptyString::new(label)?,
            position,
        })
    }

    /// Returns the owning module code.
    #[must_use]
    pub fn module_code(&self) -> &Code {
        &self.module_code
    }

    /// Returns the stable sous-module code.
    #[must_use]
    pub fn code(&self) -> &Code {
        &self.code
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the navigation position.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.position
    }
}

/// Configured event attached to a sous-module.
///
/// The event owns the persisted component configuration as an opaque JSON
/// blob: read on render, written back whole on save, never mutated in
/// place. Derived configurations are new values; the stored blob stays
/// untouched until an explicit save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEvent {
    id: EventId,
    sous_module_code: Code,
    label: NonEmptyString,
    component_type: Option<ComponentType>,
    config: Option<Value>,
}

impl ModuleEvent {
    /// Creates a validated event without component configuration.
    pub fn new(
        id: EventId,
        sous_module_code: impl Into<String>,
        label: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            sous_module_code: Code::new(sous_module_code)?,
            label: NonEmptyString::new(label)?,
            component_type: None,
            config: None,
        })
    }

    /// Returns a copy of this event carrying the given component
    /// configuration verbatim.
    #[must_use]
    pub fn with_component(self, component_type: ComponentType, config: Option<Value>) -> Self {
        Self {
            component_type: Some(component_type),
            config,
            ..self
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Returns the owning sous-module code.
    #[must_use]
    pub fn sous_module_code(&self) -> &Code {
        &self.sous_module_code
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the declared component type, if any.
    #[must_use]
    pub fn component_type(&self) -> Option<ComponentType> {
        self.component_type
    }

    /// Returns the stored opaque configuration blob, if any.
    #[must_use]
    pub fn config(&self) -> Option<&Value> {
        self.config.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use auberge_core::EventId;
    use serde_json::json;

    use super::{ComponentType, Module, ModuleEvent, SousModule};

    #[test]
    fn module_code_is_uppercase_normalized() {
        let module = Module::new("reception", "Réception", None, 0);
        assert_eq!(
            module.map(|module| module.code().as_str().to_owned()).ok().as_deref(),
            Some("RECEPTION")
        );
    }

    #[test]
    fn sous_module_requires_codes() {
        let result = SousModule::new("reception", " ", "Chambres", 0);
        assert!(result.is_err());
    }

    #[test]
    fn with_component_leaves_identity_untouched() {
        let id = EventId::new();
        let event = ModuleEvent::new(id, "chambres", "Liste des chambres").map(|event| {
            event.with_component(ComponentType::Table, Some(json!({"page_size": 5})))
        });

        let event = match event {
            Ok(event) => event,
            Err(error) => panic!("event construction failed: {error}"),
        };
        assert_eq!(event.id(), id);
        assert_eq!(event.component_type(), Some(ComponentType::Table));
        assert_eq!(event.config(), Some(&json!({"page_size": 5})));
    }
}
