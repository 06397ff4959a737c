use std::collections::HashMap;
use std::sync::Arc;

use auberge_core::{AppResult, Code};
use auberge_domain::{ComponentType, ModuleEvent};

/// Prefix of the synthetic renderer code derived from a component type.
pub const TYPE_CODE_PREFIX: &str = "DYN-";

/// Renderer implementation resolved by stable code at render time.
///
/// Renderers are external collaborators: the engine resolves them and hands
/// over the render plan; it never invokes CRUD operations itself.
pub trait ComponentRenderer: Send + Sync {
    /// Stable renderer name used for diagnostics.
    fn name(&self) -> &str;
}

/// Outcome of renderer resolution for a configured event.
#[derive(Clone)]
pub enum Resolution {
    /// A renderer was found under one of the candidate codes.
    Renderer {
        /// Code the renderer was resolved under.
        code: Code,
        /// Resolved renderer implementation.
        renderer: Arc<dyn ComponentRenderer>,
    },
    /// No candidate code resolved; the caller renders an explicit
    /// "unconfigured" placeholder instead of failing.
    Unconfigured {
        /// Component type declared by the event, if any.
        component_type: Option<ComponentType>,
        /// Candidate codes tried, in resolution order.
        attempted: Vec<String>,
    },
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Renderer { code, renderer } => formatter
                .debug_struct("Renderer")
                .field("code", code)
                .field("name", &renderer.name())
                .finish(),
            Self::Unconfigured {
                component_type,
                attempted,
            } => formatter
                .debug_struct("Unconfigured")
                .field("component_type", component_type)
                .field("attempted", attempted)
                .finish(),
        }
    }
}

/// Returns the synthetic renderer code derived from a component type.
#[must_use]
pub fn type_code(component_type: ComponentType) -> String {
    format!(
        "{TYPE_CODE_PREFIX}{}",
        component_type.as_str().to_uppercase()
    )
}

/// Explicit renderer registry, constructed once at application start and
/// passed by reference to whatever renders configured events.
///
/// Codes are case-insensitive (normalized to uppercase); registration is
/// idempotent per code, last registration wins.
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    renderers: HashMap<Code, Arc<dyn ComponentRenderer>>,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a renderer under a code, replacing any previous entry.
    pub fn register(
        &mut self,
        code: impl Into<String>,
        renderer: Arc<dyn ComponentRenderer>,
    ) -> AppResult<()> {
        self.renderers.insert(Code::new(code)?, renderer);
        Ok(())
    }

    /// Looks up a renderer by code, case-insensitively.
    #[must_use]
    pub fn resolve(&self, code: &str) -> Option<Arc<dyn ComponentRenderer>> {
        let code = Code::new(code).ok()?;
        self.renderers.get(&code).cloned()
    }

    /// Resolves the renderer for a configured event.
    ///
    /// Tries the type-derived synthetic code first when the event declares
    /// a component type, then the owning sous-module's own code. A miss on
    /// both is a deliberate non-fatal outcome, not an error.
    #[must_use]
    pub fn resolve_event(&self, event: &ModuleEvent) -> Resolution {
        let mut attempted = Vec::new();

        if let Some(component_type) = event.component_type() {
            let candidate = type_code(component_type);
            if let Ok(code) = Code::new(&candidate)
                && let Some(renderer) = self.renderers.get(&code).cloned()
            {
                return Resolution::Renderer { code, renderer };
            }
            attempted.push(candidate);
        }

        let fallback = event.sous_module_code().as_str().to_owned();
        if let Some(renderer) = self.resolve(&fallback) {
            return Resolution::Renderer {
                code: event.sous_module_code().clone(),
                renderer,
            };
        }
        attempted.push(fallback);

        Resolution::Unconfigured {
            component_type: event.component_type(),
            attempted,
        }
    }
}
