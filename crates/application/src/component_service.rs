use std::sync::Arc;

use auberge_core::{AppError, AppResult, Code, EventId};
use auberge_domain::{
    ComponentConfig, ComponentConfigPatch, ComponentType, Module, ModuleEvent, SousModule,
};
use serde_json::{Map, Value};

use crate::component_ports::{ComponentRepository, RowSource};
use crate::config_merge::merge_config;
use crate::registry::{ComponentRegistry, Resolution};
use crate::table::TableState;
use crate::validator::{ValidatorSet, build_defaults, build_schema};

#[cfg(test)]
mod tests;

/// Fully derived rendering input for one configured event.
#[derive(Debug)]
pub struct RenderPlan {
    event: ModuleEvent,
    config: ComponentConfig,
    resolution: Resolution,
    surface: Surface,
}

impl RenderPlan {
    /// Returns the event record the plan was derived from.
    #[must_use]
    pub fn event(&self) -> &ModuleEvent {
        &self.event
    }

    /// Returns the merged, fully populated configuration.
    #[must_use]
    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    /// Returns the renderer resolution outcome.
    #[must_use]
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Returns the type-specific surface payload.
    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

/// Type-specific payload of a render plan.
#[derive(Debug)]
pub enum Surface {
    /// Field-driven form with its synthesized schema and default values.
    Form {
        /// Synthesized per-field validators.
        validators: ValidatorSet,
        /// Default value per field key; every default passes validation.
        defaults: Map<String, Value>,
    },
    /// Column-driven table over externally supplied rows.
    Table {
        /// Initial tabular state derived from the merged configuration.
        state: TableState,
        /// Rows fetched from the configured data source.
        rows: Vec<Map<String, Value>>,
    },
    /// Column-driven compact list over externally supplied rows.
    List {
        /// Initial tabular state derived from the merged configuration.
        state: TableState,
        /// Rows fetched from the configured data source.
        rows: Vec<Map<String, Value>>,
    },
    /// Title/description panel (dashboard and settings surfaces).
    Panel,
}

/// Application service for the component configuration hierarchy and the
/// event rendering pipeline.
#[derive(Clone)]
pub struct ComponentService {
    repository: Arc<dyn ComponentRepository>,
    row_source: Arc<dyn RowSource>,
    registry: Arc<ComponentRegistry>,
}

impl ComponentService {
    /// Creates a new component service from port implementations and the
    /// registry built at application start.
    #[must_use]
    pub fn new(
        repository: Arc<dyn ComponentRepository>,
        row_source: Arc<dyn RowSource>,
        registry: Arc<ComponentRegistry>,
    ) -> Self {
        Self {
            repository,
            row_source,
            registry,
        }
    }

    /// Registers a new navigation module.
    pub async fn create_module(
        &self,
        code: impl Into<String>,
        label: impl Into<String>,
        icon: Option<String>,
        position: i32,
    ) -> AppResult<Module> {
        let module = Module::new(code, label, icon, position)?;
        self.repository.save_module(module.clone()).await?;
        Ok(module)
    }

    /// Returns every module in navigation order.
    pub async fn list_modules(&self) -> AppResult<Vec<Module>> {
        self.repository.list_modules().await
    }

    /// Deletes a module; blocked while sous-modules still reference it.
    pub async fn delete_module(&self, code: impl Into<String>) -> AppResult<()> {
        let code = Code::new(code)?;
        self.require_module(&code).await?;

        let sous_modules = self.repository.list_sous_modules(&code).await?;
        if !sous_modules.is_empty() {
            return Err(AppError::Conflict(format!(
                "module '{code}' still owns {} sous-module(s)",
                sous_modules.len()
            )));
        }

        self.repository.delete_module(&code).await
    }

    /// Registers a new sous-module under an existing module.
    pub async fn create_sous_module(
        &self,
        module_code: impl Into<String>,
        code: impl Into<String>,
        label: impl Into<String>,
        position: i32,
    ) -> AppResult<SousModule> {
        let sous_module = SousModule::new(module_code, code, label, position)?;
        self.require_module(sous_module.module_code()).await?;
        self.repository.save_sous_module(sous_module.clone()).await?;
        Ok(sous_module)
    }

    /// Returns the sous-modules of an existing module.
    pub async fn list_sous_modules(
        &self,
        module_code: impl Into<String>,
    ) -> AppResult<Vec<SousModule>> {
        let module_code = Code::new(module_code)?;
        self.require_module(&module_code).await?;
        self.repository.list_sous_modules(&module_code).await
    }

    /// Deletes a sous-module; blocked while events still reference it.
    pub async fn delete_sous_module(&self, code: impl Into<String>) -> AppResult<()> {
        let code = Code::new(code)?;
        self.require_sous_module(&code).await?;

        let events = self.repository.list_events(&code).await?;
        if !events.is_empty() {
            return Err(AppError::Conflict(format!(
                "sous-module '{code}' still owns {} event(s)",
                events.len()
            )));
        }

        self.repository.delete_sous_module(&code).await
    }

    /// Creates a new unconfigured event under an existing sous-module.
    pub async fn create_event(
        &self,
        sous_module_code: impl Into<String>,
        label: impl Into<String>,
    ) -> AppResult<ModuleEvent> {
        let event = ModuleEvent::new(EventId::new(), sous_module_code, label)?;
        self.require_sous_module(event.sous_module_code()).await?;
        self.repository.save_event(event.clone()).await?;
        Ok(event)
    }

    /// Returns the events of an existing sous-module.
    pub async fn list_events(
        &self,
        sous_module_code: impl Into<String>,
    ) -> AppResult<Vec<ModuleEvent>> {
        let sous_module_code = Code::new(sous_module_code)?;
        self.require_sous_module(&sous_module_code).await?;
        self.repository.list_events(&sous_module_code).await
    }

    /// Attaches a component type and configuration blob to an event.
    ///
    /// The blob is written back verbatim; it is only interpreted (and
    /// merged with type defaults) at render time.
    pub async fn save_event_config(
        &self,
        id: EventId,
        component_type: ComponentType,
        config: Option<Value>,
    ) -> AppResult<ModuleEvent> {
        let event = self.require_event(id).await?;
        let updated = event.with_component(component_type, config);
        self.repository.save_event(updated.clone()).await?;
        Ok(updated)
    }

    /// Deletes an event by identifier.
    pub async fn delete_event(&self, id: EventId) -> AppResult<()> {
        self.require_event(id).await?;
        self.repository.delete_event(id).await
    }

    /// Derives the complete rendering input for an event.
    ///
    /// The stored configuration is merged onto type defaults; a missing or
    /// malformed blob falls back to the defaults instead of failing the
    /// surface. Renderer resolution misses degrade to an unconfigured
    /// placeholder carried in the plan.
    pub async fn render_event(&self, id: EventId) -> AppResult<RenderPlan> {
        let event = self.require_event(id).await?;
        let resolution = self.registry.resolve_event(&event);
        let patch = ComponentConfigPatch::from_stored(event.config());

        let (config, surface) = match event.component_type() {
            Some(ComponentType::Form) => {
                let config = merge_config(ComponentType::Form, Some(&patch))?;
                let validators = build_schema(config.fields())?;
                let defaults = build_defaults(config.fields());
                (config, Surface::Form {
                    validators,
                    defaults,
                })
            }
            Some(component_type @ (ComponentType::Table | ComponentType::List)) => {
                let config = merge_config(component_type, Some(&patch))?;
                let state = TableState::from_config(&config)?;
                let rows = match config.data_source() {
                    Some(data_source) => self.row_source.fetch_rows(data_source).await?,
                    None => Vec::new(),
                };
                let surface = if component_type == ComponentType::Table {
                    Surface::Table { state, rows }
                } else {
                    Surface::List { state, rows }
                };
                (config, surface)
            }
            Some(component_type @ (ComponentType::Dashboard | ComponentType::Settings)) => {
                let config = merge_config(component_type, Some(&patch))?;
                (config, Surface::Panel)
            }
            None => {
                // No declared component: render a titled placeholder panel.
                let patch = ComponentConfigPatch {
                    title: Some(event.label().as_str().to_owned()),
                    ..ComponentConfigPatch::default()
                };
                let config = merge_config(ComponentType::Settings, Some(&patch))?;
                (config, Surface::Panel)
            }
        };

        Ok(RenderPlan {
            event,
            config,
            resolution,
            surface,
        })
    }

    async fn require_module(&self, code: &Code) -> AppResult<Module> {
        self.repository
            .find_module(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("module '{code}' does not exist")))
    }

    async fn require_sous_module(&self, code: &Code) -> AppResult<SousModule> {
        self.repository
            .find_sous_module(code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("sous-module '{code}' does not exist")))
    }

    async fn require_event(&self, id: EventId) -> AppResult<ModuleEvent> {
        self.repository
            .find_event(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("event '{id}' does not exist")))
    }
}
