use std::collections::HashMap;

use async_trait::async_trait;
use auberge_application::ComponentRepository;
use auberge_core::{AppError, AppResult, Code, EventId};
use auberge_domain::{Module, ModuleEvent, SousModule};
use tokio::sync::RwLock;


/// In-memory component repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryComponentRepository {
    modules: RwLock<HashMap<Code, Module>>,
    sous_modules: RwLock<HashMap<Code, SousModule>>,
    events: RwLock<HashMap<EventId, ModuleEvent>>,
}

impl InMemoryComponentRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComponentRepository for InMemoryComponentRepository {
    async fn save_module(&self, module: Module) -> AppResult<()> {
        let mut modules = self.modules.write().await;

        if modules.contains_key(module.code()) {
            return Err(AppError::Conflict(format!(
                "module '{}' already exists",
                module.code()
            )));
        }

        modules.insert(module.code().clone(), module);
        Ok(())
    }

    async fn list_modules(&self) -> AppResult<Vec<Module>> {
        let modules = self.modules.read().await;

        let mut listed: Vec<Module> = modules.values().cloned().collect();
        listed.sort_by(|left, right| {
            left.position()
                .cmp(&right.position())
                .then_with(|| left.code().cmp(right.code()))
        });

        Ok(listed)
    }

    async fn find_module(&self, code: &Code) -> AppResult<Option<Module>> {
        Ok(self.modules.read().await.get(code).cloned())
    }

    async fn delete_module(&self, code: &Code) -> AppResult<()> {
        if self.modules.write().await.remove(code).is_none() {
            return Err(AppError::NotFound(format!(
                "module '{code}' does not exist"
            )));
        }

        Ok(())
    }

    async fn save_sous_module(&self, sous_module: SousModule) -> AppResult<()> {
        let mut sous_modules = self.sous_modules.write().await;

        if sous_modules.contains_key(sous_module.code()) {
            return Err(AppError::Conflict(format!(
                "sous-module '{}' already exists",
                sous_module.code()
            )));
        }

        sous_modules.insert(sous_module.code().clone(), sous_module);
        Ok(())
    }

    async fn list_sous_modules(&self, module_code: &Code) -> AppResult<Vec<SousModule>> {
        let sous_modules = self.sous_modules.read().await;

        let mut listed: Vec<SousModule> = sous_modules
            .values()
            .filter(|sous_module| sous_module.module_code() == module_code)
            .cloned()
            .collect();
        listed.sort_by(|left, right| {
            left.position()
                .cmp(&right.position())
                .then_with(|| left.code().cmp(right.code()))
        });

        Ok(listed)
    }

    async fn find_sous_module(&self, code: &Code) -> AppResult<Option<SousModule>> {
        Ok(self.sous_modules.read().await.get(code).cloned())
    }

    async fn delete_sous_module(&self, code: &Code) -> AppResult<()> {
        if self.sous_modules.write().await.remove(code).is_none() {
            return Err(AppError::NotFound(format!(
                "sous-module '{code}' does not exist"
            )));
        }

        Ok(())
    }

    async fn save_event(&self, event: ModuleEvent) -> AppResult<()> {
        self.events.write().await.insert(event.id(), event);
        Ok(())
    }

    async fn list_events(&self, sous_module_code: &Code) -> AppResult<Vec<ModuleEvent>> {
        let events = self.events.read().await;

        let mut listed: Vec<ModuleEvent> = events
            .values()
            .filter(|event| event.sous_module_code() == sous_module_code)
            .cloned()
            .collect();
        listed.sort_by(|left, right| left.label().as_str().cmp(right.label().as_str()));

        Ok(listed)
    }

    async fn find_event(&self, id: EventId) -> AppResult<Option<ModuleEvent>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn delete_event(&self, id: EventId) -> AppResult<()> {
        if self.events.write().await.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("event '{id}' does not exist")));
        }

        Ok(())
    }
}
