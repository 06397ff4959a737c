use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auberge_core::{AppError, AppResult, Code, EventId};
use auberge_domain::{ComponentType, Module, ModuleEvent, SousModule};
use serde_json::{Map, Value, json};
use tokio::sync::Mutex;

use crate::component_ports::{ComponentRepository, RowSource};
use crate::registry::{ComponentRegistry, ComponentRenderer, Resolution, type_code};

use super::{ComponentService, Surface};

#[derive(Default)]
struct FakeRepository {
    modules: Mutex<HashMap<Code, Module>>,
    sous_modules: Mutex<HashMap<Code, SousModule>>,
    events: Mutex<HashMap<EventId, ModuleEvent>>,
}

#[async_trait]
impl ComponentRepository for FakeRepository {
    async fn save_module(&self, module: Module) -> AppResult<()> {
        let mut modules = self.modules.lock().await;
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
        let modules = self.modules.lock().await;
        let mut listed: Vec<Module> = modules.values().cloned().collect();
        listed.sort_by_key(|module| (module.position(), module.code().clone()));
        Ok(listed)
    }

    async fn find_module(&self, code: &Code) -> AppResult<Option<Module>> {
        Ok(self.modules.lock().await.get(code).cloned())
    }

    async fn delete_module(&self, code: &Code) -> AppResult<()> {
        self.modules.lock().await.remove(code);
        Ok(())
    }

    async fn save_sous_module(&self, sous_module: SousModule) -> AppResult<()> {
        let mut sous_modules = self.sous_modules.lock().await;
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
        let sous_modules = self.sous_modules.lock().await;
        let mut listed: Vec<SousModule> = sous_modules
            .values()
            .filter(|sous_module| sous_module.module_code() == module_code)
            .cloned()
            .collect();
        listed.sort_by_key(|sous_module| (sous_module.position(), sous_module.code().clone()));
        Ok(listed)
    }

    async fn find_sous_module(&self, code: &Code) -> AppResult<Option<SousModule>> {
        Ok(self.sous_modules.lock().await.get(code).cloned())
    }

    async fn delete_sous_module(&self, code: &Code) -> AppResult<()> {
        self.sous_modules.lock().await.remove(code);
        Ok(())
    }

    async fn save_event(&self, event: ModuleEvent) -> AppResult<()> {
        self.events.lock().await.insert(event.id(), event);
        Ok(())
    }

    async fn list_events(&self, sous_module_code: &Code) -> AppResult<Vec<ModuleEvent>> {
        let events = self.events.lock().await;
        Ok(events
            .values()
            .filter(|event| event.sous_module_code() == sous_module_code)
            .cloned()
            .collect())
    }

    async fn find_event(&self, id: EventId) -> AppResult<Option<ModuleEvent>> {
        Ok(self.events.lock().await.get(&id).cloned())
    }

    async fn delete_event(&self, id: EventId) -> AppResult<()> {
        self.events.lock().await.remove(&id);
        Ok(())
    }
}

struct FakeRowSource {
    rows: Vec<Map<String, Value>>,
}

impl FakeRowSource {
    fn with_rooms(count: u64) -> Self {
        let rows = (1..=count)
            .map(|index| {
                let row = json!({
                    "id": index,
                    "number": format!("{index:03}"),
                    "price_per_night": 80 + index,
                    "status": if index % 2 == 0 { "occupied" } else { "available" },
                });
                match row {
                    Value::Object(map) => map,
                    other => panic!("expected object, got {other}"),
                }
            })
            .collect();
        Self { rows }
    }
}

#[async_trait]
impl RowSource for FakeRowSource {
    async fn fetch_rows(&self, _data_source: &str) -> AppResult<Vec<Map<String, Value>>> {
        Ok(self.rows.clone())
    }
}

struct NamedRenderer(&'static str);

impl ComponentRenderer for NamedRenderer {
    fn name(&self) -> &str {
        self.0
    }
}

fn service_with(registry: ComponentRegistry) -> ComponentService {
    ComponentService::new(
        Arc::new(FakeRepository::default()),
        Arc::new(FakeRowSource::with_rooms(25)),
        Arc::new(registry),
    )
}

fn service() -> ComponentService {
    service_with(ComponentRegistry::new())
}

async fn seeded_event(service: &ComponentService) -> ModuleEvent {
    let created = async {
        service
            .create_module("reception", "Réception", None, 0)
            .await?;
        service
            .create_sous_module("reception", "chambres", "Chambres", 0)
            .await?;
        service.create_event("chambres", "Liste des chambres").await
    }
    .await;

    match created {
        Ok(event) => event,
        Err(error) => panic!("seeding failed: {error}"),
    }
}

#[tokio::test]
async fn create_module_rejects_duplicate_codes_case_insensitively() {
    let service = service();
    assert!(
        service
            .create_module("reception", "Réception", None, 0)
            .await
            .is_ok()
    );

    let duplicate = service.create_module("RECEPTION", "Accueil", None, 1).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn create_sous_module_requires_existing_module() {
    let service = service();
    let result = service
        .create_sous_module("restaurant", "tables", "Tables", 0)
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_module_blocks_while_sous_modules_exist() {
    let service = service();
    seeded_event(&service).await;

    let blocked = service.delete_module("reception").await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn delete_sous_module_blocks_while_events_exist() {
    let service = service();
    seeded_event(&service).await;

    let blocked = service.delete_sous_module("chambres").await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    let events = service.list_events("chambres").await;
    let events = match events {
        Ok(events) => events,
        Err(error) => panic!("listing events failed: {error}"),
    };
    for event in events {
        assert!(service.delete_event(event.id()).await.is_ok());
    }
    assert!(service.delete_sous_module("chambres").await.is_ok());
}

#[tokio::test]
async fn save_event_config_writes_blob_back_verbatim() {
    let service = service();
    let event = seeded_event(&service).await;

    let blob = json!({
        "page_size": 5,
        "actions": {"delete": false},
        "legacy_key_from_older_defaults": {"kept": true}
    });
    let saved = service
        .save_event_config(event.id(), ComponentType::Table, Some(blob.clone()))
        .await;

    let saved = match saved {
        Ok(saved) => saved,
        Err(error) => panic!("saving config failed: {error}"),
    };
    assert_eq!(saved.component_type(), Some(ComponentType::Table));
    assert_eq!(saved.config(), Some(&blob));
}

#[tokio::test]
async fn render_event_without_stored_config_uses_type_defaults() {
    let service = service();
    let event = seeded_event(&service).await;
    let configured = service
        .save_event_config(event.id(), ComponentType::Form, None)
        .await;
    assert!(configured.is_ok());

    let plan = service.render_event(event.id()).await;
    let plan = match plan {
        Ok(plan) => plan,
        Err(error) => panic!("rendering failed: {error}"),
    };

    assert!(!plan.config().fields().is_empty());
    assert!(plan.config().actions().delete());
    match plan.surface() {
        Surface::Form {
            validators,
            defaults,
        } => {
            assert_eq!(validators.validators().len(), plan.config().fields().len());
            assert_eq!(defaults.len(), plan.config().fields().len());
            assert!(validators.validate(defaults).is_ok());
        }
        other => panic!("expected a form surface, got {other:?}"),
    }
}

#[tokio::test]
async fn render_event_merges_stored_action_flags() {
    let service = service();
    let event = seeded_event(&service).await;
    let configured = service
        .save_event_config(
            event.id(),
            ComponentType::Form,
            Some(json!({"actions": {"delete": false}})),
        )
        .await;
    assert!(configured.is_ok());

    let plan = service.render_event(event.id()).await;
    let plan = match plan {
        Ok(plan) => plan,
        Err(error) => panic!("rendering failed: {error}"),
    };

    assert!(plan.config().actions().create());
    assert!(!plan.config().actions().delete());
    assert!(plan.config().actions().export());
}

#[tokio::test]
async fn render_event_survives_malformed_stored_blob() {
    let service = service();
    let event = seeded_event(&service).await;
    let configured = service
        .save_event_config(event.id(), ComponentType::Table, Some(json!("not an object")))
        .await;
    assert!(configured.is_ok());

    let plan = service.render_event(event.id()).await;
    let plan = match plan {
        Ok(plan) => plan,
        Err(error) => panic!("rendering failed: {error}"),
    };
    assert!(!plan.config().columns().is_empty());
}

#[tokio::test]
async fn render_table_event_fetches_rows_and_paginates() {
    let service = service();
    let event = seeded_event(&service).await;
    let configured = service
        .save_event_config(
            event.id(),
            ComponentType::Table,
            Some(json!({"page_size": 10})),
        )
        .await;
    assert!(configured.is_ok());

    let plan = service.render_event(event.id()).await;
    let plan = match plan {
        Ok(plan) => plan,
        Err(error) => panic!("rendering failed: {error}"),
    };

    match plan.surface() {
        Surface::Table { state, rows } => {
            assert_eq!(rows.len(), 25);
            let page = state.page(rows);
            assert_eq!(page.rows().len(), 10);
            assert_eq!(page.total_pages(), 3);
        }
        other => panic!("expected a table surface, got {other:?}"),
    }
}

#[tokio::test]
async fn unresolved_renderer_degrades_to_unconfigured_placeholder() {
    let service = service();
    let event = seeded_event(&service).await;
    let configured = service
        .save_event_config(event.id(), ComponentType::Table, None)
        .await;
    assert!(configured.is_ok());

    let plan = service.render_event(event.id()).await;
    let plan = match plan {
        Ok(plan) => plan,
        Err(error) => panic!("rendering failed: {error}"),
    };

    match plan.resolution() {
        Resolution::Unconfigured {
            component_type,
            attempted,
        } => {
            assert_eq!(*component_type, Some(ComponentType::Table));
            assert!(attempted.contains(&"DYN-TABLE".to_owned()));
            assert!(attempted.contains(&"CHAMBRES".to_owned()));
        }
        Resolution::Renderer { .. } => panic!("expected an unconfigured miss"),
    }
}

#[tokio::test]
async fn registered_renderer_resolves_through_type_code() {
    let mut registry = ComponentRegistry::new();
    let registered = registry.register(
        type_code(ComponentType::Table),
        Arc::new(NamedRenderer("rooms-table")),
    );
    assert!(registered.is_ok());

    let service = service_with(registry);
    let event = seeded_event(&service).await;
    let configured = service
        .save_event_config(event.id(), ComponentType::Table, None)
        .await;
    assert!(configured.is_ok());

    let plan = service.render_event(event.id()).await;
    let plan = match plan {
        Ok(plan) => plan,
        Err(error) => panic!("rendering failed: {error}"),
    };

    match plan.resolution() {
        Resolution::Renderer { code, renderer } => {
            assert_eq!(code.as_str(), "DYN-TABLE");
            assert_eq!(renderer.name(), "rooms-table");
        }
        Resolution::Unconfigured { .. } => panic!("expected a resolved renderer"),
    }
}

#[tokio::test]
async fn event_without_component_type_renders_titled_panel() {
    let service = service();
    let event = seeded_event(&service).await;

    let plan = service.render_event(event.id()).await;
    let plan = match plan {
        Ok(plan) => plan,
        Err(error) => panic!("rendering failed: {error}"),
    };

    assert!(matches!(plan.surface(), Surface::Panel));
    assert_eq!(plan.config().title(), Some("Liste des chambres"));
}
