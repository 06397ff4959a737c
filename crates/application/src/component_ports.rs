use async_trait::async_trait;
use auberge_core::{AppResult, Code, EventId};
use auberge_domain::{Module, ModuleEvent, SousModule};
use serde_json::{Map, Value};

/// Persistence port for the module/sous-module/event configuration
/// hierarchy.
///
/// Every operation is an independent request/response call: no batching,
/// no cross-entity transactions, last write wins at the backing store.
#[async_trait]
pub trait ComponentRepository: Send + Sync {
    /// Saves a new module; fails with a conflict when the code exists.
    async fn save_module(&self, module: Module) -> AppResult<()>;

    /// Lists all modules in navigation order.
    async fn list_modules(&self) -> AppResult<Vec<Module>>;

    /// Looks up a module by code.
    async fn find_module(&self, code: &Code) -> AppResult<Option<Module>>;

    /// Deletes a module by code.
    async fn delete_module(&self, code: &Code) -> AppResult<()>;

    /// Saves a new sous-module; fails with a conflict when the code exists.
    async fn save_sous_module(&self, sous_module: SousModule) -> AppResult<()>;

    /// Lists the sous-modules of a module in navigation order.
    async fn list_sous_modules(&self, module_code: &Code) -> AppResult<Vec<SousModule>>;

    /// Looks up a sous-module by code.
    async fn find_sous_module(&self, code: &Code) -> AppResult<Option<SousModule>>;

    /// Deletes a sous-module by code.
    async fn delete_sous_module(&self, code: &Code) -> AppResult<()>;

    /// Saves or replaces an event record whole.
    async fn save_event(&self, event: ModuleEvent) -> AppResult<()>;

    /// Lists the events of a sous-module.
    async fn list_events(&self, sous_module_code: &Code) -> AppResult<Vec<ModuleEvent>>;

    /// Looks up an event by identifier.
    async fn find_event(&self, id: EventId) -> AppResult<Option<ModuleEvent>>;

    /// Deletes an event by identifier.
    async fn delete_event(&self, id: EventId) -> AppResult<()>;
}

/// Row supply port for tabular surfaces.
///
/// The engine is agnostic to where rows come from; any source works as
/// long as each row exposes the keys referenced by the configured columns.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetches the rows behind an opaque data source name.
    async fn fetch_rows(&self, data_source: &str) -> AppResult<Vec<Map<String, Value>>>;
}
