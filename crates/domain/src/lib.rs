//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod column;
mod config;
mod descriptor;
mod module;

pub use column::{BadgeVariant, ColumnDescriptor, ColumnKind};
pub use config::{
    ComponentActions, ComponentActionsPatch, ComponentConfig, ComponentConfigPatch, ComponentType,
};
pub use descriptor::{FieldDescriptor, FieldKind, SelectOption};
pub use module::{Module, ModuleEvent, SousModule};
