//! Application services and ports for the component configuration engine.

#![forbid(unsafe_code)]

mod component_ports;
mod component_service;
mod config_merge;
mod registry;
mod table;
mod validator;

pub use component_ports::{ComponentRepository, RowSource};
pub use component_service::{ComponentService, RenderPlan, Surface};
pub use config_merge::{DEFAULT_PAGE_SIZE, default_config, merge_config};
pub use registry::{
    ComponentRegistry, ComponentRenderer, Resolution, TYPE_CODE_PREFIX, type_code,
};
pub use table::{CellContent, SortDirection, TablePage, TableSort, TableState, row_identity};
pub use validator::{
    FieldRule, FieldValidator, ValidationReport, ValidatorSet, build_defaults, build_schema,
};
