//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod demo_row_source;
mod in_memory_component_repository;

pub use demo_row_source::DemoRowSource;
pub use in_memory_component_repository::InMemoryComponentRepository;
