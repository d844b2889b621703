//! Entity types persisted by the benchmark.

mod minimal_entity;
mod simple_entity_not_null;

pub use minimal_entity::MinimalEntity;
pub use simple_entity_not_null::SimpleEntityNotNull;
