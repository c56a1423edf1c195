//! Name-keyed GPU resource registries.
//!
//! Every resource kind follows the same pattern: create once under a name, look up by
//! name, get `None` for names that were never created.

mod pipeline;
mod resources;
mod store;

pub use pipeline::{Pipeline, PipelineKind};
pub use resources::Resources;
