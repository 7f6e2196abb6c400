//! Declarative YAML configuration
//!
//! The engine is configured once, before any graph is built:
//!
//! ```yaml
//! mode: reverse
//! check_leaf_layout: true
//! ```

mod load;
mod schema;

#[cfg(test)]
mod tests;

pub use load::load_config;
pub use schema::{EngineConfig, Mode};
