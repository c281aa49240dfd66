//! Aggregates OpenAPI schema fragments into a single document.
//!
//! Fragments are JSON or YAML mappings loaded from disk or HTTP, held in an
//! insertion-ordered [`FragmentRegistry`], and folded through the
//! deterministic schema merger in [`merge`]. The assembled document is
//! written out as YAML or JSON.

pub mod config;
pub mod error;
pub mod fragment;
pub mod logging;
pub mod merge;
pub mod openapi;
pub mod registry;

use std::path::Path;

pub use crate::error::{MergeError, PrepareError, Result};
pub use crate::merge::{merge_schemas, SchemaNode};
pub use crate::registry::FragmentRegistry;

/// Run the full pipeline for one config file: load every fragment, merge,
/// finalize, and write the document. With `check` set the document is
/// assembled but nothing is written.
pub fn run(config_path: &Path, check: bool) -> Result<()> {
    let config = config::read_config(config_path)?;

    let headers = config
        .request
        .as_ref()
        .and_then(|request| request.headers.clone())
        .unwrap_or_default();

    let mut registry = FragmentRegistry::new();
    for source in &config.fragments {
        let (id, node) = fragment::load(source, &headers)?;
        registry.insert(id, node)?;
    }

    let document = openapi::assemble(&registry, &config)?;

    if check {
        tracing::info!("check passed, skipping write");
        return Ok(());
    }

    openapi::write_document(&config.out, &document)
}
