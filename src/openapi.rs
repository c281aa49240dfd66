//! Assembly of merged fragments into the final OpenAPI document.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use crate::config::{is_yaml, Config};
use crate::error::{PrepareError, Result};
use crate::merge::SchemaNode;
use crate::registry::FragmentRegistry;

const DEFAULT_OPENAPI_VERSION: &str = "3.0.2";

/// Fold every registered fragment through the schema merger and finalize
/// the result: default the `openapi` version field, inject the configured
/// server URL when no fragment supplied one, and sort `paths` for stable
/// output.
pub fn assemble(registry: &FragmentRegistry, config: &Config) -> Result<SchemaNode> {
    let mut document = registry.merge_all()?;

    if !document.contains_key("openapi") {
        document.insert(
            "openapi".to_string(),
            Value::String(DEFAULT_OPENAPI_VERSION.to_string()),
        );
    }

    if let Some(base_url) = &config.base_url {
        if !document.contains_key("servers") {
            document.insert("servers".to_string(), json!([{ "url": base_url }]));
        }
    }

    sort_paths(&mut document);

    info!(fragments = registry.len(), "assembled OpenAPI document");
    Ok(document)
}

fn sort_paths(document: &mut SchemaNode) {
    if let Some(Value::Object(paths)) = document.get_mut("paths") {
        let mut keys: Vec<String> = paths.keys().cloned().collect();
        keys.sort();

        let mut sorted = SchemaNode::new();
        for key in keys {
            if let Some(value) = paths.remove(&key) {
                sorted.insert(key, value);
            }
        }
        *paths = sorted;
    }
}

/// Serialize the document to `path`, YAML or pretty JSON by extension.
pub fn write_document(path: &Path, document: &SchemaNode) -> Result<()> {
    let rendered = if is_yaml(path) {
        serde_yaml::to_string(document).map_err(|err| PrepareError::Parse {
            id: path.display().to_string(),
            message: err.to_string(),
        })?
    } else {
        let mut text = serde_json::to_string_pretty(document).map_err(|err| PrepareError::Parse {
            id: path.display().to_string(),
            message: err.to_string(),
        })?;
        text.push('\n');
        text
    };

    fs::write(path, rendered).map_err(|source| PrepareError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(out = %path.display(), "wrote document");
    Ok(())
}
