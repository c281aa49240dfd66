//! Loading of schema fragments from disk or HTTP.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::config::{is_yaml, FragmentSource};
use crate::error::{PrepareError, Result};
use crate::merge::SchemaNode;

/// Load one configured fragment, returning its identity and parsed tree.
pub fn load(source: &FragmentSource, headers: &HashMap<String, String>) -> Result<(String, SchemaNode)> {
    let id = source.id();
    let node = match (&source.path, &source.url) {
        (Some(path), _) => read_file(path)?,
        (None, Some(url)) => fetch_url(url, headers)?,
        (None, None) => {
            return Err(PrepareError::Config(
                "fragment names neither `path` nor `url`".to_string(),
            ));
        }
    };
    debug!(fragment = %id, keys = node.len(), "loaded fragment");
    Ok((id, node))
}

/// Parse a local fragment file, JSON or YAML by extension.
pub fn read_file(path: &Path) -> Result<SchemaNode> {
    let contents = fs::read_to_string(path).map_err(|source| PrepareError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let id = path.display().to_string();
    let value: Value = if is_yaml(path) {
        serde_yaml::from_str(&contents).map_err(|err| PrepareError::Parse {
            id: id.clone(),
            message: err.to_string(),
        })?
    } else {
        serde_json::from_str(&contents).map_err(|err| PrepareError::Parse {
            id: id.clone(),
            message: err.to_string(),
        })?
    };

    into_node(id, value)
}

/// Fetch a fragment over HTTP. The response body is always parsed as JSON,
/// which is what schema endpoints serve.
pub fn fetch_url(url: &str, headers: &HashMap<String, String>) -> Result<SchemaNode> {
    let client = reqwest::blocking::Client::new();
    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let body = request
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.text())
        .map_err(|source| PrepareError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let value: Value = serde_json::from_str(&body).map_err(|err| PrepareError::Parse {
        id: url.to_string(),
        message: err.to_string(),
    })?;

    into_node(url.to_string(), value)
}

fn into_node(id: String, value: Value) -> Result<SchemaNode> {
    match value {
        Value::Object(node) => Ok(node),
        _ => Err(PrepareError::NotAMapping(id)),
    }
}
