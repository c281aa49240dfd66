use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PrepareError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Output file; `.yml`/`.yaml` writes YAML, anything else pretty JSON.
    pub out: PathBuf,
    /// Injected as `servers[0].url` when no fragment supplies `servers`.
    pub base_url: Option<String>,
    pub request: Option<RequestConfig>,
    pub fragments: Vec<FragmentSource>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RequestConfig {
    pub headers: Option<HashMap<String, String>>,
}

/// One schema fragment to load: exactly one of `path` or `url`.
#[derive(Debug, Deserialize, Clone)]
pub struct FragmentSource {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}

impl FragmentSource {
    /// Identity of the fragment in the registry and in error messages.
    pub fn id(&self) -> String {
        match (&self.path, &self.url) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(url)) => url.clone(),
            (None, None) => String::new(),
        }
    }
}

pub fn read_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|source| PrepareError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: Config = if is_yaml(path) {
        serde_yaml::from_str(&contents).map_err(|err| PrepareError::Parse {
            id: path.display().to_string(),
            message: err.to_string(),
        })?
    } else {
        serde_json::from_str(&contents).map_err(|err| PrepareError::Parse {
            id: path.display().to_string(),
            message: err.to_string(),
        })?
    };

    validate(&config)?;
    Ok(config)
}

pub(crate) fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yml") | Some("yaml")
    )
}

fn validate(config: &Config) -> Result<()> {
    if config.fragments.is_empty() {
        return Err(PrepareError::Config(
            "at least one fragment is required".to_string(),
        ));
    }
    for (index, fragment) in config.fragments.iter().enumerate() {
        match (&fragment.path, &fragment.url) {
            (Some(_), Some(_)) => {
                return Err(PrepareError::Config(format!(
                    "fragment {index} names both `path` and `url`"
                )));
            }
            (None, None) => {
                return Err(PrepareError::Config(format!(
                    "fragment {index} names neither `path` nor `url`"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}
