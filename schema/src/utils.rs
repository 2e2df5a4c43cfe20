// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Utils to load configuration documents from JSON / YAML text files.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::field::Schema;
use crate::validate::ValidationErrors;
use crate::value::ConfigNode;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read file ({path}): {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to deserialize YAML file ({path}): {source}")]
    Yaml {
        path: String,
        source: serde_yaml_ng::Error,
    },
    #[error("Failed to deserialize JSON file ({path}): {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("Unsupported file extension {0}")]
    UnsupportedExtension(String),
    #[error("Missing file extension")]
    MissingExtension,
    #[error("Invalid configuration in {path}: {errors}")]
    Invalid {
        path: String,
        errors: ValidationErrors,
    },
}

fn read(path: &str) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_string(),
        source,
    })
}

/// Read the file at `path` and deserialize into a `T`.
/// The file is assumed to contain JSON or YAML, as told by its extension.
///
/// # Errors
/// This function may fail if the file does not exist or cannot be opened / read, or if the contents
/// cannot be deserialized.
pub fn load_from_file<T: DeserializeOwned>(path: &str) -> Result<T, LoadError> {
    let ext = Path::new(path).extension();
    debug!("Loading {path}...");
    match ext {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml_ng::from_str(&read(path)?).map_err(|source| LoadError::Yaml {
                path: path.to_string(),
                source,
            })
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&read(path)?).map_err(|source| LoadError::Json {
                path: path.to_string(),
                source,
            })
        }
        Some(ext) => Err(LoadError::UnsupportedExtension(
            ext.to_string_lossy().to_string(),
        )),
        None => Err(LoadError::MissingExtension),
    }
}

/// Read a configuration document at `path` and decode it with `schema`.
///
/// # Errors
/// Fails like [`load_from_file`], or if the document does not match the schema.
pub fn load_config_from_file(path: &str, schema: &Schema) -> Result<ConfigNode, LoadError> {
    let json: serde_json::Value = load_from_file(path)?;
    schema.decode(&json).map_err(|errors| LoadError::Invalid {
        path: path.to_string(),
        errors,
    })
}
