// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors reported by remote backends

#[cfg(feature = "client")]
use std::sync::Arc;

/// HTTP status code the API server uses for missing objects
pub const NOT_FOUND: u16 = 404;
/// HTTP status code the API server uses for name and resource version conflicts
pub const CONFLICT: u16 = 409;
/// HTTP status code the API server uses for semantically invalid objects
pub const UNPROCESSABLE: u16 = 422;

#[derive(Debug, Clone, thiserror::Error)]
pub enum RemoteError {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },
    #[error("API error ({code}): {message}")]
    Api { code: u16, message: String },
    #[cfg(feature = "client")]
    #[error("Client error: {0}")]
    Client(Arc<kube::Error>),
}

impl RemoteError {
    #[must_use]
    pub fn not_found(kind: &str, name: &str) -> Self {
        RemoteError::NotFound {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    /// Tell if the remote object does not exist.
    ///
    /// A raw API error carrying a 404 counts, so errors built by hand classify the same way
    /// as the ones mapped from the kube client.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            RemoteError::NotFound { .. } => true,
            RemoteError::Api { code, .. } => *code == NOT_FOUND,
            #[cfg(feature = "client")]
            RemoteError::Client(_) => false,
        }
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, RemoteError::Api { code, .. } if *code == CONFLICT)
    }
}

#[cfg(feature = "client")]
impl RemoteError {
    /// Classify an error returned by the kube client for the object `name` of kind `kind`
    #[must_use]
    pub fn from_kube(kind: &str, name: &str, err: kube::Error) -> Self {
        match err {
            kube::Error::Api(api_error) if api_error.code == NOT_FOUND => {
                RemoteError::not_found(kind, name)
            }
            kube::Error::Api(api_error) => RemoteError::Api {
                code: api_error.code,
                message: api_error.message.clone(),
            },
            err => RemoteError::Client(Arc::new(err)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(RemoteError::not_found("PersistentVolume", "pv").is_not_found());
        let gone = RemoteError::Api {
            code: NOT_FOUND,
            message: "gone".to_string(),
        };
        assert!(gone.is_not_found());
        let conflict = RemoteError::Api {
            code: CONFLICT,
            message: "already exists".to_string(),
        };
        assert!(!conflict.is_not_found());
        assert!(conflict.is_conflict());
        assert_eq!(
            RemoteError::not_found("PersistentVolume", "pv").to_string(),
            "PersistentVolume 'pv' not found"
        );
    }
}
