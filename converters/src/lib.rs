// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Mapping between configuration trees and the remote object model.
//!
//! Every remote type the provider manages gets a pair of conversions: [`Flatten`]
//! describes an observed remote object as configuration, and [`Expand`] builds the
//! remote object a piece of configuration asks for. Composite types compose the
//! conversions of their parts.

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod metadata;
pub mod object_ref;
pub mod persistent_volume;
pub mod primitives;
pub mod pv_spec;
pub mod quantity;
pub mod resource_list;
pub mod volume_source;

use schema::{AccessError, ConfigNode, Schema};

pub use volume_source::VolumeSource;

/// Describe a remote object as configuration. Never fails: unset remote fields are
/// left out of the result.
pub trait Flatten {
    fn flatten(&self) -> ConfigNode;
}

/// Build a remote object from configuration. An empty node yields the zero value.
pub trait Expand: Sized {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError>;
}

/// The configuration shape of a remote type
pub trait Describe {
    fn schema() -> Schema;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpandError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("Value {value} of {key} is out of range")]
    OutOfRange { key: String, value: i64 },
    #[error("Only one of {} may be set", .keys.join(", "))]
    Conflict { keys: Vec<String> },
}

impl ExpandError {
    /// Re-key an error raised while expanding the nested block `parent`
    #[must_use]
    pub fn within(self, parent: &str) -> Self {
        let nest = |key: String| format!("{parent}.{key}");
        match self {
            ExpandError::Access(AccessError {
                key,
                expected,
                found,
            }) => ExpandError::Access(AccessError {
                key: nest(key),
                expected,
                found,
            }),
            ExpandError::InvalidValue { key, value, reason } => ExpandError::InvalidValue {
                key: nest(key),
                value,
                reason,
            },
            ExpandError::OutOfRange { key, value } => ExpandError::OutOfRange {
                key: nest(key),
                value,
            },
            ExpandError::Conflict { keys } => ExpandError::Conflict {
                keys: keys.into_iter().map(nest).collect(),
            },
        }
    }

    /// The configuration key(s) the error is about
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        match self {
            ExpandError::Access(AccessError { key, .. })
            | ExpandError::InvalidValue { key, .. }
            | ExpandError::OutOfRange { key, .. } => vec![key.as_str()],
            ExpandError::Conflict { keys } => keys.iter().map(String::as_str).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_error_rekeying() {
        let err = ExpandError::OutOfRange {
            key: "lun".to_string(),
            value: 1 << 40,
        }
        .within("iscsi")
        .within("persistent_volume_source");
        assert_eq!(err.keys(), vec!["persistent_volume_source.iscsi.lun"]);

        let err = ExpandError::Conflict {
            keys: vec!["nfs".to_string(), "host_path".to_string()],
        }
        .within("spec");
        assert_eq!(err.keys(), vec!["spec.nfs", "spec.host_path"]);
        assert_eq!(err.to_string(), "Only one of spec.nfs, spec.host_path may be set");
    }
}
