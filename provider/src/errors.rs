// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use converters::ExpandError;
use k8s_intf::RemoteError;
use schema::{LoadError, ValidationErrors};
use thiserror::Error;

use crate::wait::WaitError;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("Failed to build the remote object: {0}")]
    Expand(#[from] ExpandError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("Resource did not converge: {0}")]
    Convergence(#[from] WaitError<RemoteError>),
    #[error("Resource {0} has no identity")]
    MissingIdentity(&'static str),
    #[error("Failed to connect to the cluster: {0}")]
    Connect(String),
    #[error("Failed to load configuration: {0}")]
    Config(#[from] LoadError),
}

impl ProviderError {
    /// Tell if the error is about a remote object which does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            ProviderError::Remote(e) | ProviderError::Convergence(WaitError::Refresh(e)) => {
                e.is_not_found()
            }
            _ => false,
        }
    }
}
