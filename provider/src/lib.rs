// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Resource callbacks reconciling declarative configuration with a remote control plane

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod errors;
pub mod logging;
pub mod registry;
pub mod resource;
pub mod resources;
pub mod state;
pub mod wait;

// re-exports
pub use config::{ProviderConfig, ProviderConfigBuilder};
pub use errors::ProviderError;
pub use registry::Provider;
pub use resource::{Convergence, Existence, Reconciler, ResourceHandler, ResourceKind};
pub use state::{Lifecycle, ResourceState};
pub use wait::{StateChangeConf, WaitError, wait_for_state};
