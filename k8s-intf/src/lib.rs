// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A library to reach the remote control plane holding the provisioned resources

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[cfg(any(test, feature = "bolero"))]
pub mod bolero;
pub mod client;
pub mod error;
pub mod memory;

// re-exports
#[cfg(feature = "client")]
pub use client::KubeApi;
pub use client::RemoteApi;
pub use error::RemoteError;
pub use memory::MemoryApi;
