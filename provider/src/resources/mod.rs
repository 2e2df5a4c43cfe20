// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The resource types the provider manages

pub mod autoscale_settings;
pub mod persistent_volume;

pub use autoscale_settings::AutoscaleSettings;
pub use persistent_volume::PersistentVolumeKind;
