// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! `kubernetes_persistent_volume`

use converters::{Describe, Expand, ExpandError, Flatten};
use k8s_openapi::api::core::v1::PersistentVolume;
use schema::{ConfigNode, Schema};

use crate::resource::{Convergence, ResourceKind};

/// Phase a volume reports when its status is not filled in yet
const PENDING: &str = "Pending";

pub struct PersistentVolumeKind;

impl ResourceKind for PersistentVolumeKind {
    type Object = PersistentVolume;

    const TYPE_NAME: &'static str = "kubernetes_persistent_volume";

    fn schema() -> Schema {
        PersistentVolume::schema()
    }

    fn expand(config: &ConfigNode) -> Result<PersistentVolume, ExpandError> {
        PersistentVolume::expand(config)
    }

    fn flatten(object: &PersistentVolume) -> ConfigNode {
        object.flatten()
    }

    fn name(object: &PersistentVolume) -> Option<&str> {
        object.metadata.name.as_deref().filter(|name| !name.is_empty())
    }

    fn set_name(object: &mut PersistentVolume, name: &str) {
        object.metadata.name = Some(name.to_string());
    }

    fn convergence() -> Option<Convergence> {
        Some(Convergence {
            pending: &[PENDING],
            target: &["Available"],
            failed: &["Failed"],
        })
    }

    fn phase(object: &PersistentVolume) -> String {
        object
            .status
            .as_ref()
            .and_then(|status| status.phase.clone())
            .unwrap_or_else(|| PENDING.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use k8s_openapi::api::core::v1::PersistentVolumeStatus;

    #[test]
    fn test_phase() {
        let mut pv = PersistentVolume::default();
        assert_eq!(PersistentVolumeKind::phase(&pv), "Pending");
        pv.status = Some(PersistentVolumeStatus {
            phase: Some("Available".to_string()),
            ..Default::default()
        });
        assert_eq!(PersistentVolumeKind::phase(&pv), "Available");
    }

    #[test]
    fn test_name() {
        let mut pv = PersistentVolume::default();
        assert_eq!(PersistentVolumeKind::name(&pv), None);
        PersistentVolumeKind::set_name(&mut pv, "data");
        assert_eq!(PersistentVolumeKind::name(&pv), Some("data"));
    }
}
