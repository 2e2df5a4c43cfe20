// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The `spec` block of a persistent volume

use k8s_openapi::api::core::v1::{ObjectReference, PersistentVolumeSpec};
use schema::{ConfigNode, Field, Schema};

use crate::primitives::{Get, Put};
use crate::resource_list::{expand_resource_list, flatten_resource_list};
use crate::volume_source::VolumeSource;
use crate::{Describe, Expand, ExpandError, Flatten};

const SOURCE: &str = "persistent_volume_source";

impl Describe for PersistentVolumeSpec {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "access_modes",
                Field::string_set()
                    .required()
                    .min_items(1)
                    .describe("Ways the volume can be mounted, e.g. ReadWriteOnce"),
            )
            .field(
                "capacity",
                Field::string_map()
                    .required()
                    .describe("Resources of the volume, e.g. storage = \"10Gi\""),
            )
            .field(
                "claim_ref",
                Field::single_block(ObjectReference::schema())
                    .describe("Claim the volume is bound to, if any"),
            )
            .field(
                "mount_options",
                Field::string_set().describe("Mount options used to mount the volume"),
            )
            .field(
                SOURCE,
                Field::single_block(VolumeSource::schema())
                    .describe("Storage backing the volume. At most one source can be set"),
            )
            .field(
                "persistent_volume_reclaim_policy",
                Field::string().describe(
                    "What happens to the volume once released: Retain, Recycle or Delete",
                ),
            )
            .field(
                "storage_class_name",
                Field::string().describe("Name of the storage class the volume belongs to"),
            )
    }
}

impl Flatten for PersistentVolumeSpec {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        if let Some(capacity) = &self.capacity {
            node.put_map("capacity", Some(&flatten_resource_list(capacity)));
        }
        node.put_set("access_modes", self.access_modes.as_deref().unwrap_or_default());
        if let Some(source) = VolumeSource::from_spec(self) {
            node.set(SOURCE, source.flatten());
        }
        node.put_block("claim_ref", self.claim_ref.as_ref());
        node.put_opt_str(
            "persistent_volume_reclaim_policy",
            self.persistent_volume_reclaim_policy.as_ref(),
        );
        node.put_opt_str("storage_class_name", self.storage_class_name.as_ref());
        node.put_set("mount_options", self.mount_options.as_deref().unwrap_or_default());
        node
    }
}

impl Expand for PersistentVolumeSpec {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        let capacity = expand_resource_list("capacity", &node.map("capacity")?)?;
        let mut spec = PersistentVolumeSpec {
            capacity: (!capacity.is_empty()).then_some(capacity),
            access_modes: node.opt_string_vec("access_modes")?,
            claim_ref: node.opt_block("claim_ref")?,
            persistent_volume_reclaim_policy: node.opt_string("persistent_volume_reclaim_policy")?,
            storage_class_name: node.opt_string("storage_class_name")?,
            mount_options: node.opt_string_vec("mount_options")?,
            ..Default::default()
        };
        if let Some(block) = node.block(SOURCE)?
            && let Some(source) =
                VolumeSource::expand_union(block).map_err(|e| e.within(SOURCE))?
        {
            source.apply_to(&mut spec);
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
    use pretty_assertions::assert_eq;
    use schema::Value;
    use std::collections::BTreeMap;

    fn capacity(storage: &str) -> BTreeMap<String, String> {
        BTreeMap::from([("storage".to_string(), storage.to_string())])
    }

    fn access_modes() -> Value {
        Value::Set(["ReadWriteOnce".to_string()].into_iter().collect())
    }

    #[test]
    fn test_source_is_optional() {
        let config = ConfigNode::new()
            .with("capacity", capacity("10Gi"))
            .with("access_modes", access_modes());
        assert_eq!(PersistentVolumeSpec::schema().validate(&config), Ok(()));
        let spec = PersistentVolumeSpec::expand(&config).unwrap();
        assert_eq!(VolumeSource::from_spec(&spec), None);
        assert_eq!(
            spec.capacity.as_ref().map(|c| &c["storage"]),
            Some(&Quantity("10Gi".to_string()))
        );
        assert_eq!(spec.flatten(), config);
    }

    #[test]
    fn test_capacity_errors_are_keyed() {
        let config = ConfigNode::new()
            .with("capacity", capacity("ten gigs"))
            .with("access_modes", access_modes());
        let err = PersistentVolumeSpec::expand(&config).unwrap_err();
        assert_eq!(err.keys(), vec!["capacity.storage"]);
    }

    #[test]
    fn test_source_errors_are_keyed() {
        let config = ConfigNode::new().with(
            SOURCE,
            ConfigNode::new()
                .with("host_path", ConfigNode::new().with("path", "/data"))
                .with("nfs", ConfigNode::new().with("server", "nfs.example.com")),
        );
        let err = PersistentVolumeSpec::expand(&config).unwrap_err();
        assert_eq!(
            err.keys(),
            vec![
                "persistent_volume_source.host_path",
                "persistent_volume_source.nfs"
            ]
        );
    }

    #[test]
    fn test_missing_access_modes() {
        let config = ConfigNode::new()
            .with("capacity", capacity("1Gi"))
            .with("access_modes", Value::Set(std::collections::BTreeSet::new()));
        let errors = PersistentVolumeSpec::schema()
            .validate(&config)
            .unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].path, "access_modes");
    }
}
