// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The persistent volume resource: a `metadata` and a `spec` block

use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use schema::{ConfigNode, Field, Schema};

use crate::primitives::{Get, Put};
use crate::{Describe, Expand, ExpandError, Flatten};

impl Describe for PersistentVolume {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "metadata",
                Field::single_block(ObjectMeta::schema())
                    .required()
                    .describe("Standard object metadata"),
            )
            .field(
                "spec",
                Field::single_block(PersistentVolumeSpec::schema())
                    .required()
                    .describe("Specification of the persistent volume"),
            )
    }
}

impl Flatten for PersistentVolume {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_block("metadata", Some(&self.metadata));
        node.put_block("spec", self.spec.as_ref());
        node
    }
}

impl Expand for PersistentVolume {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(PersistentVolume {
            metadata: node.opt_block("metadata")?.unwrap_or_default(),
            spec: node.opt_block("spec")?,
            status: None,
        })
    }
}
