// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Volumes managed by external plugins

use k8s_openapi::api::core::v1::{FlexPersistentVolumeSource, FlockerVolumeSource};
use schema::{ConfigNode, Field, Schema};

use super::{fs_type_field, read_only_field};
use crate::object_ref::secret_ref_field;
use crate::primitives::{Get, Put};
use crate::{Describe, Expand, ExpandError, Flatten};

impl Describe for FlockerVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "dataset_name",
                Field::string().describe("Name of the dataset, stored as metadata on it"),
            )
            .field(
                "dataset_uuid",
                Field::string().describe("UUID of the dataset, its unique identifier"),
            )
    }
}

impl Flatten for FlockerVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_opt_str("dataset_name", self.dataset_name.as_ref());
        node.put_opt_str("dataset_uuid", self.dataset_uuid.as_ref());
        node
    }
}

impl Expand for FlockerVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(FlockerVolumeSource {
            dataset_name: node.opt_string("dataset_name")?,
            dataset_uuid: node.opt_string("dataset_uuid")?,
        })
    }
}

impl Describe for FlexPersistentVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "driver",
                Field::string()
                    .required()
                    .describe("Name of the driver to use for this volume"),
            )
            .field("fs_type", fs_type_field())
            .field(
                "options",
                Field::string_map().describe("Extra command options passed to the driver"),
            )
            .field("read_only", read_only_field())
            .field("secret_ref", secret_ref_field())
    }
}

impl Flatten for FlexPersistentVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("driver", &self.driver);
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_block("secret_ref", self.secret_ref.as_ref());
        node.put_opt_bool("read_only", self.read_only);
        node.put_map("options", self.options.as_ref());
        node
    }
}

impl Expand for FlexPersistentVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(FlexPersistentVolumeSource {
            driver: node.req_string("driver")?,
            fs_type: node.opt_string("fs_type")?,
            secret_ref: node.opt_block("secret_ref")?,
            read_only: node.opt_bool("read_only")?,
            options: node.opt_map("options")?,
        })
    }
}
