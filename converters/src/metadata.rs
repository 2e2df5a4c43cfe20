// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Object metadata.
//!
//! Users set the name (or a prefix the server completes), labels and annotations.
//! Identifiers and versions assigned by the server are reported as computed fields and
//! are never sent back.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use schema::{ConfigNode, Field, Schema};

use crate::primitives::{Get, Put};
use crate::{Describe, Expand, ExpandError, Flatten};

impl Describe for ObjectMeta {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "name",
                Field::string()
                    .optional_computed()
                    .force_new()
                    .describe("Name of the object, unique within its kind"),
            )
            .field(
                "generate_name",
                Field::string()
                    .force_new()
                    .describe("Prefix of a name the server generates if no name is given"),
            )
            .field(
                "labels",
                Field::string_map().describe("Labels to organize and select objects"),
            )
            .field(
                "annotations",
                Field::string_map().describe("Unstructured data attached to the object"),
            )
            .field(
                "uid",
                Field::string()
                    .computed()
                    .describe("Unique identifier assigned by the server"),
            )
            .field(
                "resource_version",
                Field::string()
                    .computed()
                    .describe("Internal version of the object, changed on every update"),
            )
            .field(
                "generation",
                Field::int()
                    .computed()
                    .describe("Generation of the desired state"),
            )
    }
}

impl Flatten for ObjectMeta {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_opt_str("name", self.name.as_ref());
        node.put_opt_str("generate_name", self.generate_name.as_ref());
        node.put_map("labels", self.labels.as_ref());
        node.put_map("annotations", self.annotations.as_ref());
        node.put_opt_str("uid", self.uid.as_ref());
        node.put_opt_str("resource_version", self.resource_version.as_ref());
        node.put_opt_i64("generation", self.generation);
        node
    }
}

impl Expand for ObjectMeta {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(ObjectMeta {
            name: node.opt_string("name")?,
            generate_name: node.opt_string("generate_name")?,
            labels: node.opt_map("labels")?,
            annotations: node.opt_map("annotations")?,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_computed_fields_are_not_sent() {
        let labels = BTreeMap::from([("tier".to_string(), "storage".to_string())]);
        let meta = ObjectMeta {
            name: Some("data".to_string()),
            labels: Some(labels.clone()),
            uid: Some("0b9f4a3c".to_string()),
            resource_version: Some("7".to_string()),
            generation: Some(2),
            ..Default::default()
        };
        let config = meta.flatten();
        assert_eq!(config.str("uid"), Ok(Some("0b9f4a3c")));
        assert_eq!(config.int("generation"), Ok(Some(2)));

        let expanded = ObjectMeta::expand(&config).unwrap();
        assert_eq!(
            expanded,
            ObjectMeta {
                name: Some("data".to_string()),
                labels: Some(labels),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_schema_flags() {
        let schema = ObjectMeta::schema();
        assert_eq!(
            schema.force_new_fields().collect::<Vec<_>>(),
            vec!["generate_name", "name"]
        );
        assert!(!schema.get("name").unwrap().is_required());
    }
}
