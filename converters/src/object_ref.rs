// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! References to other objects: claims bound to a volume and secrets holding credentials

use k8s_openapi::api::core::v1::{ObjectReference, SecretReference};
use schema::{ConfigNode, Field, Schema};

use crate::primitives::{Get, Put};
use crate::{Describe, Expand, ExpandError, Flatten};

impl Describe for ObjectReference {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "api_version",
                Field::string().describe("API version of the referent"),
            )
            .field(
                "field_path",
                Field::string().describe("A piece of the referent, rather than the whole object"),
            )
            .field("kind", Field::string().describe("Kind of the referent"))
            .field("name", Field::string().describe("Name of the referent"))
            .field("namespace", Field::string().describe("Namespace of the referent"))
            .field(
                "resource_version",
                Field::string().describe("Resource version the reference was made to"),
            )
            .field("uid", Field::string().describe("UID of the referent"))
    }
}

impl Flatten for ObjectReference {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_opt_str("api_version", self.api_version.as_ref());
        node.put_opt_str("field_path", self.field_path.as_ref());
        node.put_opt_str("kind", self.kind.as_ref());
        node.put_opt_str("name", self.name.as_ref());
        node.put_opt_str("namespace", self.namespace.as_ref());
        node.put_opt_str("resource_version", self.resource_version.as_ref());
        node.put_opt_str("uid", self.uid.as_ref());
        node
    }
}

impl Expand for ObjectReference {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(ObjectReference {
            api_version: node.opt_string("api_version")?,
            field_path: node.opt_string("field_path")?,
            kind: node.opt_string("kind")?,
            name: node.opt_string("name")?,
            namespace: node.opt_string("namespace")?,
            resource_version: node.opt_string("resource_version")?,
            uid: node.opt_string("uid")?,
        })
    }
}

impl Describe for SecretReference {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "name",
                Field::string().describe("Name of the secret, unique within a namespace"),
            )
            .field(
                "namespace",
                Field::string().describe("Namespace the secret lives in"),
            )
    }
}

impl Flatten for SecretReference {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_opt_str("name", self.name.as_ref());
        node.put_opt_str("namespace", self.namespace.as_ref());
        node
    }
}

impl Expand for SecretReference {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(SecretReference {
            name: node.opt_string("name")?,
            namespace: node.opt_string("namespace")?,
        })
    }
}

/// The `secret_ref` field shared by the volume sources taking credentials
pub(crate) fn secret_ref_field() -> Field {
    Field::single_block(SecretReference::schema())
        .describe("Reference to the secret holding authentication data")
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_claim_ref() {
        let config = ConfigNode::new()
            .with("kind", "PersistentVolumeClaim")
            .with("name", "data")
            .with("namespace", "default");
        let claim = ObjectReference::expand(&config).unwrap();
        assert_eq!(claim.name.as_deref(), Some("data"));
        assert_eq!(claim.uid, None);
        assert_eq!(claim.flatten(), config);
        assert_eq!(ObjectReference::schema().validate(&config), Ok(()));
    }

    #[test]
    fn test_empty_secret_ref() {
        let secret = SecretReference::expand(&ConfigNode::new()).unwrap();
        assert_eq!(secret, SecretReference::default());
        assert!(secret.flatten().is_empty());
    }
}
