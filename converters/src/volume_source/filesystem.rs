// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Filesystems: host directories and network shares

use k8s_openapi::api::core::v1::{
    AzureFilePersistentVolumeSource, CephFSPersistentVolumeSource,
    GlusterfsPersistentVolumeSource, HostPathVolumeSource, NFSVolumeSource, QuobyteVolumeSource,
};
use schema::{ConfigNode, Field, Schema};

use super::read_only_field;
use crate::object_ref::secret_ref_field;
use crate::primitives::{Get, Put};
use crate::{Describe, Expand, ExpandError, Flatten};

impl Describe for HostPathVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "path",
                Field::string()
                    .required()
                    .describe("Path of the directory on the host"),
            )
            .field(
                "type",
                Field::string().describe("Type of the host path volume, e.g. DirectoryOrCreate"),
            )
    }
}

impl Flatten for HostPathVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("path", &self.path);
        node.put_opt_str("type", self.type_.as_ref());
        node
    }
}

impl Expand for HostPathVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(HostPathVolumeSource {
            path: node.req_string("path")?,
            type_: node.opt_string("type")?,
        })
    }
}

impl Describe for NFSVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "path",
                Field::string()
                    .required()
                    .describe("Path exported by the NFS server"),
            )
            .field("read_only", read_only_field())
            .field(
                "server",
                Field::string()
                    .required()
                    .describe("Hostname or IP address of the NFS server"),
            )
    }
}

impl Flatten for NFSVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("server", &self.server);
        node.put_str("path", &self.path);
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for NFSVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(NFSVolumeSource {
            server: node.req_string("server")?,
            path: node.req_string("path")?,
            read_only: node.opt_bool("read_only")?,
        })
    }
}

impl Describe for GlusterfsPersistentVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "endpoints_name",
                Field::string()
                    .required()
                    .describe("Name of the endpoints object detailing the Glusterfs topology"),
            )
            .field(
                "endpoints_namespace",
                Field::string().describe("Namespace of the endpoints object"),
            )
            .field(
                "path",
                Field::string()
                    .required()
                    .describe("Glusterfs volume path"),
            )
            .field("read_only", read_only_field())
    }
}

impl Flatten for GlusterfsPersistentVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("endpoints_name", &self.endpoints);
        node.put_opt_str("endpoints_namespace", self.endpoints_namespace.as_ref());
        node.put_str("path", &self.path);
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for GlusterfsPersistentVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(GlusterfsPersistentVolumeSource {
            endpoints: node.req_string("endpoints_name")?,
            endpoints_namespace: node.opt_string("endpoints_namespace")?,
            path: node.req_string("path")?,
            read_only: node.opt_bool("read_only")?,
        })
    }
}

impl Describe for CephFSPersistentVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "monitors",
                Field::string_set()
                    .required()
                    .min_items(1)
                    .describe("Ceph monitors"),
            )
            .field(
                "path",
                Field::string().describe("Root of the mounted tree. Defaults to /"),
            )
            .field("read_only", read_only_field())
            .field(
                "secret_file",
                Field::string().describe("Path of the key ring of the user"),
            )
            .field("secret_ref", secret_ref_field())
            .field("user", Field::string().describe("The rados user name"))
    }
}

impl Flatten for CephFSPersistentVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_set("monitors", &self.monitors);
        node.put_opt_str("path", self.path.as_ref());
        node.put_opt_str("user", self.user.as_ref());
        node.put_opt_str("secret_file", self.secret_file.as_ref());
        node.put_block("secret_ref", self.secret_ref.as_ref());
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for CephFSPersistentVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(CephFSPersistentVolumeSource {
            monitors: node.string_vec("monitors")?,
            path: node.opt_string("path")?,
            user: node.opt_string("user")?,
            secret_file: node.opt_string("secret_file")?,
            secret_ref: node.opt_block("secret_ref")?,
            read_only: node.opt_bool("read_only")?,
        })
    }
}

impl Describe for AzureFilePersistentVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field("read_only", read_only_field())
            .field(
                "secret_name",
                Field::string()
                    .required()
                    .describe("Name of the secret holding the storage account name and key"),
            )
            .field(
                "secret_namespace",
                Field::string().describe("Namespace of the secret. Defaults to the pod's"),
            )
            .field(
                "share_name",
                Field::string().required().describe("Name of the share"),
            )
    }
}

impl Flatten for AzureFilePersistentVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("secret_name", &self.secret_name);
        node.put_opt_str("secret_namespace", self.secret_namespace.as_ref());
        node.put_str("share_name", &self.share_name);
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for AzureFilePersistentVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(AzureFilePersistentVolumeSource {
            secret_name: node.req_string("secret_name")?,
            secret_namespace: node.opt_string("secret_namespace")?,
            share_name: node.req_string("share_name")?,
            read_only: node.opt_bool("read_only")?,
        })
    }
}

impl Describe for QuobyteVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "group",
                Field::string().describe("Group to map the volume access to"),
            )
            .field("read_only", read_only_field())
            .field(
                "registry",
                Field::string()
                    .required()
                    .describe("Quobyte registry services, as host:port pairs separated by commas"),
            )
            .field(
                "tenant",
                Field::string().describe("Tenant owning the volume"),
            )
            .field(
                "user",
                Field::string().describe("User to map the volume access to"),
            )
            .field(
                "volume",
                Field::string()
                    .required()
                    .describe("Name of an existing Quobyte volume"),
            )
    }
}

impl Flatten for QuobyteVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("registry", &self.registry);
        node.put_str("volume", &self.volume);
        node.put_opt_bool("read_only", self.read_only);
        node.put_opt_str("user", self.user.as_ref());
        node.put_opt_str("group", self.group.as_ref());
        node.put_opt_str("tenant", self.tenant.as_ref());
        node
    }
}

impl Expand for QuobyteVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(QuobyteVolumeSource {
            registry: node.req_string("registry")?,
            volume: node.req_string("volume")?,
            read_only: node.opt_bool("read_only")?,
            user: node.opt_string("user")?,
            group: node.opt_string("group")?,
            tenant: node.opt_string("tenant")?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::Value;

    #[test]
    fn test_host_path() {
        let config = ConfigNode::new().with("path", "/mnt/data");
        let host_path = HostPathVolumeSource::expand(&config).unwrap();
        assert_eq!(
            host_path,
            HostPathVolumeSource {
                path: "/mnt/data".to_string(),
                type_: None,
            }
        );
        assert_eq!(host_path.flatten(), config);
    }

    #[test]
    fn test_nfs_read_only_false_is_kept() {
        let config = ConfigNode::new()
            .with("server", "nfs.example.com")
            .with("path", "/exports/data")
            .with("read_only", false);
        let nfs = NFSVolumeSource::expand(&config).unwrap();
        assert_eq!(nfs.read_only, Some(false));
        assert_eq!(nfs.flatten(), config);
    }

    #[test]
    fn test_glusterfs_endpoints_key() {
        let config = ConfigNode::new()
            .with("endpoints_name", "glusterfs-cluster")
            .with("path", "kube_vol");
        let gluster = GlusterfsPersistentVolumeSource::expand(&config).unwrap();
        assert_eq!(gluster.endpoints, "glusterfs-cluster");
        assert_eq!(gluster.flatten(), config);
    }

    #[test]
    fn test_cephfs_required_monitors() {
        let schema = CephFSPersistentVolumeSource::schema();
        let errors = schema
            .validate(&ConfigNode::new().with("path", "/"))
            .unwrap_err();
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].path, "monitors");

        let config = ConfigNode::new().with(
            "monitors",
            Value::Set(["10.16.154.78:6789".to_string()].into_iter().collect()),
        );
        assert_eq!(schema.validate(&config), Ok(()));
        let ceph = CephFSPersistentVolumeSource::expand(&config).unwrap();
        assert_eq!(ceph.monitors, vec!["10.16.154.78:6789"]);
    }

    #[test]
    fn test_quobyte_round_trip() {
        let config = ConfigNode::new()
            .with("registry", "registry:7861")
            .with("volume", "testVolume")
            .with("user", "root")
            .with("read_only", true);
        let quobyte = QuobyteVolumeSource::expand(&config).unwrap();
        assert_eq!(quobyte.group, None);
        assert_eq!(quobyte.flatten(), config);
    }
}
