// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Block devices: cloud disks and SAN attached volumes

use k8s_openapi::api::core::v1::{
    AWSElasticBlockStoreVolumeSource, AzureDiskVolumeSource, CinderPersistentVolumeSource,
    FCVolumeSource, GCEPersistentDiskVolumeSource, ISCSIPersistentVolumeSource,
    PhotonPersistentDiskVolumeSource, RBDPersistentVolumeSource, VsphereVirtualDiskVolumeSource,
};
use schema::{ConfigNode, Field, Schema};

use super::{fs_type_field, read_only_field};
use crate::object_ref::secret_ref_field;
use crate::primitives::{Get, Put};
use crate::{Describe, Expand, ExpandError, Flatten};

fn partition_field() -> Field {
    Field::int().describe("Partition of the volume to mount. The whole volume is used if unset")
}

impl Describe for GCEPersistentDiskVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field("fs_type", fs_type_field())
            .field("partition", partition_field())
            .field(
                "pd_name",
                Field::string()
                    .required()
                    .describe("Name of the persistent disk in GCE"),
            )
            .field("read_only", read_only_field())
    }
}

impl Flatten for GCEPersistentDiskVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("pd_name", &self.pd_name);
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_opt_int("partition", self.partition);
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for GCEPersistentDiskVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(GCEPersistentDiskVolumeSource {
            pd_name: node.req_string("pd_name")?,
            fs_type: node.opt_string("fs_type")?,
            partition: node.opt_i32("partition")?,
            read_only: node.opt_bool("read_only")?,
        })
    }
}

impl Describe for AWSElasticBlockStoreVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field("fs_type", fs_type_field())
            .field("partition", partition_field())
            .field("read_only", read_only_field())
            .field(
                "volume_id",
                Field::string()
                    .required()
                    .describe("Unique ID of the EBS volume"),
            )
    }
}

impl Flatten for AWSElasticBlockStoreVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("volume_id", &self.volume_id);
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_opt_int("partition", self.partition);
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for AWSElasticBlockStoreVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(AWSElasticBlockStoreVolumeSource {
            volume_id: node.req_string("volume_id")?,
            fs_type: node.opt_string("fs_type")?,
            partition: node.opt_i32("partition")?,
            read_only: node.opt_bool("read_only")?,
        })
    }
}

impl Describe for RBDPersistentVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "ceph_monitors",
                Field::string_set()
                    .required()
                    .min_items(1)
                    .describe("Ceph monitors"),
            )
            .field("fs_type", fs_type_field())
            .field(
                "keyring",
                Field::string().describe("Path of the key ring of the rados user"),
            )
            .field("rados_user", Field::string().describe("The rados user name"))
            .field(
                "rbd_image",
                Field::string().required().describe("The rados image name"),
            )
            .field("rbd_pool", Field::string().describe("The rados pool name"))
            .field("read_only", read_only_field())
            .field("secret_ref", secret_ref_field())
    }
}

impl Flatten for RBDPersistentVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_set("ceph_monitors", &self.monitors);
        node.put_str("rbd_image", &self.image);
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_opt_str("rbd_pool", self.pool.as_ref());
        node.put_opt_str("rados_user", self.user.as_ref());
        node.put_opt_str("keyring", self.keyring.as_ref());
        node.put_block("secret_ref", self.secret_ref.as_ref());
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for RBDPersistentVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(RBDPersistentVolumeSource {
            monitors: node.string_vec("ceph_monitors")?,
            image: node.req_string("rbd_image")?,
            fs_type: node.opt_string("fs_type")?,
            pool: node.opt_string("rbd_pool")?,
            user: node.opt_string("rados_user")?,
            keyring: node.opt_string("keyring")?,
            secret_ref: node.opt_block("secret_ref")?,
            read_only: node.opt_bool("read_only")?,
        })
    }
}

impl Describe for ISCSIPersistentVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "chap_auth_discovery",
                Field::bool().describe("Whether iSCSI discovery CHAP authentication is used"),
            )
            .field(
                "chap_auth_session",
                Field::bool().describe("Whether iSCSI session CHAP authentication is used"),
            )
            .field("fs_type", fs_type_field())
            .field(
                "initiator_name",
                Field::string().describe("Custom iSCSI initiator name"),
            )
            .field(
                "iqn",
                Field::string()
                    .required()
                    .describe("Target iSCSI qualified name"),
            )
            .field(
                "iscsi_interface",
                Field::string().describe("iSCSI interface name using an iSCSI transport"),
            )
            .field(
                "lun",
                Field::int().required().describe("iSCSI target lun number"),
            )
            .field(
                "portals",
                Field::string_list().describe("Additional target portals, as ip or ip:port"),
            )
            .field("read_only", read_only_field())
            .field("secret_ref", secret_ref_field())
            .field(
                "target_portal",
                Field::string()
                    .required()
                    .describe("iSCSI target portal, as ip or ip:port"),
            )
    }
}

impl Flatten for ISCSIPersistentVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("target_portal", &self.target_portal);
        node.put_str("iqn", &self.iqn);
        node.set("lun", self.lun);
        node.put_opt_str("iscsi_interface", self.iscsi_interface.as_ref());
        node.put_opt_str("initiator_name", self.initiator_name.as_ref());
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_opt_bool("read_only", self.read_only);
        node.put_opt_bool("chap_auth_discovery", self.chap_auth_discovery);
        node.put_opt_bool("chap_auth_session", self.chap_auth_session);
        node.put_list("portals", self.portals.as_deref().unwrap_or_default());
        node.put_block("secret_ref", self.secret_ref.as_ref());
        node
    }
}

impl Expand for ISCSIPersistentVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(ISCSIPersistentVolumeSource {
            target_portal: node.req_string("target_portal")?,
            iqn: node.req_string("iqn")?,
            lun: node.req_i32("lun")?,
            iscsi_interface: node.opt_string("iscsi_interface")?,
            initiator_name: node.opt_string("initiator_name")?,
            fs_type: node.opt_string("fs_type")?,
            read_only: node.opt_bool("read_only")?,
            chap_auth_discovery: node.opt_bool("chap_auth_discovery")?,
            chap_auth_session: node.opt_bool("chap_auth_session")?,
            portals: node.opt_string_vec("portals")?,
            secret_ref: node.opt_block("secret_ref")?,
        })
    }
}

impl Describe for CinderPersistentVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field("fs_type", fs_type_field())
            .field("read_only", read_only_field())
            .field("secret_ref", secret_ref_field())
            .field(
                "volume_id",
                Field::string()
                    .required()
                    .describe("Volume id identifying the volume in cinder"),
            )
    }
}

impl Flatten for CinderPersistentVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("volume_id", &self.volume_id);
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_opt_bool("read_only", self.read_only);
        node.put_block("secret_ref", self.secret_ref.as_ref());
        node
    }
}

impl Expand for CinderPersistentVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(CinderPersistentVolumeSource {
            volume_id: node.req_string("volume_id")?,
            fs_type: node.opt_string("fs_type")?,
            read_only: node.opt_bool("read_only")?,
            secret_ref: node.opt_block("secret_ref")?,
        })
    }
}

impl Describe for FCVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field("fs_type", fs_type_field())
            .field(
                "lun",
                Field::int().required().describe("FC target lun number"),
            )
            .field("read_only", read_only_field())
            .field(
                "target_ww_ns",
                Field::string_set()
                    .required()
                    .min_items(1)
                    .describe("FC target worldwide names"),
            )
    }
}

impl Flatten for FCVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_set("target_ww_ns", self.target_wwns.as_deref().unwrap_or_default());
        node.put_opt_int("lun", self.lun);
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for FCVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(FCVolumeSource {
            target_wwns: node.opt_string_vec("target_ww_ns")?,
            lun: node.opt_i32("lun")?,
            fs_type: node.opt_string("fs_type")?,
            read_only: node.opt_bool("read_only")?,
            wwids: None,
        })
    }
}

impl Describe for VsphereVirtualDiskVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field("fs_type", fs_type_field())
            .field(
                "storage_policy_id",
                Field::string().describe("ID of the storage policy based management profile"),
            )
            .field(
                "storage_policy_name",
                Field::string().describe("Name of the storage policy based management profile"),
            )
            .field(
                "volume_path",
                Field::string()
                    .required()
                    .describe("Path identifying the vSphere volume vmdk"),
            )
    }
}

impl Flatten for VsphereVirtualDiskVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("volume_path", &self.volume_path);
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_opt_str("storage_policy_id", self.storage_policy_id.as_ref());
        node.put_opt_str("storage_policy_name", self.storage_policy_name.as_ref());
        node
    }
}

impl Expand for VsphereVirtualDiskVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(VsphereVirtualDiskVolumeSource {
            volume_path: node.req_string("volume_path")?,
            fs_type: node.opt_string("fs_type")?,
            storage_policy_id: node.opt_string("storage_policy_id")?,
            storage_policy_name: node.opt_string("storage_policy_name")?,
        })
    }
}

impl Describe for AzureDiskVolumeSource {
    fn schema() -> Schema {
        Schema::new()
            .field(
                "caching_mode",
                Field::string().describe("Host caching mode: None, ReadOnly or ReadWrite"),
            )
            .field(
                "data_disk_uri",
                Field::string()
                    .required()
                    .describe("URI of the data disk in the blob storage"),
            )
            .field(
                "disk_name",
                Field::string()
                    .required()
                    .describe("Name of the data disk in the blob storage"),
            )
            .field("fs_type", fs_type_field())
            .field(
                "kind",
                Field::string().describe("Disk kind: Shared, Dedicated or Managed"),
            )
            .field("read_only", read_only_field())
    }
}

/// Caching mode, filesystem type and read only flag may all be missing from what the
/// remote side reports.
impl Flatten for AzureDiskVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("disk_name", &self.disk_name);
        node.put_str("data_disk_uri", &self.disk_uri);
        node.put_opt_str("caching_mode", self.caching_mode.as_ref());
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node.put_opt_str("kind", self.kind.as_ref());
        node.put_opt_bool("read_only", self.read_only);
        node
    }
}

impl Expand for AzureDiskVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(AzureDiskVolumeSource {
            disk_name: node.req_string("disk_name")?,
            disk_uri: node.req_string("data_disk_uri")?,
            caching_mode: node.opt_string("caching_mode")?,
            fs_type: node.opt_string("fs_type")?,
            kind: node.opt_string("kind")?,
            read_only: node.opt_bool("read_only")?,
        })
    }
}

impl Describe for PhotonPersistentDiskVolumeSource {
    fn schema() -> Schema {
        Schema::new().field("fs_type", fs_type_field()).field(
            "pd_id",
            Field::string()
                .required()
                .describe("ID identifying the Photon Controller persistent disk"),
        )
    }
}

impl Flatten for PhotonPersistentDiskVolumeSource {
    fn flatten(&self) -> ConfigNode {
        let mut node = ConfigNode::new();
        node.put_str("pd_id", &self.pd_id);
        node.put_opt_str("fs_type", self.fs_type.as_ref());
        node
    }
}

impl Expand for PhotonPersistentDiskVolumeSource {
    fn expand(node: &ConfigNode) -> Result<Self, ExpandError> {
        Ok(PhotonPersistentDiskVolumeSource {
            pd_id: node.req_string("pd_id")?,
            fs_type: node.opt_string("fs_type")?,
        })
    }
}
