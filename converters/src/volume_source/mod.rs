// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The backing storage of a persistent volume.
//!
//! The remote spec holds one optional field per storage backend, of which at most one
//! may be set. [`VolumeSource`] holds exactly one of them, and a persistent volume
//! without a source is represented as `None`.

mod block;
mod filesystem;
mod plugin;

use k8s_openapi::api::core::v1::{
    AWSElasticBlockStoreVolumeSource, AzureDiskVolumeSource, AzureFilePersistentVolumeSource,
    CephFSPersistentVolumeSource, CinderPersistentVolumeSource, FCVolumeSource,
    FlexPersistentVolumeSource, FlockerVolumeSource, GCEPersistentDiskVolumeSource,
    GlusterfsPersistentVolumeSource, HostPathVolumeSource, ISCSIPersistentVolumeSource,
    NFSVolumeSource, PersistentVolumeSpec, PhotonPersistentDiskVolumeSource,
    QuobyteVolumeSource, RBDPersistentVolumeSource, VsphereVirtualDiskVolumeSource,
};
use schema::{ConfigNode, Field, Schema};
use tracing::warn;

use crate::{Describe, Expand, ExpandError, Flatten};

fn fs_type_field() -> Field {
    Field::string().describe("Filesystem type to mount, e.g. ext4 or xfs")
}

fn read_only_field() -> Field {
    Field::bool().describe("Whether the volume is mounted read only")
}

#[derive(Debug, Clone, PartialEq)]
pub enum VolumeSource {
    GcePersistentDisk(GCEPersistentDiskVolumeSource),
    AwsElasticBlockStore(AWSElasticBlockStoreVolumeSource),
    HostPath(HostPathVolumeSource),
    Glusterfs(GlusterfsPersistentVolumeSource),
    Nfs(NFSVolumeSource),
    Rbd(RBDPersistentVolumeSource),
    Iscsi(ISCSIPersistentVolumeSource),
    Cinder(CinderPersistentVolumeSource),
    CephFs(CephFSPersistentVolumeSource),
    Fc(FCVolumeSource),
    Flocker(FlockerVolumeSource),
    FlexVolume(FlexPersistentVolumeSource),
    AzureFile(AzureFilePersistentVolumeSource),
    VsphereVolume(VsphereVirtualDiskVolumeSource),
    Quobyte(QuobyteVolumeSource),
    AzureDisk(AzureDiskVolumeSource),
    PhotonPersistentDisk(PhotonPersistentDiskVolumeSource),
}

/// Configuration keys of the sources, in the order they are looked up
pub const KEYS: [&str; 17] = [
    "gce_persistent_disk",
    "aws_elastic_block_store",
    "host_path",
    "glusterfs",
    "nfs",
    "rbd",
    "iscsi",
    "cinder",
    "ceph_fs",
    "fc",
    "flocker",
    "flex_volume",
    "azure_file",
    "vsphere_volume",
    "quobyte",
    "azure_disk",
    "photon_persistent_disk",
];

/// Expand into `Some(variant)` if the block `$key` of `$node` holds anything
macro_rules! expand_block {
    ($node:expr, $key:expr, $variant:ident) => {
        match $node.block($key)? {
            Some(block) => Some(VolumeSource::$variant(
                Expand::expand(block).map_err(|e| e.within($key))?,
            )),
            None => None,
        }
    };
}

impl VolumeSource {
    /// Configuration key of the active source
    #[must_use]
    pub fn key(&self) -> &'static str {
        let idx = match self {
            VolumeSource::GcePersistentDisk(_) => 0,
            VolumeSource::AwsElasticBlockStore(_) => 1,
            VolumeSource::HostPath(_) => 2,
            VolumeSource::Glusterfs(_) => 3,
            VolumeSource::Nfs(_) => 4,
            VolumeSource::Rbd(_) => 5,
            VolumeSource::Iscsi(_) => 6,
            VolumeSource::Cinder(_) => 7,
            VolumeSource::CephFs(_) => 8,
            VolumeSource::Fc(_) => 9,
            VolumeSource::Flocker(_) => 10,
            VolumeSource::FlexVolume(_) => 11,
            VolumeSource::AzureFile(_) => 12,
            VolumeSource::VsphereVolume(_) => 13,
            VolumeSource::Quobyte(_) => 14,
            VolumeSource::AzureDisk(_) => 15,
            VolumeSource::PhotonPersistentDisk(_) => 16,
        };
        KEYS[idx]
    }

    fn flatten_inner(&self) -> ConfigNode {
        match self {
            VolumeSource::GcePersistentDisk(s) => s.flatten(),
            VolumeSource::AwsElasticBlockStore(s) => s.flatten(),
            VolumeSource::HostPath(s) => s.flatten(),
            VolumeSource::Glusterfs(s) => s.flatten(),
            VolumeSource::Nfs(s) => s.flatten(),
            VolumeSource::Rbd(s) => s.flatten(),
            VolumeSource::Iscsi(s) => s.flatten(),
            VolumeSource::Cinder(s) => s.flatten(),
            VolumeSource::CephFs(s) => s.flatten(),
            VolumeSource::Fc(s) => s.flatten(),
            VolumeSource::Flocker(s) => s.flatten(),
            VolumeSource::FlexVolume(s) => s.flatten(),
            VolumeSource::AzureFile(s) => s.flatten(),
            VolumeSource::VsphereVolume(s) => s.flatten(),
            VolumeSource::Quobyte(s) => s.flatten(),
            VolumeSource::AzureDisk(s) => s.flatten(),
            VolumeSource::PhotonPersistentDisk(s) => s.flatten(),
        }
    }

    /// All the sources a remote spec holds, in lookup order
    fn all_from_spec(spec: &PersistentVolumeSpec) -> Vec<VolumeSource> {
        let sources = [
            spec.gce_persistent_disk.clone().map(VolumeSource::GcePersistentDisk),
            spec.aws_elastic_block_store.clone().map(VolumeSource::AwsElasticBlockStore),
            spec.host_path.clone().map(VolumeSource::HostPath),
            spec.glusterfs.clone().map(VolumeSource::Glusterfs),
            spec.nfs.clone().map(VolumeSource::Nfs),
            spec.rbd.clone().map(VolumeSource::Rbd),
            spec.iscsi.clone().map(VolumeSource::Iscsi),
            spec.cinder.clone().map(VolumeSource::Cinder),
            spec.cephfs.clone().map(VolumeSource::CephFs),
            spec.fc.clone().map(VolumeSource::Fc),
            spec.flocker.clone().map(VolumeSource::Flocker),
            spec.flex_volume.clone().map(VolumeSource::FlexVolume),
            spec.azure_file.clone().map(VolumeSource::AzureFile),
            spec.vsphere_volume.clone().map(VolumeSource::VsphereVolume),
            spec.quobyte.clone().map(VolumeSource::Quobyte),
            spec.azure_disk.clone().map(VolumeSource::AzureDisk),
            spec.photon_persistent_disk.clone().map(VolumeSource::PhotonPersistentDisk),
        ];
        sources.into_iter().flatten().collect()
    }

    /// The source of a remote spec. The first one in lookup order wins if the remote
    /// side reports several.
    #[must_use]
    pub fn from_spec(spec: &PersistentVolumeSpec) -> Option<VolumeSource> {
        let mut sources = Self::all_from_spec(spec);
        if sources.len() > 1 {
            let keys: Vec<&str> = sources.iter().map(VolumeSource::key).collect();
            warn!(
                "Volume reports several sources ({}), only {} is kept",
                keys.join(", "),
                keys[0]
            );
        }
        if sources.is_empty() {
            None
        } else {
            Some(sources.swap_remove(0))
        }
    }

    /// Set this source on a remote spec, clearing any other
    pub fn apply_to(self, spec: &mut PersistentVolumeSpec) {
        clear_sources(spec);
        match self {
            VolumeSource::GcePersistentDisk(s) => spec.gce_persistent_disk = Some(s),
            VolumeSource::AwsElasticBlockStore(s) => spec.aws_elastic_block_store = Some(s),
            VolumeSource::HostPath(s) => spec.host_path = Some(s),
            VolumeSource::Glusterfs(s) => spec.glusterfs = Some(s),
            VolumeSource::Nfs(s) => spec.nfs = Some(s),
            VolumeSource::Rbd(s) => spec.rbd = Some(s),
            VolumeSource::Iscsi(s) => spec.iscsi = Some(s),
            VolumeSource::Cinder(s) => spec.cinder = Some(s),
            VolumeSource::CephFs(s) => spec.cephfs = Some(s),
            VolumeSource::Fc(s) => spec.fc = Some(s),
            VolumeSource::Flocker(s) => spec.flocker = Some(s),
            VolumeSource::FlexVolume(s) => spec.flex_volume = Some(s),
            VolumeSource::AzureFile(s) => spec.azure_file = Some(s),
            VolumeSource::VsphereVolume(s) => spec.vsphere_volume = Some(s),
            VolumeSource::Quobyte(s) => spec.quobyte = Some(s),
            VolumeSource::AzureDisk(s) => spec.azure_disk = Some(s),
            VolumeSource::PhotonPersistentDisk(s) => spec.photon_persistent_disk = Some(s),
        }
    }

    /// Read the source out of a `persistent_volume_source` block.
    ///
    /// # Errors
    /// Fails with [`ExpandError::Conflict`] if several sources are populated, or if the
    /// populated one does not expand.
    pub fn expand_union(node: &ConfigNode) -> Result<Option<VolumeSource>, ExpandError> {
        let populated: Vec<&str> = KEYS
            .iter()
            .copied()
            .filter(|key| matches!(node.block(key), Ok(Some(_))))
            .collect();
        if populated.len() > 1 {
            return Err(ExpandError::Conflict {
                keys: populated.into_iter().map(String::from).collect(),
            });
        }

        let source = expand_block!(node, "gce_persistent_disk", GcePersistentDisk)
            .or(expand_block!(node, "aws_elastic_block_store", AwsElasticBlockStore))
            .or(expand_block!(node, "host_path", HostPath))
            .or(expand_block!(node, "glusterfs", Glusterfs))
            .or(expand_block!(node, "nfs", Nfs))
            .or(expand_block!(node, "rbd", Rbd))
            .or(expand_block!(node, "iscsi", Iscsi))
            .or(expand_block!(node, "cinder", Cinder))
            .or(expand_block!(node, "ceph_fs", CephFs))
            .or(expand_block!(node, "fc", Fc))
            .or(expand_block!(node, "flocker", Flocker))
            .or(expand_block!(node, "flex_volume", FlexVolume))
            .or(expand_block!(node, "azure_file", AzureFile))
            .or(expand_block!(node, "vsphere_volume", VsphereVolume))
            .or(expand_block!(node, "quobyte", Quobyte))
            .or(expand_block!(node, "azure_disk", AzureDisk))
            .or(expand_block!(node, "photon_persistent_disk", PhotonPersistentDisk));
        Ok(source)
    }

    /// Schema of the `persistent_volume_source` block
    #[must_use]
    pub fn schema() -> Schema {
        let source = |schema: Schema, description: &'static str| {
            Field::single_block(schema).describe(description)
        };
        Schema::new()
            .field(
                "gce_persistent_disk",
                source(
                    GCEPersistentDiskVolumeSource::schema(),
                    "GCE disk attached to the host and exposed to the pod",
                ),
            )
            .field(
                "aws_elastic_block_store",
                source(
                    AWSElasticBlockStoreVolumeSource::schema(),
                    "AWS disk attached to the host and exposed to the pod",
                ),
            )
            .field(
                "host_path",
                source(
                    HostPathVolumeSource::schema(),
                    "Existing directory on the host, for development and testing only",
                ),
            )
            .field(
                "glusterfs",
                source(
                    GlusterfsPersistentVolumeSource::schema(),
                    "Glusterfs volume mounted on the host",
                ),
            )
            .field(
                "nfs",
                source(NFSVolumeSource::schema(), "NFS share mounted on the host"),
            )
            .field(
                "rbd",
                source(RBDPersistentVolumeSource::schema(), "Rados block device mount on the host"),
            )
            .field(
                "iscsi",
                source(
                    ISCSIPersistentVolumeSource::schema(),
                    "iSCSI disk attached to the host and exposed to the pod",
                ),
            )
            .field(
                "cinder",
                source(
                    CinderPersistentVolumeSource::schema(),
                    "Cinder volume attached and mounted on the host",
                ),
            )
            .field(
                "ceph_fs",
                source(
                    CephFSPersistentVolumeSource::schema(),
                    "Ceph filesystem mounted on the host",
                ),
            )
            .field(
                "fc",
                source(
                    FCVolumeSource::schema(),
                    "Fibre channel disk attached to the host and exposed to the pod",
                ),
            )
            .field(
                "flocker",
                source(
                    FlockerVolumeSource::schema(),
                    "Flocker volume attached to the host, requires the Flocker control service",
                ),
            )
            .field(
                "flex_volume",
                source(
                    FlexPersistentVolumeSource::schema(),
                    "Generic volume provisioned by an exec based plugin",
                ),
            )
            .field(
                "azure_file",
                source(
                    AzureFilePersistentVolumeSource::schema(),
                    "Azure File Service mount on the host",
                ),
            )
            .field(
                "vsphere_volume",
                source(
                    VsphereVirtualDiskVolumeSource::schema(),
                    "vSphere volume attached and mounted on the host",
                ),
            )
            .field(
                "quobyte",
                source(QuobyteVolumeSource::schema(), "Quobyte mount on the host"),
            )
            .field(
                "azure_disk",
                source(AzureDiskVolumeSource::schema(), "Azure data disk mounted on the host"),
            )
            .field(
                "photon_persistent_disk",
                source(
                    PhotonPersistentDiskVolumeSource::schema(),
                    "Photon Controller persistent disk attached and mounted on the host",
                ),
            )
            .at_most_one_of(&KEYS)
    }
}

/// Flattens into a `persistent_volume_source` block holding the active source
impl Flatten for VolumeSource {
    fn flatten(&self) -> ConfigNode {
        ConfigNode::new().with(self.key(), self.flatten_inner())
    }
}

fn clear_sources(spec: &mut PersistentVolumeSpec) {
    spec.gce_persistent_disk = None;
    spec.aws_elastic_block_store = None;
    spec.host_path = None;
    spec.glusterfs = None;
    spec.nfs = None;
    spec.rbd = None;
    spec.iscsi = None;
    spec.cinder = None;
    spec.cephfs = None;
    spec.fc = None;
    spec.flocker = None;
    spec.flex_volume = None;
    spec.azure_file = None;
    spec.vsphere_volume = None;
    spec.quobyte = None;
    spec.azure_disk = None;
    spec.photon_persistent_disk = None;
}

#[cfg(test)]
mod test {
    use super::*;
    use k8s_intf::bolero::{LegalValue, Normalize};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn sources_set(spec: &PersistentVolumeSpec) -> usize {
        VolumeSource::all_from_spec(spec).len()
    }

    #[test]
    fn test_host_path_union() {
        let config = ConfigNode::new().with("host_path", ConfigNode::new().with("path", "/data"));
        let source = VolumeSource::expand_union(&config).unwrap().unwrap();
        assert_eq!(source.key(), "host_path");

        let mut spec = PersistentVolumeSpec {
            nfs: Some(NFSVolumeSource {
                server: "nfs.example.com".to_string(),
                path: "/exports".to_string(),
                read_only: None,
            }),
            ..Default::default()
        };
        source.apply_to(&mut spec);
        assert_eq!(spec.host_path.as_ref().map(|h| h.path.as_str()), Some("/data"));
        assert_eq!(spec.nfs, None);
        assert_eq!(sources_set(&spec), 1);

        let flattened = VolumeSource::from_spec(&spec).unwrap().flatten();
        assert_eq!(flattened, config);
    }

    #[test]
    fn test_empty_union() {
        assert_eq!(VolumeSource::expand_union(&ConfigNode::new()), Ok(None));
        let config = ConfigNode::new().with("nfs", ConfigNode::new());
        assert_eq!(VolumeSource::expand_union(&config), Ok(None));
        assert_eq!(VolumeSource::from_spec(&PersistentVolumeSpec::default()), None);
    }

    #[test]
    fn test_conflicting_sources() {
        let config = ConfigNode::new()
            .with("host_path", ConfigNode::new().with("path", "/data"))
            .with(
                "nfs",
                ConfigNode::new()
                    .with("server", "nfs.example.com")
                    .with("path", "/exports"),
            );
        let err = VolumeSource::expand_union(&config).unwrap_err();
        assert_eq!(
            err,
            ExpandError::Conflict {
                keys: vec!["host_path".to_string(), "nfs".to_string()]
            }
        );
        assert!(VolumeSource::schema().validate(&config).is_err());
    }

    #[test]
    fn test_nested_errors_are_keyed() {
        let config = ConfigNode::new().with(
            "iscsi",
            ConfigNode::new()
                .with("target_portal", "10.0.0.1:3260")
                .with("iqn", "iqn.2001-04.com.example:storage")
                .with("lun", "first"),
        );
        let err = VolumeSource::expand_union(&config).unwrap_err();
        assert_eq!(err.keys(), vec!["iscsi.lun"]);
    }

    #[test]
    #[traced_test]
    fn test_first_remote_source_wins() {
        let spec = PersistentVolumeSpec {
            host_path: Some(HostPathVolumeSource {
                path: "/data".to_string(),
                type_: None,
            }),
            photon_persistent_disk: Some(PhotonPersistentDiskVolumeSource {
                pd_id: "disk-1".to_string(),
                fs_type: None,
            }),
            ..Default::default()
        };
        let source = VolumeSource::from_spec(&spec).unwrap();
        assert_eq!(source.key(), "host_path");
        assert!(logs_contain("several sources"));
    }

    #[test]
    fn test_keys_match_schema() {
        let schema = VolumeSource::schema();
        assert_eq!(schema.len(), KEYS.len());
        for key in KEYS {
            assert!(schema.get(key).is_some(), "{key}");
        }
    }

    #[test]
    fn test_source_round_trip() {
        bolero::check!()
            .with_type::<LegalValue<PersistentVolumeSpec>>()
            .for_each(|spec| {
                let spec = spec.as_ref();
                let Some(source) = VolumeSource::from_spec(spec) else {
                    panic!("generated spec without a source");
                };
                let config = source.flatten();
                assert_eq!(VolumeSource::schema().validate(&config), Ok(()));
                let expanded = VolumeSource::expand_union(&config).unwrap().unwrap();

                let mut rebuilt = PersistentVolumeSpec::default();
                expanded.apply_to(&mut rebuilt);
                let mut expected = PersistentVolumeSpec::default();
                source.apply_to(&mut expected);
                assert_eq!(rebuilt.normalize(), expected.normalize());
            });
    }
}
