// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Legal persistent volumes, restricted to the fields the provider describes in configuration.

use std::collections::BTreeMap;
use std::ops::Bound;

use bolero::{Driver, TypeGenerator, ValueGenerator};
use k8s_openapi::api::core::v1::{
    AWSElasticBlockStoreVolumeSource, AzureDiskVolumeSource, AzureFilePersistentVolumeSource,
    CephFSPersistentVolumeSource, CinderPersistentVolumeSource, FCVolumeSource,
    FlexPersistentVolumeSource, FlockerVolumeSource, GCEPersistentDiskVolumeSource,
    GlusterfsPersistentVolumeSource, HostPathVolumeSource, ISCSIPersistentVolumeSource,
    NFSVolumeSource, ObjectReference, PersistentVolume, PersistentVolumeSpec,
    PhotonPersistentDiskVolumeSource, QuobyteVolumeSource, RBDPersistentVolumeSource,
    SecretReference, VsphereVirtualDiskVolumeSource,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::bolero::support::{
    LabelGenerator, LabelsGenerator, PathGenerator, QuantityGenerator, StringMapGenerator, maybe,
    maybe_bool, maybe_label, norm_opt_list, norm_opt_map, norm_opt_set, norm_set, norm_str,
    one_of,
};
use crate::bolero::{LegalValue, Normalize};

/// Number of volume source kinds a persistent volume may be backed by
pub const VOLUME_SOURCE_KINDS: u8 = 17;

pub const ACCESS_MODES: [&str; 4] = [
    "ReadWriteOnce",
    "ReadOnlyMany",
    "ReadWriteMany",
    "ReadWriteOncePod",
];
pub const RECLAIM_POLICIES: [&str; 3] = ["Retain", "Recycle", "Delete"];
const FS_TYPES: [&str; 3] = ["ext4", "xfs", "ntfs"];

fn label<D: Driver>(d: &mut D) -> Option<String> {
    LabelGenerator::default().generate(d)
}

fn maybe_fs_type<D: Driver>(d: &mut D) -> Option<Option<String>> {
    maybe(d, |d| one_of(d, &FS_TYPES))
}

fn maybe_partition<D: Driver>(d: &mut D) -> Option<Option<i32>> {
    maybe(d, |d| d.gen_i32(Bound::Included(&0), Bound::Included(&15)))
}

fn maybe_secret<D: Driver>(d: &mut D) -> Option<Option<SecretReference>> {
    maybe(d, |d| d.produce::<LegalValue<SecretReference>>().map(LegalValue::take))
}

/// A secret reference naming nothing describes nothing
fn norm_secret(secret: Option<&SecretReference>) -> Option<SecretReference> {
    secret
        .map(Normalize::normalize)
        .filter(|s| s.name.is_some() || s.namespace.is_some())
}

impl TypeGenerator for LegalValue<SecretReference> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(SecretReference {
            name: Some(label(d)?),
            namespace: maybe_label(d)?,
        }))
    }
}

impl Normalize for SecretReference {
    fn normalize(&self) -> Self {
        SecretReference {
            name: norm_str(self.name.as_ref()),
            namespace: norm_str(self.namespace.as_ref()),
        }
    }
}

impl TypeGenerator for LegalValue<ObjectReference> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(ObjectReference {
            api_version: maybe(d, |_| Some("v1".to_string()))?,
            field_path: maybe_label(d)?,
            kind: maybe(d, |_| Some("PersistentVolumeClaim".to_string()))?,
            name: Some(label(d)?),
            namespace: maybe_label(d)?,
            resource_version: maybe(d, |d| {
                d.gen_u32(Bound::Included(&1), Bound::Unbounded)
                    .map(|v| v.to_string())
            })?,
            uid: maybe_label(d)?,
        }))
    }
}

impl Normalize for ObjectReference {
    fn normalize(&self) -> Self {
        ObjectReference {
            api_version: norm_str(self.api_version.as_ref()),
            field_path: norm_str(self.field_path.as_ref()),
            kind: norm_str(self.kind.as_ref()),
            name: norm_str(self.name.as_ref()),
            namespace: norm_str(self.namespace.as_ref()),
            resource_version: norm_str(self.resource_version.as_ref()),
            uid: norm_str(self.uid.as_ref()),
        }
    }
}

impl TypeGenerator for LegalValue<GCEPersistentDiskVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(GCEPersistentDiskVolumeSource {
            fs_type: maybe_fs_type(d)?,
            partition: maybe_partition(d)?,
            pd_name: label(d)?,
            read_only: maybe_bool(d)?,
        }))
    }
}

impl Normalize for GCEPersistentDiskVolumeSource {
    fn normalize(&self) -> Self {
        GCEPersistentDiskVolumeSource {
            fs_type: norm_str(self.fs_type.as_ref()),
            ..self.clone()
        }
    }
}

impl TypeGenerator for LegalValue<AWSElasticBlockStoreVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(AWSElasticBlockStoreVolumeSource {
            fs_type: maybe_fs_type(d)?,
            partition: maybe_partition(d)?,
            read_only: maybe_bool(d)?,
            volume_id: format!("vol-{}", label(d)?),
        }))
    }
}

impl Normalize for AWSElasticBlockStoreVolumeSource {
    fn normalize(&self) -> Self {
        AWSElasticBlockStoreVolumeSource {
            fs_type: norm_str(self.fs_type.as_ref()),
            ..self.clone()
        }
    }
}

impl TypeGenerator for LegalValue<HostPathVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(HostPathVolumeSource {
            path: PathGenerator.generate(d)?,
            type_: maybe(d, |d| {
                one_of(d, &["DirectoryOrCreate", "Directory", "FileOrCreate", "File"])
            })?,
        }))
    }
}

impl Normalize for HostPathVolumeSource {
    fn normalize(&self) -> Self {
        HostPathVolumeSource {
            path: self.path.clone(),
            type_: norm_str(self.type_.as_ref()),
        }
    }
}

impl TypeGenerator for LegalValue<GlusterfsPersistentVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(GlusterfsPersistentVolumeSource {
            endpoints: label(d)?,
            endpoints_namespace: maybe_label(d)?,
            path: label(d)?,
            read_only: maybe_bool(d)?,
        }))
    }
}

impl Normalize for GlusterfsPersistentVolumeSource {
    fn normalize(&self) -> Self {
        GlusterfsPersistentVolumeSource {
            endpoints_namespace: norm_str(self.endpoints_namespace.as_ref()),
            ..self.clone()
        }
    }
}

impl TypeGenerator for LegalValue<NFSVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(NFSVolumeSource {
            path: PathGenerator.generate(d)?,
            read_only: maybe_bool(d)?,
            server: format!("{}.example.com", label(d)?),
        }))
    }
}

impl Normalize for NFSVolumeSource {
    fn normalize(&self) -> Self {
        self.clone()
    }
}

impl TypeGenerator for LegalValue<RBDPersistentVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(RBDPersistentVolumeSource {
            fs_type: maybe_fs_type(d)?,
            image: label(d)?,
            keyring: maybe(d, |d| PathGenerator.generate(d))?,
            monitors: LabelsGenerator::new(1, 4).generate(d)?,
            pool: maybe_label(d)?,
            read_only: maybe_bool(d)?,
            secret_ref: maybe_secret(d)?,
            user: maybe_label(d)?,
        }))
    }
}

impl Normalize for RBDPersistentVolumeSource {
    fn normalize(&self) -> Self {
        RBDPersistentVolumeSource {
            fs_type: norm_str(self.fs_type.as_ref()),
            image: self.image.clone(),
            keyring: norm_str(self.keyring.as_ref()),
            monitors: norm_set(&self.monitors),
            pool: norm_str(self.pool.as_ref()),
            read_only: self.read_only,
            secret_ref: norm_secret(self.secret_ref.as_ref()),
            user: norm_str(self.user.as_ref()),
        }
    }
}

impl TypeGenerator for LegalValue<ISCSIPersistentVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(ISCSIPersistentVolumeSource {
            chap_auth_discovery: maybe_bool(d)?,
            chap_auth_session: maybe_bool(d)?,
            fs_type: maybe_fs_type(d)?,
            initiator_name: maybe(d, |d| label(d).map(|l| format!("iqn.2001-04.com.example:{l}")))?,
            iqn: format!("iqn.2001-04.com.example:{}", label(d)?),
            iscsi_interface: maybe_label(d)?,
            lun: d.gen_i32(Bound::Included(&0), Bound::Included(&255))?,
            portals: maybe(d, |d| LabelsGenerator::new(1, 3).generate(d))?,
            read_only: maybe_bool(d)?,
            secret_ref: maybe_secret(d)?,
            target_portal: format!("{}:3260", label(d)?),
        }))
    }
}

impl Normalize for ISCSIPersistentVolumeSource {
    fn normalize(&self) -> Self {
        ISCSIPersistentVolumeSource {
            fs_type: norm_str(self.fs_type.as_ref()),
            initiator_name: norm_str(self.initiator_name.as_ref()),
            iscsi_interface: norm_str(self.iscsi_interface.as_ref()),
            portals: norm_opt_list(self.portals.as_ref()),
            secret_ref: norm_secret(self.secret_ref.as_ref()),
            ..self.clone()
        }
    }
}

impl TypeGenerator for LegalValue<CinderPersistentVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(CinderPersistentVolumeSource {
            fs_type: maybe_fs_type(d)?,
            read_only: maybe_bool(d)?,
            secret_ref: maybe_secret(d)?,
            volume_id: label(d)?,
        }))
    }
}

impl Normalize for CinderPersistentVolumeSource {
    fn normalize(&self) -> Self {
        CinderPersistentVolumeSource {
            fs_type: norm_str(self.fs_type.as_ref()),
            read_only: self.read_only,
            secret_ref: norm_secret(self.secret_ref.as_ref()),
            volume_id: self.volume_id.clone(),
        }
    }
}

impl TypeGenerator for LegalValue<CephFSPersistentVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(CephFSPersistentVolumeSource {
            monitors: LabelsGenerator::new(1, 4).generate(d)?,
            path: maybe(d, |d| PathGenerator.generate(d))?,
            read_only: maybe_bool(d)?,
            secret_file: maybe(d, |d| PathGenerator.generate(d))?,
            secret_ref: maybe_secret(d)?,
            user: maybe_label(d)?,
        }))
    }
}

impl Normalize for CephFSPersistentVolumeSource {
    fn normalize(&self) -> Self {
        CephFSPersistentVolumeSource {
            monitors: norm_set(&self.monitors),
            path: norm_str(self.path.as_ref()),
            read_only: self.read_only,
            secret_file: norm_str(self.secret_file.as_ref()),
            secret_ref: norm_secret(self.secret_ref.as_ref()),
            user: norm_str(self.user.as_ref()),
        }
    }
}

impl TypeGenerator for LegalValue<FCVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(FCVolumeSource {
            fs_type: maybe_fs_type(d)?,
            lun: Some(d.gen_i32(Bound::Included(&0), Bound::Included(&255))?),
            read_only: maybe_bool(d)?,
            target_wwns: Some(LabelsGenerator::new(1, 4).generate(d)?),
            wwids: None,
        }))
    }
}

impl Normalize for FCVolumeSource {
    fn normalize(&self) -> Self {
        FCVolumeSource {
            fs_type: norm_str(self.fs_type.as_ref()),
            lun: self.lun,
            read_only: self.read_only,
            target_wwns: norm_opt_set(self.target_wwns.as_ref()),
            wwids: norm_opt_set(self.wwids.as_ref()),
        }
    }
}

impl TypeGenerator for LegalValue<FlockerVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(FlockerVolumeSource {
            dataset_name: Some(label(d)?),
            dataset_uuid: maybe_label(d)?,
        }))
    }
}

impl Normalize for FlockerVolumeSource {
    fn normalize(&self) -> Self {
        FlockerVolumeSource {
            dataset_name: norm_str(self.dataset_name.as_ref()),
            dataset_uuid: norm_str(self.dataset_uuid.as_ref()),
        }
    }
}

impl TypeGenerator for LegalValue<FlexPersistentVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(FlexPersistentVolumeSource {
            driver: format!("example.com/{}", label(d)?),
            fs_type: maybe_fs_type(d)?,
            options: maybe(d, |d| StringMapGenerator::new(4).generate(d))?,
            read_only: maybe_bool(d)?,
            secret_ref: maybe_secret(d)?,
        }))
    }
}

impl Normalize for FlexPersistentVolumeSource {
    fn normalize(&self) -> Self {
        FlexPersistentVolumeSource {
            driver: self.driver.clone(),
            fs_type: norm_str(self.fs_type.as_ref()),
            options: norm_opt_map(self.options.as_ref()),
            read_only: self.read_only,
            secret_ref: norm_secret(self.secret_ref.as_ref()),
        }
    }
}

impl TypeGenerator for LegalValue<AzureFilePersistentVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(AzureFilePersistentVolumeSource {
            read_only: maybe_bool(d)?,
            secret_name: label(d)?,
            secret_namespace: maybe_label(d)?,
            share_name: label(d)?,
        }))
    }
}

impl Normalize for AzureFilePersistentVolumeSource {
    fn normalize(&self) -> Self {
        AzureFilePersistentVolumeSource {
            secret_namespace: norm_str(self.secret_namespace.as_ref()),
            ..self.clone()
        }
    }
}

impl TypeGenerator for LegalValue<VsphereVirtualDiskVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(VsphereVirtualDiskVolumeSource {
            fs_type: maybe_fs_type(d)?,
            storage_policy_id: maybe_label(d)?,
            storage_policy_name: maybe_label(d)?,
            volume_path: format!("[datastore] {}", label(d)?),
        }))
    }
}

impl Normalize for VsphereVirtualDiskVolumeSource {
    fn normalize(&self) -> Self {
        VsphereVirtualDiskVolumeSource {
            fs_type: norm_str(self.fs_type.as_ref()),
            storage_policy_id: norm_str(self.storage_policy_id.as_ref()),
            storage_policy_name: norm_str(self.storage_policy_name.as_ref()),
            volume_path: self.volume_path.clone(),
        }
    }
}

impl TypeGenerator for LegalValue<QuobyteVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(QuobyteVolumeSource {
            group: maybe_label(d)?,
            read_only: maybe_bool(d)?,
            registry: format!("{}:7861", label(d)?),
            tenant: maybe_label(d)?,
            user: maybe_label(d)?,
            volume: label(d)?,
        }))
    }
}

impl Normalize for QuobyteVolumeSource {
    fn normalize(&self) -> Self {
        QuobyteVolumeSource {
            group: norm_str(self.group.as_ref()),
            tenant: norm_str(self.tenant.as_ref()),
            user: norm_str(self.user.as_ref()),
            ..self.clone()
        }
    }
}

impl TypeGenerator for LegalValue<AzureDiskVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        let disk_name = label(d)?;
        Some(LegalValue(AzureDiskVolumeSource {
            caching_mode: maybe(d, |d| one_of(d, &["None", "ReadOnly", "ReadWrite"]))?,
            disk_uri: format!("https://example.blob.core.windows.net/vhds/{disk_name}.vhd"),
            disk_name,
            fs_type: maybe_fs_type(d)?,
            kind: maybe(d, |d| one_of(d, &["Shared", "Dedicated", "Managed"]))?,
            read_only: maybe_bool(d)?,
        }))
    }
}

impl Normalize for AzureDiskVolumeSource {
    fn normalize(&self) -> Self {
        AzureDiskVolumeSource {
            caching_mode: norm_str(self.caching_mode.as_ref()),
            fs_type: norm_str(self.fs_type.as_ref()),
            kind: norm_str(self.kind.as_ref()),
            ..self.clone()
        }
    }
}

impl TypeGenerator for LegalValue<PhotonPersistentDiskVolumeSource> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(PhotonPersistentDiskVolumeSource {
            fs_type: maybe_fs_type(d)?,
            pd_id: label(d)?,
        }))
    }
}

impl Normalize for PhotonPersistentDiskVolumeSource {
    fn normalize(&self) -> Self {
        PhotonPersistentDiskVolumeSource {
            fs_type: norm_str(self.fs_type.as_ref()),
            pd_id: self.pd_id.clone(),
        }
    }
}

fn legal<D: Driver, T>(d: &mut D) -> Option<Option<T>>
where
    LegalValue<T>: TypeGenerator,
{
    d.produce::<LegalValue<T>>().map(|v| Some(v.take()))
}

/// Populate exactly one of the volume sources of `spec`, in their declaration order
fn set_volume_source<D: Driver>(d: &mut D, spec: &mut PersistentVolumeSpec) -> Option<()> {
    let kind = d.gen_u8(Bound::Included(&0), Bound::Excluded(&VOLUME_SOURCE_KINDS))?;
    match kind {
        0 => spec.gce_persistent_disk = legal(d)?,
        1 => spec.aws_elastic_block_store = legal(d)?,
        2 => spec.host_path = legal(d)?,
        3 => spec.glusterfs = legal(d)?,
        4 => spec.nfs = legal(d)?,
        5 => spec.rbd = legal(d)?,
        6 => spec.iscsi = legal(d)?,
        7 => spec.cinder = legal(d)?,
        8 => spec.cephfs = legal(d)?,
        9 => spec.fc = legal(d)?,
        10 => spec.flocker = legal(d)?,
        11 => spec.flex_volume = legal(d)?,
        12 => spec.azure_file = legal(d)?,
        13 => spec.vsphere_volume = legal(d)?,
        14 => spec.quobyte = legal(d)?,
        15 => spec.azure_disk = legal(d)?,
        _ => spec.photon_persistent_disk = legal(d)?,
    }
    Some(())
}

impl TypeGenerator for LegalValue<PersistentVolumeSpec> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        let modes = d.gen_u8(Bound::Included(&1), Bound::Included(&3))?;
        let access_modes = (0..modes)
            .map(|_| one_of(d, &ACCESS_MODES))
            .collect::<Option<Vec<_>>>()?;
        let capacity = BTreeMap::from([(
            "storage".to_string(),
            Quantity(QuantityGenerator.generate(d)?),
        )]);

        let mut spec = PersistentVolumeSpec {
            access_modes: Some(access_modes),
            capacity: Some(capacity),
            claim_ref: maybe(d, |d| {
                d.produce::<LegalValue<ObjectReference>>()
                    .map(LegalValue::take)
            })?,
            mount_options: maybe(d, |d| LabelsGenerator::new(1, 3).generate(d))?,
            persistent_volume_reclaim_policy: maybe(d, |d| one_of(d, &RECLAIM_POLICIES))?,
            storage_class_name: maybe_label(d)?,
            ..Default::default()
        };
        set_volume_source(d, &mut spec)?;
        Some(LegalValue(spec))
    }
}

impl Normalize for PersistentVolumeSpec {
    fn normalize(&self) -> Self {
        PersistentVolumeSpec {
            access_modes: norm_opt_set(self.access_modes.as_ref()),
            aws_elastic_block_store: self.aws_elastic_block_store.normalize(),
            azure_disk: self.azure_disk.normalize(),
            azure_file: self.azure_file.normalize(),
            capacity: self.capacity.clone().filter(|c| !c.is_empty()),
            cephfs: self.cephfs.normalize(),
            cinder: self.cinder.normalize(),
            claim_ref: self
                .claim_ref
                .normalize()
                .filter(|r| *r != ObjectReference::default()),
            fc: self.fc.normalize(),
            flex_volume: self.flex_volume.normalize(),
            flocker: self.flocker.normalize(),
            gce_persistent_disk: self.gce_persistent_disk.normalize(),
            glusterfs: self.glusterfs.normalize(),
            host_path: self.host_path.normalize(),
            iscsi: self.iscsi.normalize(),
            mount_options: norm_opt_set(self.mount_options.as_ref()),
            nfs: self.nfs.normalize(),
            persistent_volume_reclaim_policy: norm_str(
                self.persistent_volume_reclaim_policy.as_ref(),
            ),
            photon_persistent_disk: self.photon_persistent_disk.normalize(),
            quobyte: self.quobyte.normalize(),
            rbd: self.rbd.normalize(),
            storage_class_name: norm_str(self.storage_class_name.as_ref()),
            vsphere_volume: self.vsphere_volume.normalize(),
            ..self.clone()
        }
    }
}

impl TypeGenerator for LegalValue<ObjectMeta> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(ObjectMeta {
            name: Some(label(d)?),
            labels: maybe(d, |d| StringMapGenerator::new(4).generate(d))?,
            annotations: maybe(d, |d| StringMapGenerator::new(4).generate(d))?,
            ..Default::default()
        }))
    }
}

/// Only the metadata set by users survives. The fields the server fills in
/// (identifiers, versions, timestamps) are dropped.
impl Normalize for ObjectMeta {
    fn normalize(&self) -> Self {
        ObjectMeta {
            name: norm_str(self.name.as_ref()),
            generate_name: norm_str(self.generate_name.as_ref()),
            labels: norm_opt_map(self.labels.as_ref()),
            annotations: norm_opt_map(self.annotations.as_ref()),
            ..Default::default()
        }
    }
}

impl TypeGenerator for LegalValue<PersistentVolume> {
    fn generate<D: Driver>(d: &mut D) -> Option<Self> {
        Some(LegalValue(PersistentVolume {
            metadata: d.produce::<LegalValue<ObjectMeta>>()?.take(),
            spec: Some(d.produce::<LegalValue<PersistentVolumeSpec>>()?.take()),
            status: None,
        }))
    }
}

/// Status is observed, never configured, and is dropped as well.
impl Normalize for PersistentVolume {
    fn normalize(&self) -> Self {
        PersistentVolume {
            metadata: self.metadata.normalize(),
            spec: self.spec.normalize(),
            status: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn populated_sources(spec: &PersistentVolumeSpec) -> usize {
        [
            spec.gce_persistent_disk.is_some(),
            spec.aws_elastic_block_store.is_some(),
            spec.host_path.is_some(),
            spec.glusterfs.is_some(),
            spec.nfs.is_some(),
            spec.rbd.is_some(),
            spec.iscsi.is_some(),
            spec.cinder.is_some(),
            spec.cephfs.is_some(),
            spec.fc.is_some(),
            spec.flocker.is_some(),
            spec.flex_volume.is_some(),
            spec.azure_file.is_some(),
            spec.vsphere_volume.is_some(),
            spec.quobyte.is_some(),
            spec.azure_disk.is_some(),
            spec.photon_persistent_disk.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    #[test]
    fn test_legal_volumes_have_one_source() {
        bolero::check!()
            .with_type::<LegalValue<PersistentVolume>>()
            .for_each(|pv| {
                let pv = pv.as_ref();
                let spec = pv.spec.as_ref().unwrap();
                assert_eq!(populated_sources(spec), 1);
                assert!(!spec.access_modes.as_ref().unwrap().is_empty());
                assert!(pv.metadata.name.is_some());
                assert_eq!(pv.normalize(), pv.normalize().normalize());
            });
    }
}
