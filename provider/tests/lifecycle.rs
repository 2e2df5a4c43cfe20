// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Persistent volume lifecycles against the in-memory backend

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use iac_provider::resources::PersistentVolumeKind;
use iac_provider::{
    Existence, Lifecycle, Provider, ProviderConfig, ProviderError, Reconciler, ResourceHandler,
    WaitError,
};
use k8s_intf::{MemoryApi, RemoteError};
use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeStatus};
use pretty_assertions::assert_eq;
use schema::{ConfigNode, Value};
use tokio_util::sync::CancellationToken;

/// A backend on which volumes become available on their `reads`-th read
fn backend(reads: usize) -> Arc<MemoryApi<PersistentVolume>> {
    Arc::new(MemoryApi::new().with_observer(move |pv: &mut PersistentVolume, read| {
        if read >= reads {
            pv.status = Some(PersistentVolumeStatus {
                phase: Some("Available".to_string()),
                ..Default::default()
            });
        }
    }))
}

fn reconciler(api: &Arc<MemoryApi<PersistentVolume>>) -> Reconciler<PersistentVolumeKind> {
    Reconciler::<PersistentVolumeKind>::new(api.clone())
}

fn metadata(name: &str) -> ConfigNode {
    ConfigNode::new().with("name", name)
}

fn spec(storage: &str) -> ConfigNode {
    ConfigNode::new()
        .with(
            "capacity",
            BTreeMap::from([("storage".to_string(), storage.to_string())]),
        )
        .with(
            "access_modes",
            Value::Set(["ReadWriteOnce".to_string()].into_iter().collect()),
        )
        .with(
            "persistent_volume_source",
            ConfigNode::new().with("host_path", ConfigNode::new().with("path", "/data")),
        )
}

fn volume(metadata: ConfigNode, spec: ConfigNode) -> ConfigNode {
    ConfigNode::new()
        .with("metadata", metadata)
        .with("spec", spec)
}

#[tokio::test(start_paused = true)]
async fn test_create_waits_for_available() {
    let api = backend(3);
    let volumes = reconciler(&api);
    let state = volumes
        .create(&volume(metadata("data"), spec("10Gi")), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(state.id(), Some("data"));
    assert_eq!(state.lifecycle(), Lifecycle::Available);
    assert_eq!(state.config().block("spec").unwrap(), Some(&spec("10Gi")));
    let metadata = state.config().block("metadata").unwrap().unwrap();
    assert_eq!(metadata.str("name"), Ok(Some("data")));
    assert!(metadata.str("uid").unwrap().is_some());
    assert_eq!(api.peek("data").unwrap().status.unwrap().phase.as_deref(), Some("Available"));
}

#[tokio::test(start_paused = true)]
async fn test_create_times_out() {
    let api = backend(usize::MAX);
    let volumes = reconciler(&api).with_wait(Duration::from_secs(30), Duration::from_secs(1));
    let err = volumes
        .create(&volume(metadata("data"), spec("10Gi")), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Convergence(WaitError::Timeout { ref last_state, .. })
            if last_state.as_deref() == Some("Pending")
    ));
}

#[tokio::test(start_paused = true)]
async fn test_create_can_be_cancelled() {
    let api = backend(usize::MAX);
    let volumes = reconciler(&api);
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        canceller.cancel();
    });
    let err = volumes
        .create(&volume(metadata("data"), spec("10Gi")), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Convergence(WaitError::Cancelled { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_generated_name_becomes_the_identity() {
    let api = backend(1);
    let volumes = reconciler(&api);
    let config = volume(ConfigNode::new().with("generate_name", "pv-"), spec("1Gi"));
    let state = volumes
        .create(&config, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(state.id(), Some("pv-00001"));
    assert!(api.contains("pv-00001"));
}

#[tokio::test]
async fn test_invalid_configuration_is_not_submitted() {
    let api = backend(1);
    let volumes = reconciler(&api);
    let err = volumes
        .create(&volume(metadata("data"), ConfigNode::new()), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation(_)));

    let err = volumes
        .create(&volume(metadata("data"), spec("lots")), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::Expand(ref e) if e.keys() == vec!["spec.capacity.storage"]
    ));
    assert!(api.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_update_keeps_identity() {
    let api = backend(1);
    let volumes = reconciler(&api);
    let config = volume(ConfigNode::new().with("generate_name", "pv-"), spec("1Gi"));
    let mut state = volumes
        .create(&config, &CancellationToken::new())
        .await
        .unwrap();

    let resized = volume(ConfigNode::new().with("generate_name", "pv-"), spec("2Gi"));
    volumes.update(&mut state, &resized).await.unwrap();
    assert_eq!(state.id(), Some("pv-00001"));
    assert_eq!(state.config().block("spec").unwrap(), Some(&spec("2Gi")));
    assert_eq!(api.len(), 1);

    api.fail_next(RemoteError::Api {
        code: 500,
        message: "etcdserver: request timed out".to_string(),
    });
    let err = volumes.update(&mut state, &config).await.unwrap_err();
    assert!(matches!(err, ProviderError::Remote(RemoteError::Api { code: 500, .. })));
    assert_eq!(state.id(), Some("pv-00001"));
    assert_eq!(state.lifecycle(), Lifecycle::Error);
}

#[tokio::test(start_paused = true)]
async fn test_delete_then_read() {
    let api = backend(1);
    let volumes = reconciler(&api);
    let mut state = volumes
        .create(&volume(metadata("data"), spec("10Gi")), &CancellationToken::new())
        .await
        .unwrap();

    volumes.delete(&mut state).await.unwrap();
    assert_eq!(state.id(), None);
    assert_eq!(state.lifecycle(), Lifecycle::Absent);

    let err = volumes.read("data").await.unwrap_err();
    assert!(err.is_not_found());

    let mut stale = volumes.import("data");
    let err = volumes.delete(&mut stale).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_exists() {
    let api = backend(1);
    let volumes = reconciler(&api);
    assert!(matches!(volumes.exists("data").await, Existence::Absent));
    assert!(!volumes.exists("data").await.into_parts().0);

    let mut pv = PersistentVolume::default();
    pv.metadata.name = Some("data".to_string());
    api.insert(pv);
    assert!(matches!(volumes.exists("data").await, Existence::Present));

    api.fail_next(RemoteError::Api {
        code: 403,
        message: "forbidden".to_string(),
    });
    let (present, err) = volumes.exists("data").await.into_parts();
    assert!(present);
    assert!(matches!(err, Some(RemoteError::Api { code: 403, .. })));
}

#[tokio::test]
async fn test_failed_volume_reads_as_errored() {
    let api = Arc::new(MemoryApi::<PersistentVolume>::new());
    let volumes = reconciler(&api);
    let mut pv = PersistentVolume::default();
    pv.metadata.name = Some("data".to_string());
    pv.status = Some(PersistentVolumeStatus {
        phase: Some("Failed".to_string()),
        ..Default::default()
    });
    api.insert(pv);

    let state = volumes.read("data").await.unwrap();
    assert_eq!(state.id(), Some("data"));
    assert_eq!(state.lifecycle(), Lifecycle::Error);
}

#[tokio::test(start_paused = true)]
async fn test_import_then_read() {
    let api = backend(1);
    let volumes = reconciler(&api);
    volumes
        .create(&volume(metadata("data"), spec("10Gi")), &CancellationToken::new())
        .await
        .unwrap();

    let imported = volumes.import("data");
    assert!(imported.config().is_empty());
    let state = volumes.read(imported.id().unwrap()).await.unwrap();
    assert_eq!(state.config().block("spec").unwrap(), Some(&spec("10Gi")));
}

#[tokio::test(start_paused = true)]
async fn test_provider_dispatch() {
    let api = backend(2);
    let config = ProviderConfig::default();
    let provider = Provider::new(api.clone(), &config);
    let volumes = provider
        .resource(Provider::persistent_volume_type())
        .unwrap();
    let mut state = volumes
        .create(&volume(metadata("data"), spec("10Gi")), &CancellationToken::new())
        .await
        .unwrap();
    assert!(api.contains("data"));
    volumes.delete(&mut state).await.unwrap();
    assert!(api.is_empty());

    let settings = provider.resource("azurerm_autoscale_settings").unwrap();
    let state = settings
        .create(&ConfigNode::new().with("name", "web"), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(state.id(), Some("web"));
}
