// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Reconciliation of a resource kind backed by a remote API

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use converters::ExpandError;
use k8s_intf::{RemoteApi, RemoteError};
use schema::{ConfigNode, Schema};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::ProviderError;
use crate::state::{Lifecycle, ResourceState};
use crate::wait::{DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT, StateChangeConf, wait_for_state};

/// The provisioning phases of a kind which becomes usable some time after creation
#[derive(Debug, Clone, Copy)]
pub struct Convergence {
    pub pending: &'static [&'static str],
    pub target: &'static [&'static str],
    /// Phases of objects the remote side gave up on
    pub failed: &'static [&'static str],
}

fn holds(phases: &[&str], phase: &str) -> bool {
    phases.iter().any(|candidate| *candidate == phase)
}

/// A kind of remote object managed through configuration
pub trait ResourceKind: Send + Sync + 'static {
    type Object: Clone + Debug + Send + Sync + 'static;

    /// Name the kind is registered under
    const TYPE_NAME: &'static str;

    fn schema() -> Schema;
    fn expand(config: &ConfigNode) -> Result<Self::Object, ExpandError>;
    fn flatten(object: &Self::Object) -> ConfigNode;

    /// Identity of the object, once the remote side accepted it
    fn name(object: &Self::Object) -> Option<&str>;
    fn set_name(object: &mut Self::Object, name: &str);

    /// Provisioning phases waited for on create. Kinds usable right away have none.
    fn convergence() -> Option<Convergence> {
        None
    }

    /// The current provisioning phase of the object
    fn phase(_object: &Self::Object) -> String {
        String::new()
    }
}

/// Result of a presence check
#[derive(Debug, Clone)]
pub enum Existence {
    Present,
    Absent,
    /// The check itself failed
    Unknown(RemoteError),
}

impl Existence {
    /// Split into presence and error, reporting a failed check as present
    #[must_use]
    pub fn into_parts(self) -> (bool, Option<RemoteError>) {
        match self {
            Existence::Present => (true, None),
            Existence::Absent => (false, None),
            Existence::Unknown(err) => (true, Some(err)),
        }
    }
}

/// The callbacks an engine invokes on a resource type
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn schema(&self) -> &Schema;
    async fn create(
        &self,
        config: &ConfigNode,
        cancel: &CancellationToken,
    ) -> Result<ResourceState, ProviderError>;
    async fn read(&self, id: &str) -> Result<ResourceState, ProviderError>;
    async fn update(
        &self,
        state: &mut ResourceState,
        config: &ConfigNode,
    ) -> Result<(), ProviderError>;
    async fn delete(&self, state: &mut ResourceState) -> Result<(), ProviderError>;
    async fn exists(&self, id: &str) -> Existence;
    fn import(&self, id: &str) -> ResourceState {
        ResourceState::imported(id)
    }
}

/// Reconciles configuration of kind `K` with the remote objects behind `remote`
pub struct Reconciler<K: ResourceKind> {
    remote: Arc<dyn RemoteApi<K::Object>>,
    schema: Schema,
    timeout: Duration,
    poll_interval: Duration,
    _kind: PhantomData<K>,
}

impl<K: ResourceKind> Reconciler<K> {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteApi<K::Object>>) -> Self {
        Self {
            remote,
            schema: K::schema(),
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            _kind: PhantomData,
        }
    }

    /// Set how long, and how often, create polls for convergence
    #[must_use]
    pub fn with_wait(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    fn lifecycle_of(object: &K::Object) -> Lifecycle {
        let Some(convergence) = K::convergence() else {
            return Lifecycle::Available;
        };
        let phase = K::phase(object);
        if holds(convergence.failed, &phase) {
            Lifecycle::Error
        } else if holds(convergence.pending, &phase) {
            Lifecycle::Pending
        } else {
            Lifecycle::Available
        }
    }

    async fn converge(&self, id: &str, cancel: &CancellationToken) -> Result<(), ProviderError> {
        let Some(convergence) = K::convergence() else {
            return Ok(());
        };
        let conf = StateChangeConf::new(convergence.pending, convergence.target)
            .with_timeout(self.timeout)
            .with_poll_interval(self.poll_interval);
        wait_for_state(&conf, cancel, || {
            let remote = Arc::clone(&self.remote);
            let id = id.to_string();
            async move {
                let object = remote.get(&id).await?;
                let phase = K::phase(&object);
                debug!("{} {id} is {phase}", K::TYPE_NAME);
                Ok::<_, RemoteError>((object, phase))
            }
        })
        .await?;
        Ok(())
    }

    /// Create the remote object `config` describes, wait for it to be provisioned and
    /// read it back. Nothing is returned if any of this fails.
    pub async fn create(
        &self,
        config: &ConfigNode,
        cancel: &CancellationToken,
    ) -> Result<ResourceState, ProviderError> {
        self.schema.validate(config)?;
        let object = K::expand(config)?;

        let mut state = ResourceState::absent();
        state.transition(Lifecycle::Creating);
        info!("Creating new {}: {object:?}", K::TYPE_NAME);
        let created = self.remote.create(&object).await?;
        let id = K::name(&created)
            .ok_or(ProviderError::MissingIdentity(K::TYPE_NAME))?
            .to_string();
        state.assign_id(&id);
        info!("Submitted new {} {id}", K::TYPE_NAME);

        if K::convergence().is_some() {
            state.transition(Lifecycle::Pending);
        }
        self.converge(&id, cancel).await?;
        info!("{} {id} created", K::TYPE_NAME);

        state.observe(self.read(&id).await?);
        Ok(state)
    }

    /// Observe the remote object `id`
    pub async fn read(&self, id: &str) -> Result<ResourceState, ProviderError> {
        info!("Reading {} {id}", K::TYPE_NAME);
        let object = self.remote.get(id).await.inspect_err(|e| {
            debug!("Failed to read {} {id}: {e}", K::TYPE_NAME);
        })?;
        debug!("Received {} {id}: {object:?}", K::TYPE_NAME);
        Ok(ResourceState::new(
            id,
            K::flatten(&object),
            Self::lifecycle_of(&object),
        ))
    }

    async fn replace(&self, id: &str, config: &ConfigNode) -> Result<ResourceState, ProviderError> {
        self.schema.validate(config)?;
        let mut object = K::expand(config)?;
        // the configured name may be unset if the server generated it
        K::set_name(&mut object, id);
        info!("Updating {}: {object:?}", K::TYPE_NAME);
        self.remote.replace(id, &object).await?;
        info!("Submitted updated {} {id}", K::TYPE_NAME);
        self.read(id).await
    }

    /// Replace the remote object of `state` with the one `config` describes. On failure
    /// the state is kept, marked as errored.
    pub async fn update(
        &self,
        state: &mut ResourceState,
        config: &ConfigNode,
    ) -> Result<(), ProviderError> {
        let id = state
            .id()
            .ok_or(ProviderError::MissingIdentity(K::TYPE_NAME))?
            .to_string();
        state.transition(Lifecycle::Updating);
        match self.replace(&id, config).await {
            Ok(updated) => {
                state.observe(updated);
                Ok(())
            }
            Err(e) => {
                state.transition(Lifecycle::Error);
                Err(e)
            }
        }
    }

    pub async fn delete(&self, state: &mut ResourceState) -> Result<(), ProviderError> {
        let id = state
            .id()
            .ok_or(ProviderError::MissingIdentity(K::TYPE_NAME))?
            .to_string();
        state.transition(Lifecycle::Deleting);
        info!("Deleting {} {id}", K::TYPE_NAME);
        if let Err(e) = self.remote.delete(&id).await {
            state.transition(Lifecycle::Error);
            return Err(e.into());
        }
        info!("{} {id} deleted", K::TYPE_NAME);
        state.clear_id();
        state.transition(Lifecycle::Absent);
        Ok(())
    }

    pub async fn exists(&self, id: &str) -> Existence {
        info!("Checking {} {id}", K::TYPE_NAME);
        match self.remote.get(id).await {
            Ok(_) => Existence::Present,
            Err(e) if e.is_not_found() => Existence::Absent,
            Err(e) => {
                debug!("Failed to check {} {id}: {e}", K::TYPE_NAME);
                Existence::Unknown(e)
            }
        }
    }

    #[must_use]
    pub fn import(&self, id: &str) -> ResourceState {
        ResourceState::imported(id)
    }
}

#[async_trait]
impl<K: ResourceKind> ResourceHandler for Reconciler<K> {
    fn type_name(&self) -> &'static str {
        K::TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(
        &self,
        config: &ConfigNode,
        cancel: &CancellationToken,
    ) -> Result<ResourceState, ProviderError> {
        Reconciler::create(self, config, cancel).await
    }

    async fn read(&self, id: &str) -> Result<ResourceState, ProviderError> {
        Reconciler::read(self, id).await
    }

    async fn update(
        &self,
        state: &mut ResourceState,
        config: &ConfigNode,
    ) -> Result<(), ProviderError> {
        Reconciler::update(self, state, config).await
    }

    async fn delete(&self, state: &mut ResourceState) -> Result<(), ProviderError> {
        Reconciler::delete(self, state).await
    }

    async fn exists(&self, id: &str) -> Existence {
        Reconciler::exists(self, id).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resources::PersistentVolumeKind;
    use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeStatus};

    fn volume_in(phase: Option<&str>) -> PersistentVolume {
        PersistentVolume {
            status: phase.map(|phase| PersistentVolumeStatus {
                phase: Some(phase.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_lifecycle_of_phases() {
        let lifecycle = |phase| Reconciler::<PersistentVolumeKind>::lifecycle_of(&volume_in(phase));
        assert_eq!(lifecycle(None), Lifecycle::Pending);
        assert_eq!(lifecycle(Some("Pending")), Lifecycle::Pending);
        assert_eq!(lifecycle(Some("Available")), Lifecycle::Available);
        assert_eq!(lifecycle(Some("Bound")), Lifecycle::Available);
        assert_eq!(lifecycle(Some("Released")), Lifecycle::Available);
        assert_eq!(lifecycle(Some("Failed")), Lifecycle::Error);
    }

    #[test]
    fn test_existence_parts() {
        assert!(matches!(Existence::Present.into_parts(), (true, None)));
        assert!(matches!(Existence::Absent.into_parts(), (false, None)));
        let err = RemoteError::Api {
            code: 500,
            message: "etcdserver: request timed out".to_string(),
        };
        assert!(matches!(
            Existence::Unknown(err).into_parts(),
            (true, Some(RemoteError::Api { code: 500, .. }))
        ));
    }
}
