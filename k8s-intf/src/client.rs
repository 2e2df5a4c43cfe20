// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The remote control plane, as seen by the reconcilers

use async_trait::async_trait;
use kube::Resource;

use crate::error::RemoteError;

/// CRUD access to the remote objects of kind `K`, keyed by name.
///
/// Implementations are shared between tasks, and must classify a missing object as
/// [`RemoteError::NotFound`].
#[async_trait]
pub trait RemoteApi<K>: Send + Sync
where
    K: Send + Sync,
{
    /// Fetch the object named `name`
    async fn get(&self, name: &str) -> Result<K, RemoteError>;

    /// Submit a new object, returning the object as stored by the remote side
    async fn create(&self, object: &K) -> Result<K, RemoteError>;

    /// Replace the object named `name` as a whole
    async fn replace(&self, name: &str, object: &K) -> Result<K, RemoteError>;

    async fn delete(&self, name: &str) -> Result<(), RemoteError>;
}

/// The name under which an object is submitted: its name, or its name prefix if
/// it relies on server side name generation.
#[must_use]
pub fn submitted_name<K: Resource>(object: &K) -> &str {
    let meta = object.meta();
    meta.name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or(meta.generate_name.as_deref())
        .unwrap_or_default()
}

#[cfg(feature = "client")]
pub use self::kube_client::{KubeApi, install_crypto_provider};

#[cfg(feature = "client")]
mod kube_client {
    use std::fmt::Debug;

    use async_trait::async_trait;
    use kube::api::{DeleteParams, PostParams};
    use kube::{Api, Client, Resource};
    use serde::Serialize;
    use serde::de::DeserializeOwned;
    use tracing::debug;

    use super::{RemoteApi, submitted_name};
    use crate::error::RemoteError;

    /// Install the process wide TLS crypto provider used by the kube client.
    /// Installing it more than once is harmless.
    pub fn install_crypto_provider() {
        if rustls::crypto::aws_lc_rs::default_provider()
            .install_default()
            .is_err()
        {
            debug!("TLS crypto provider was already installed");
        }
    }

    /// [`RemoteApi`] over the Kubernetes API, for cluster scoped resources
    pub struct KubeApi<K> {
        api: Api<K>,
    }

    impl<K> KubeApi<K>
    where
        K: Resource<DynamicType = ()>,
    {
        #[must_use]
        pub fn new(client: Client) -> Self {
            Self {
                api: Api::all(client),
            }
        }
    }

    impl<K> KubeApi<K>
    where
        K: Resource<DynamicType = ()>,
    {
        fn error(name: &str, err: kube::Error) -> RemoteError {
            RemoteError::from_kube(&K::kind(&()), name, err)
        }
    }

    #[async_trait]
    impl<K> RemoteApi<K> for KubeApi<K>
    where
        K: Resource<DynamicType = ()>
            + Clone
            + Debug
            + DeserializeOwned
            + Serialize
            + Send
            + Sync
            + 'static,
    {
        async fn get(&self, name: &str) -> Result<K, RemoteError> {
            self.api
                .get(name)
                .await
                .map_err(|e| Self::error(name, e))
        }

        async fn create(&self, object: &K) -> Result<K, RemoteError> {
            let name = submitted_name(object);
            debug!("Creating {} '{name}'", K::kind(&()));
            self.api
                .create(&PostParams::default(), object)
                .await
                .map_err(|e| Self::error(name, e))
        }

        async fn replace(&self, name: &str, object: &K) -> Result<K, RemoteError> {
            debug!("Replacing {} '{name}'", K::kind(&()));
            self.api
                .replace(name, &PostParams::default(), object)
                .await
                .map_err(|e| Self::error(name, e))
        }

        async fn delete(&self, name: &str) -> Result<(), RemoteError> {
            debug!("Deleting {} '{name}'", K::kind(&()));
            self.api
                .delete(name, &DeleteParams::default())
                .await
                .map(|_| ())
                .map_err(|e| Self::error(name, e))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use k8s_openapi::api::core::v1::PersistentVolume;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_submitted_name() {
        let mut pv = PersistentVolume {
            metadata: ObjectMeta {
                generate_name: Some("pv-".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(submitted_name(&pv), "pv-");
        pv.metadata.name = Some("data".to_string());
        assert_eq!(submitted_name(&pv), "data");
        assert_eq!(submitted_name(&PersistentVolume::default()), "");
    }
}
