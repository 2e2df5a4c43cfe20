// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The resource types of the provider, by type name

use std::collections::BTreeMap;
use std::sync::Arc;

use k8s_intf::client::install_crypto_provider;
use k8s_intf::{KubeApi, RemoteApi};
use k8s_openapi::api::core::v1::PersistentVolume;
use kube::Client;
use kube::config::{KubeConfigOptions, Kubeconfig};
use schema::Schema;
use tracing::info;

use crate::config::ProviderConfig;
use crate::errors::ProviderError;
use crate::logging;
use crate::resource::{Reconciler, ResourceHandler, ResourceKind};
use crate::resources::{AutoscaleSettings, PersistentVolumeKind};

pub struct Provider {
    resources: BTreeMap<&'static str, Box<dyn ResourceHandler>>,
}

impl Provider {
    /// Register every resource type, persistent volumes being reconciled through `volumes`
    #[must_use]
    pub fn new(volumes: Arc<dyn RemoteApi<PersistentVolume>>, config: &ProviderConfig) -> Self {
        let volumes = Reconciler::<PersistentVolumeKind>::new(volumes)
            .with_wait(config.create_timeout(), config.poll_interval());
        let handlers: [Box<dyn ResourceHandler>; 2] =
            [Box::new(volumes), Box::new(AutoscaleSettings::new())];
        Self {
            resources: handlers
                .into_iter()
                .map(|handler| (handler.type_name(), handler))
                .collect(),
        }
    }

    /// Build a provider talking to the cluster `config` points to
    pub async fn connect(config: &ProviderConfig) -> Result<Self, ProviderError> {
        logging::init(&config.log_level);
        install_crypto_provider();
        let client = client(config).await?;
        info!("Connected to the cluster");
        Ok(Self::new(
            Arc::new(KubeApi::<PersistentVolume>::new(client)),
            config,
        ))
    }

    #[must_use]
    pub fn resource(&self, type_name: &str) -> Option<&dyn ResourceHandler> {
        self.resources.get(type_name).map(|handler| &**handler)
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    #[must_use]
    pub fn schema(&self, type_name: &str) -> Option<&Schema> {
        self.resource(type_name).map(ResourceHandler::schema)
    }

    /// The persistent volume type name, for engines addressing it directly
    #[must_use]
    pub fn persistent_volume_type() -> &'static str {
        PersistentVolumeKind::TYPE_NAME
    }
}

async fn client(config: &ProviderConfig) -> Result<Client, ProviderError> {
    let connect = |e: &dyn std::fmt::Display| ProviderError::Connect(e.to_string());
    let options = KubeConfigOptions {
        context: config.context.clone(),
        ..Default::default()
    };
    let kube_config = match &config.kubeconfig {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path).map_err(|e| connect(&e))?;
            kube::Config::from_custom_kubeconfig(kubeconfig, &options)
                .await
                .map_err(|e| connect(&e))?
        }
        None if config.context.is_some() => kube::Config::from_kubeconfig(&options)
            .await
            .map_err(|e| connect(&e))?,
        None => kube::Config::infer().await.map_err(|e| connect(&e))?,
    };
    Client::try_from(kube_config).map_err(|e| connect(&e))
}

#[cfg(test)]
mod test {
    use super::*;
    use k8s_intf::MemoryApi;

    #[test]
    fn test_registered_types() {
        let provider = Provider::new(
            Arc::new(MemoryApi::<PersistentVolume>::new()),
            &ProviderConfig::default(),
        );
        assert_eq!(
            provider.resource_types().collect::<Vec<_>>(),
            vec!["azurerm_autoscale_settings", "kubernetes_persistent_volume"]
        );
        let schema = provider.schema(Provider::persistent_volume_type()).unwrap();
        assert!(schema.get("spec").unwrap().is_required());
        assert!(provider.resource("kubernetes_service").is_none());
    }
}
