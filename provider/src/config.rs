// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Provider configuration

use std::time::Duration;

use derive_builder::Builder;
use serde::Deserialize;

use crate::errors::ProviderError;

const DEFAULT_CREATE_TIMEOUT_SECS: u64 = 300;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

fn default_create_timeout_secs() -> u64 {
    DEFAULT_CREATE_TIMEOUT_SECS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Builder, Clone, Debug, Deserialize, PartialEq, Eq)]
#[builder(default)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Path of the kubeconfig file. The usual lookup (in-cluster or `KUBECONFIG`)
    /// applies if unset.
    #[builder(setter(into, strip_option))]
    #[serde(default)]
    pub kubeconfig: Option<String>,
    /// Kubeconfig context to use instead of the current one
    #[builder(setter(into, strip_option))]
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default = "default_create_timeout_secs")]
    pub create_timeout_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Default log filter, overridden by `RUST_LOG`
    #[builder(setter(into))]
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kubeconfig: None,
            context: None,
            create_timeout_secs: DEFAULT_CREATE_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            log_level: default_log_level(),
        }
    }
}

impl ProviderConfig {
    /// Load the configuration from a YAML or JSON file
    pub fn load(path: &str) -> Result<Self, ProviderError> {
        Ok(schema::load_from_file(path)?)
    }

    #[must_use]
    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_builder_defaults() {
        let config = ProviderConfigBuilder::default()
            .context("kind-dev")
            .poll_interval_ms(250_u64)
            .build()
            .unwrap();
        assert_eq!(config.context.as_deref(), Some("kind-dev"));
        assert_eq!(config.kubeconfig, None);
        assert_eq!(config.create_timeout(), Duration::from_secs(300));
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_yaml() {
        let path =
            std::env::temp_dir().join(format!("provider-config-{}.yaml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"kubeconfig: /etc/kube/config\ncreate_timeout_secs: 60\n")
            .unwrap();
        let config = ProviderConfig::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            config,
            ProviderConfig {
                kubeconfig: Some("/etc/kube/config".to_string()),
                create_timeout_secs: 60,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let json = serde_json::json!({ "namespace": "default" });
        assert!(serde_json::from_value::<ProviderConfig>(json).is_err());
    }
}
