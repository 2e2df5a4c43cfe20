// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! `azurerm_autoscale_settings`
//!
//! No remote API backs this resource: its name is its identity, and its state is what
//! was last configured.

use async_trait::async_trait;
use schema::{ConfigNode, Field, Schema};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::errors::ProviderError;
use crate::resource::{Existence, ResourceHandler};
use crate::state::{Lifecycle, ResourceState};

pub const TYPE_NAME: &str = "azurerm_autoscale_settings";

pub struct AutoscaleSettings {
    schema: Schema,
}

impl Default for AutoscaleSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoscaleSettings {
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: Schema::new().field(
                "name",
                Field::string()
                    .required()
                    .force_new()
                    .describe("Name of the autoscale settings"),
            ),
        }
    }

    fn create_or_update(&self, config: &ConfigNode) -> Result<ResourceState, ProviderError> {
        self.schema.validate(config)?;
        let name = config
            .str("name")
            .map_err(converters::ExpandError::from)?
            .ok_or(ProviderError::MissingIdentity(TYPE_NAME))?;
        info!("Recording {TYPE_NAME} {name}");
        Ok(ResourceState::new(
            name,
            config.clone(),
            Lifecycle::Available,
        ))
    }
}

#[async_trait]
impl ResourceHandler for AutoscaleSettings {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn create(
        &self,
        config: &ConfigNode,
        _cancel: &CancellationToken,
    ) -> Result<ResourceState, ProviderError> {
        self.create_or_update(config)
    }

    async fn read(&self, id: &str) -> Result<ResourceState, ProviderError> {
        Ok(ResourceState::new(
            id,
            ConfigNode::new().with("name", id),
            Lifecycle::Available,
        ))
    }

    async fn update(
        &self,
        state: &mut ResourceState,
        config: &ConfigNode,
    ) -> Result<(), ProviderError> {
        state.transition(Lifecycle::Updating);
        match self.create_or_update(config) {
            Ok(updated) => {
                *state = updated;
                Ok(())
            }
            Err(e) => {
                state.transition(Lifecycle::Error);
                Err(e)
            }
        }
    }

    async fn delete(&self, state: &mut ResourceState) -> Result<(), ProviderError> {
        state.transition(Lifecycle::Deleting);
        state.clear_id();
        state.transition(Lifecycle::Absent);
        Ok(())
    }

    async fn exists(&self, _id: &str) -> Existence {
        Existence::Present
    }
}
