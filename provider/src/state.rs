// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! What the provider knows about one resource between two callbacks

use std::fmt::Display;

use schema::ConfigNode;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Absent,
    Creating,
    Pending,
    Available,
    Updating,
    Deleting,
    Error,
}

impl Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Lifecycle::Absent => "absent",
            Lifecycle::Creating => "creating",
            Lifecycle::Pending => "pending",
            Lifecycle::Available => "available",
            Lifecycle::Updating => "updating",
            Lifecycle::Deleting => "deleting",
            Lifecycle::Error => "error",
        };
        f.write_str(name)
    }
}

/// Identity, last observed configuration and lifecycle of a resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState {
    id: Option<String>,
    config: ConfigNode,
    lifecycle: Lifecycle,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self::absent()
    }
}

impl ResourceState {
    #[must_use]
    pub fn new(id: &str, config: ConfigNode, lifecycle: Lifecycle) -> Self {
        Self {
            id: Some(id.to_string()),
            config,
            lifecycle,
        }
    }

    /// A resource which does not exist (yet)
    #[must_use]
    pub fn absent() -> Self {
        Self {
            id: None,
            config: ConfigNode::new(),
            lifecycle: Lifecycle::Absent,
        }
    }

    /// A resource known by its identity only, to be filled by a read
    #[must_use]
    pub fn imported(id: &str) -> Self {
        Self::new(id, ConfigNode::new(), Lifecycle::Available)
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> &ConfigNode {
        &self.config
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn transition(&mut self, to: Lifecycle) {
        debug!(
            "Resource {}: {} -> {to}",
            self.id().unwrap_or("<none>"),
            self.lifecycle
        );
        self.lifecycle = to;
    }

    /// Record the identity the remote side gave the resource
    pub(crate) fn assign_id(&mut self, id: &str) {
        self.id = Some(id.to_string());
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    /// Take over the identity and configuration of a fresh read, moving to the
    /// lifecycle it reports
    pub(crate) fn observe(&mut self, observed: ResourceState) {
        self.id = observed.id;
        self.config = observed.config;
        self.transition(observed.lifecycle);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_transitions_are_logged() {
        let mut state = ResourceState::new("pv-1", ConfigNode::new(), Lifecycle::Available);
        state.transition(Lifecycle::Deleting);
        state.clear_id();
        state.transition(Lifecycle::Absent);
        assert_eq!(state, ResourceState::absent());
        assert!(logs_contain("pv-1: available -> deleting"));
        assert!(logs_contain("<none>: deleting -> absent"));
    }

    #[test]
    #[traced_test]
    fn test_observe_keeps_the_tracked_history() {
        let mut state = ResourceState::absent();
        state.transition(Lifecycle::Creating);
        state.assign_id("pv-1");
        state.transition(Lifecycle::Pending);
        let read = ResourceState::new(
            "pv-1",
            ConfigNode::new().with("name", "pv-1"),
            Lifecycle::Available,
        );
        state.observe(read.clone());
        assert_eq!(state, read);
        assert!(logs_contain("<none>: absent -> creating"));
        assert!(logs_contain("pv-1: creating -> pending"));
        assert!(logs_contain("pv-1: pending -> available"));
    }

    #[test]
    fn test_imported() {
        let state = ResourceState::imported("pv-1");
        assert_eq!(state.id(), Some("pv-1"));
        assert!(state.config().is_empty());
    }
}
