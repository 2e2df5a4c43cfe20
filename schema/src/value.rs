// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The configuration tree exchanged with the orchestration engine.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use serde::Serialize;

/// A single field value in a [`ConfigNode`]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<String>),
    Set(BTreeSet<String>),
    Map(BTreeMap<String, String>),
    Block(Vec<ConfigNode>),
}

impl Value {
    /// Name of the variant, used in error messages
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Block(_) => "block",
        }
    }

    /// Tell if a value is the zero value of its type as far as the configuration
    /// language is concerned. Booleans and integers are never empty: `false` and `0`
    /// are meaningful once they have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Bool(_) | Value::Int(_) => false,
            Value::String(s) => s.is_empty(),
            Value::List(l) => l.is_empty(),
            Value::Set(s) => s.is_empty(),
            Value::Map(m) => m.is_empty(),
            Value::Block(blocks) => blocks.iter().all(ConfigNode::is_empty),
        }
    }

    /// Number of items held by a collection value. Scalars count as one item.
    #[must_use]
    pub fn item_count(&self) -> usize {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::String(_) => 1,
            Value::List(l) => l.len(),
            Value::Set(s) => s.len(),
            Value::Map(m) => m.len(),
            Value::Block(blocks) => blocks.len(),
        }
    }

    fn normalized(&self) -> Option<Value> {
        match self {
            Value::Block(blocks) => {
                let blocks: Vec<ConfigNode> = blocks
                    .iter()
                    .map(ConfigNode::normalized)
                    .filter(|b| !b.is_empty())
                    .collect();
                (!blocks.is_empty()).then_some(Value::Block(blocks))
            }
            v if v.is_empty() => None,
            v => Some(v.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}
impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}
impl From<BTreeSet<String>> for Value {
    fn from(value: BTreeSet<String>) -> Self {
        Value::Set(value)
    }
}
impl From<BTreeMap<String, String>> for Value {
    fn from(value: BTreeMap<String, String>) -> Self {
        Value::Map(value)
    }
}
impl From<ConfigNode> for Value {
    fn from(value: ConfigNode) -> Self {
        Value::Block(vec![value])
    }
}
impl From<Vec<ConfigNode>> for Value {
    fn from(value: Vec<ConfigNode>) -> Self {
        Value::Block(value)
    }
}

/// A tree of named fields.
///
/// Nested blocks are lists of nodes; blocks declared with `max_items = 1` hold at most
/// one element.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ConfigNode(BTreeMap<String, Value>);

impl ConfigNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(|v| !v.is_empty())
    }

    /// A node is empty if all fields it holds are empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Value::is_empty)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build a copy of this node where empty values and empty blocks are dropped
    /// recursively. Two nodes which only differ in unset fields normalize equally.
    #[must_use]
    pub fn normalized(&self) -> Self {
        ConfigNode(
            self.0
                .iter()
                .filter_map(|(k, v)| v.normalized().map(|v| (k.clone(), v)))
                .collect(),
        )
    }

    /// Render this node as a JSON value
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl FromIterator<(String, Value)> for ConfigNode {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        ConfigNode(iter.into_iter().collect())
    }
}

impl Display for ConfigNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
