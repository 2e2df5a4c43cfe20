// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Typed accessors over [`ConfigNode`]. Unset and empty values read as `None`.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::value::{ConfigNode, Value};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Field '{key}' holds a {found}, expected {expected}")]
pub struct AccessError {
    pub key: String,
    pub expected: &'static str,
    pub found: &'static str,
}

impl AccessError {
    fn new(key: &str, expected: &'static str, found: &Value) -> Self {
        Self {
            key: key.to_string(),
            expected,
            found: found.type_name(),
        }
    }
}

impl ConfigNode {
    pub fn str(&self, key: &str) -> Result<Option<&str>, AccessError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(AccessError::new(key, "string", other)),
        }
    }

    pub fn int(&self, key: &str) -> Result<Option<i64>, AccessError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(AccessError::new(key, "int", other)),
        }
    }

    pub fn bool(&self, key: &str) -> Result<Option<bool>, AccessError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(AccessError::new(key, "bool", other)),
        }
    }

    /// Read a list or set of strings. Sets come back sorted and lists keep their order.
    pub fn strings(&self, key: &str) -> Result<Vec<String>, AccessError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::List(l)) => Ok(l.clone()),
            Some(Value::Set(s)) => Ok(s.iter().cloned().collect()),
            Some(other) => Err(AccessError::new(key, "list of strings", other)),
        }
    }

    pub fn map(&self, key: &str) -> Result<BTreeMap<String, String>, AccessError> {
        match self.get(key) {
            None => Ok(BTreeMap::new()),
            Some(Value::Map(m)) => Ok(m.clone()),
            Some(other) => Err(AccessError::new(key, "map", other)),
        }
    }

    /// All elements of a nested block list
    pub fn blocks(&self, key: &str) -> Result<&[ConfigNode], AccessError> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Block(blocks)) => Ok(blocks.as_slice()),
            Some(other) => Err(AccessError::new(key, "block", other)),
        }
    }

    /// The first element of a nested block list, if it holds anything
    pub fn block(&self, key: &str) -> Result<Option<&ConfigNode>, AccessError> {
        Ok(self.blocks(key)?.first().filter(|b| !b.is_empty()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_scalars() {
        let node = ConfigNode::new()
            .with("server", "nfs.local")
            .with("path", "")
            .with("lun", 3_i64)
            .with("read_only", false);
        assert_eq!(node.str("server"), Ok(Some("nfs.local")));
        assert_eq!(node.str("path"), Ok(None));
        assert_eq!(node.str("missing"), Ok(None));
        assert_eq!(node.int("lun"), Ok(Some(3)));
        assert_eq!(node.bool("read_only"), Ok(Some(false)));
    }

    #[test]
    fn test_type_mismatch() {
        let node = ConfigNode::new().with("lun", "three");
        let err = node.int("lun").unwrap_err();
        assert_eq!(err.key, "lun");
        assert_eq!(err.expected, "int");
        assert_eq!(err.found, "string");
    }

    #[test]
    fn test_list_to_set_coercion() {
        let set: BTreeSet<String> = ["b", "a"].into_iter().map(String::from).collect();
        let node = ConfigNode::new()
            .with("monitors", set)
            .set_list("portals", &["z", "y"]);
        assert_eq!(node.strings("monitors").unwrap(), vec!["a", "b"]);
        assert_eq!(node.strings("portals").unwrap(), vec!["z", "y"]);
    }

    #[test]
    fn test_blocks() {
        let node = ConfigNode::new()
            .with("nfs", ConfigNode::new().with("server", "s"))
            .with("empty", ConfigNode::new());
        assert!(node.block("nfs").unwrap().is_some());
        assert!(node.block("empty").unwrap().is_none());
        assert!(node.block("absent").unwrap().is_none());
        assert!(node.block("empty").is_ok());
    }

    impl ConfigNode {
        fn set_list(mut self, key: &str, items: &[&str]) -> Self {
            self.set(key, Value::List(items.iter().map(|s| (*s).to_string()).collect()));
            self
        }
    }
}
