// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Field level conversions shared by all mappers.
//!
//! Writers only emit fields holding a value: `None`, empty strings and empty collections
//! are left out. Integers the remote side always carries are written as they are.
//! Readers mirror this and return the zero value for anything unset.

use std::collections::BTreeMap;

use schema::{ConfigNode, Value};

use crate::{ExpandError, Expand, Flatten};

/// Writing remote fields into a configuration node
pub trait Put {
    fn put_str(&mut self, key: &str, value: &str);
    fn put_opt_str(&mut self, key: &str, value: Option<&String>);
    fn put_opt_bool(&mut self, key: &str, value: Option<bool>);
    fn put_opt_int(&mut self, key: &str, value: Option<i32>);
    fn put_opt_i64(&mut self, key: &str, value: Option<i64>);
    fn put_set(&mut self, key: &str, values: &[String]);
    fn put_list(&mut self, key: &str, values: &[String]);
    fn put_map(&mut self, key: &str, values: Option<&BTreeMap<String, String>>);
    fn put_block<T: Flatten>(&mut self, key: &str, value: Option<&T>);
}

impl Put for ConfigNode {
    fn put_str(&mut self, key: &str, value: &str) {
        if !value.is_empty() {
            self.set(key, value);
        }
    }

    fn put_opt_str(&mut self, key: &str, value: Option<&String>) {
        if let Some(value) = value {
            self.put_str(key, value);
        }
    }

    fn put_opt_bool(&mut self, key: &str, value: Option<bool>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    fn put_opt_int(&mut self, key: &str, value: Option<i32>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    fn put_opt_i64(&mut self, key: &str, value: Option<i64>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    fn put_set(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.set(key, Value::Set(values.iter().cloned().collect()));
        }
    }

    fn put_list(&mut self, key: &str, values: &[String]) {
        if !values.is_empty() {
            self.set(key, Value::List(values.to_vec()));
        }
    }

    fn put_map(&mut self, key: &str, values: Option<&BTreeMap<String, String>>) {
        if let Some(values) = values.filter(|m| !m.is_empty()) {
            self.set(key, values.clone());
        }
    }

    fn put_block<T: Flatten>(&mut self, key: &str, value: Option<&T>) {
        if let Some(value) = value {
            let block = value.flatten();
            if !block.is_empty() {
                self.set(key, block);
            }
        }
    }
}

/// Reading configuration fields into remote fields
pub trait Get {
    /// A field the remote side requires. Unset reads as the empty string.
    fn req_string(&self, key: &str) -> Result<String, ExpandError>;
    fn opt_string(&self, key: &str) -> Result<Option<String>, ExpandError>;
    fn opt_bool(&self, key: &str) -> Result<Option<bool>, ExpandError>;
    fn req_i32(&self, key: &str) -> Result<i32, ExpandError>;
    fn opt_i32(&self, key: &str) -> Result<Option<i32>, ExpandError>;
    fn string_vec(&self, key: &str) -> Result<Vec<String>, ExpandError>;
    /// Like [`Get::string_vec`], with `None` for an empty collection
    fn opt_string_vec(&self, key: &str) -> Result<Option<Vec<String>>, ExpandError>;
    fn opt_map(&self, key: &str) -> Result<Option<BTreeMap<String, String>>, ExpandError>;
    /// Expand the nested block `key`, if it holds anything. Errors are keyed under `key`.
    fn opt_block<T: Expand>(&self, key: &str) -> Result<Option<T>, ExpandError>;
}

impl Get for ConfigNode {
    fn req_string(&self, key: &str) -> Result<String, ExpandError> {
        Ok(self.opt_string(key)?.unwrap_or_default())
    }

    fn opt_string(&self, key: &str) -> Result<Option<String>, ExpandError> {
        Ok(self.str(key)?.map(String::from))
    }

    fn opt_bool(&self, key: &str) -> Result<Option<bool>, ExpandError> {
        Ok(self.bool(key)?)
    }

    fn req_i32(&self, key: &str) -> Result<i32, ExpandError> {
        Ok(self.opt_i32(key)?.unwrap_or_default())
    }

    fn opt_i32(&self, key: &str) -> Result<Option<i32>, ExpandError> {
        self.int(key)?
            .map(|value| {
                i32::try_from(value).map_err(|_| ExpandError::OutOfRange {
                    key: key.to_string(),
                    value,
                })
            })
            .transpose()
    }

    fn string_vec(&self, key: &str) -> Result<Vec<String>, ExpandError> {
        Ok(self.strings(key)?)
    }

    fn opt_string_vec(&self, key: &str) -> Result<Option<Vec<String>>, ExpandError> {
        let values = self.strings(key)?;
        Ok((!values.is_empty()).then_some(values))
    }

    fn opt_map(&self, key: &str) -> Result<Option<BTreeMap<String, String>>, ExpandError> {
        let values = self.map(key)?;
        Ok((!values.is_empty()).then_some(values))
    }

    fn opt_block<T: Expand>(&self, key: &str) -> Result<Option<T>, ExpandError> {
        self.block(key)?
            .map(|block| T::expand(block).map_err(|e| e.within(key)))
            .transpose()
    }
}
