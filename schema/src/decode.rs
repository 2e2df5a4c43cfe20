// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Decoding schema-less JSON documents into [`ConfigNode`] trees.
//!
//! JSON arrays are ambiguous (list, set or nested block), so decoding is driven by the
//! declared field types.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value as Json;

use crate::field::{FieldType, Schema};
use crate::validate::{ValidationError, ValidationErrorKind, ValidationErrors};
use crate::value::{ConfigNode, Value};

fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

fn mismatch(path: &str, expected: &FieldType, json: &Json) -> ValidationError {
    ValidationError {
        path: path.to_string(),
        kind: ValidationErrorKind::TypeMismatch {
            expected: expected.name(),
            found: json_type(json),
        },
    }
}

// Map values are strings. Numbers and booleans are accepted and rendered.
fn scalar_to_string(json: &Json) -> Option<String> {
    match json {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        Json::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn strings(path: &str, kind: &FieldType, json: &Json) -> Result<Vec<String>, ValidationError> {
    let Json::Array(items) = json else {
        return Err(mismatch(path, kind, json));
    };
    items
        .iter()
        .map(|item| match item {
            Json::String(s) => Ok(s.clone()),
            other => Err(mismatch(path, &FieldType::String, other)),
        })
        .collect()
}

impl Schema {
    /// Decode a JSON object into a [`ConfigNode`] following this schema.
    ///
    /// Nested blocks may be given either as an array of objects or, for convenience,
    /// as a single object. `null` values are treated as unset.
    pub fn decode(&self, json: &Json) -> Result<ConfigNode, ValidationErrors> {
        let mut errors = Vec::new();
        let node = self.decode_at("", json, &mut errors);
        if errors.is_empty() {
            Ok(node)
        } else {
            Err(ValidationErrors(errors))
        }
    }

    fn decode_at(
        &self,
        prefix: &str,
        json: &Json,
        errors: &mut Vec<ValidationError>,
    ) -> ConfigNode {
        let Json::Object(object) = json else {
            errors.push(ValidationError {
                path: prefix.to_string(),
                kind: ValidationErrorKind::TypeMismatch {
                    expected: "block",
                    found: json_type(json),
                },
            });
            return ConfigNode::new();
        };

        let mut node = ConfigNode::new();
        for (key, value) in object {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            if value.is_null() {
                continue;
            }
            let Some(field) = self.get(key) else {
                errors.push(ValidationError {
                    path,
                    kind: ValidationErrorKind::UnknownField,
                });
                continue;
            };
            match decode_value(&path, &field.kind, value, errors) {
                Ok(value) => node.set(key, value),
                Err(e) => errors.push(e),
            }
        }
        node
    }
}

fn decode_value(
    path: &str,
    kind: &FieldType,
    json: &Json,
    errors: &mut Vec<ValidationError>,
) -> Result<Value, ValidationError> {
    let value = match kind {
        FieldType::String => match json {
            Json::String(s) => Value::String(s.clone()),
            other => return Err(mismatch(path, kind, other)),
        },
        FieldType::Int => match json.as_i64() {
            Some(i) => Value::Int(i),
            None => return Err(mismatch(path, kind, json)),
        },
        FieldType::Bool => match json {
            Json::Bool(b) => Value::Bool(*b),
            other => return Err(mismatch(path, kind, other)),
        },
        FieldType::StringList => Value::List(strings(path, kind, json)?),
        FieldType::StringSet => {
            Value::Set(strings(path, kind, json)?.into_iter().collect::<BTreeSet<_>>())
        }
        FieldType::StringMap => {
            let Json::Object(object) = json else {
                return Err(mismatch(path, kind, json));
            };
            let mut map = BTreeMap::new();
            for (k, v) in object {
                let Some(v) = scalar_to_string(v) else {
                    return Err(mismatch(&format!("{path}.{k}"), &FieldType::String, v));
                };
                map.insert(k.clone(), v);
            }
            Value::Map(map)
        }
        FieldType::Block(inner) => match json {
            Json::Array(items) => Value::Block(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| inner.decode_at(&format!("{path}.{idx}"), item, errors))
                    .collect(),
            ),
            Json::Object(_) => {
                Value::Block(vec![inner.decode_at(&format!("{path}.0"), json, errors)])
            }
            other => return Err(mismatch(path, kind, other)),
        },
    };
    Ok(value)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::field::Field;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .field("access_modes", Field::string_set())
            .field("capacity", Field::string_map())
            .field("partition", Field::int())
            .field(
                "host_path",
                Field::single_block(Schema::new().field("path", Field::string())),
            )
    }

    #[test]
    fn test_decode_by_declared_types() {
        let node = schema()
            .decode(&json!({
                "access_modes": ["ReadWriteOnce", "ReadOnlyMany", "ReadWriteOnce"],
                "capacity": {"storage": "10Gi", "count": 3},
                "partition": 2,
                "host_path": {"path": "/data"},
            }))
            .unwrap();

        let modes: BTreeSet<String> = ["ReadOnlyMany", "ReadWriteOnce"]
            .into_iter()
            .map(String::from)
            .collect();
        let capacity: BTreeMap<String, String> = [("count", "3"), ("storage", "10Gi")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let expected = ConfigNode::new()
            .with("access_modes", modes)
            .with("capacity", capacity)
            .with("partition", 2_i64)
            .with("host_path", ConfigNode::new().with("path", "/data"));
        assert_eq!(node, expected);
    }

    #[test]
    fn test_decode_errors() {
        let errors = schema()
            .decode(&json!({
                "access_modes": "ReadWriteOnce",
                "host_path": [{"path": 1}],
                "unknown": null,
                "other": 1,
            }))
            .unwrap_err();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["access_modes", "host_path.0.path", "other"]);
    }
}
