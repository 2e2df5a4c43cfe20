// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Checking a [`ConfigNode`] against a [`Schema`]

use std::fmt::Display;

use thiserror::Error;

use crate::field::{Field, FieldType, Schema};
use crate::value::{ConfigNode, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MissingRequired,
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    TooFewItems {
        min: usize,
        found: usize,
    },
    TooManyItems {
        max: usize,
        found: usize,
    },
    UnknownField,
    Conflicting(Vec<String>),
}

impl Display for ValidationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationErrorKind::MissingRequired => write!(f, "required field is not set"),
            ValidationErrorKind::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ValidationErrorKind::TooFewItems { min, found } => {
                write!(f, "at least {min} items required, found {found}")
            }
            ValidationErrorKind::TooManyItems { max, found } => {
                write!(f, "at most {max} items allowed, found {found}")
            }
            ValidationErrorKind::UnknownField => write!(f, "unknown field"),
            ValidationErrorKind::Conflicting(fields) => {
                write!(f, "only one of {} may be set", fields.join(", "))
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{path}: {kind}")]
pub struct ValidationError {
    pub path: String,
    pub kind: ValidationErrorKind,
}

/// All problems found while validating a node
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::error::Error for ValidationErrors {}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msgs: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&msgs.join("; "))
    }
}

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    fn push(&mut self, path: String, kind: ValidationErrorKind) {
        self.0.push(ValidationError { path, kind });
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn type_matches(kind: &FieldType, value: &Value) -> bool {
    matches!(
        (kind, value),
        (FieldType::String, Value::String(_))
            | (FieldType::Int, Value::Int(_))
            | (FieldType::Bool, Value::Bool(_))
            | (FieldType::StringList, Value::List(_))
            | (FieldType::StringSet, Value::Set(_))
            | (FieldType::StringMap, Value::Map(_))
            | (FieldType::Block(_), Value::Block(_))
    )
}

impl Schema {
    /// Validate `node` against this schema, collecting every problem found.
    pub fn validate(&self, node: &ConfigNode) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        self.validate_at("", node, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_at(&self, prefix: &str, node: &ConfigNode, errors: &mut ValidationErrors) {
        for key in node.keys() {
            if self.get(key).is_none() {
                errors.push(join(prefix, key), ValidationErrorKind::UnknownField);
            }
        }

        for (name, field) in self.iter() {
            let path = join(prefix, name);
            match node.get(name).filter(|v| !v.is_empty()) {
                None => {
                    if field.is_required() {
                        errors.push(path, ValidationErrorKind::MissingRequired);
                    }
                }
                Some(value) => validate_value(&path, field, value, errors),
            }
        }

        for group in self.one_of_groups() {
            let populated: Vec<String> = group
                .fields
                .iter()
                .filter(|f| node.contains(f))
                .map(|f| (*f).to_string())
                .collect();
            if populated.len() > 1 {
                errors.push(
                    prefix.to_string(),
                    ValidationErrorKind::Conflicting(populated),
                );
            }
        }
    }
}

fn validate_value(path: &str, field: &Field, value: &Value, errors: &mut ValidationErrors) {
    if !type_matches(&field.kind, value) {
        errors.push(
            path.to_string(),
            ValidationErrorKind::TypeMismatch {
                expected: field.kind.name(),
                found: value.type_name(),
            },
        );
        return;
    }

    let count = value.item_count();
    if let Some(min) = field.min_items
        && count < min
    {
        errors.push(
            path.to_string(),
            ValidationErrorKind::TooFewItems { min, found: count },
        );
    }
    if let Some(max) = field.max_items
        && count > max
    {
        errors.push(
            path.to_string(),
            ValidationErrorKind::TooManyItems { max, found: count },
        );
    }

    if let (FieldType::Block(inner), Value::Block(blocks)) = (&field.kind, value) {
        for (idx, block) in blocks.iter().enumerate() {
            inner.validate_at(&format!("{path}.{idx}"), block, errors);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::field::Field;
    use pretty_assertions::assert_eq;

    fn source_schema() -> Schema {
        Schema::new()
            .field(
                "host_path",
                Field::single_block(Schema::new().field("path", Field::string().required())),
            )
            .field(
                "nfs",
                Field::single_block(
                    Schema::new()
                        .field("server", Field::string().required())
                        .field("path", Field::string().required())
                        .field("read_only", Field::bool()),
                ),
            )
            .at_most_one_of(&["host_path", "nfs"])
    }

    fn schema() -> Schema {
        Schema::new().field(
            "spec",
            Field::single_block(
                Schema::new()
                    .field("access_modes", Field::string_set().required().min_items(1))
                    .field("source", Field::single_block(source_schema()).required()),
            )
            .required(),
        )
    }

    #[test]
    fn test_valid_node() {
        let node = ConfigNode::new().with(
            "spec",
            ConfigNode::new()
                .with(
                    "access_modes",
                    Value::Set(["ReadWriteOnce".to_string()].into_iter().collect()),
                )
                .with(
                    "source",
                    ConfigNode::new().with("host_path", ConfigNode::new().with("path", "/data")),
                ),
        );
        assert_eq!(schema().validate(&node), Ok(()));
    }

    #[test]
    fn test_missing_and_mistyped() {
        let node = ConfigNode::new().with(
            "spec",
            ConfigNode::new().with("access_modes", true).with(
                "source",
                ConfigNode::new().with("nfs", ConfigNode::new().with("server", "s")),
            ),
        );
        let errors = schema().validate(&node).unwrap_err();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["spec.0.access_modes", "spec.0.source.0.nfs.0.path"]
        );
        assert_eq!(
            errors.0[0].kind,
            ValidationErrorKind::TypeMismatch {
                expected: "set",
                found: "bool"
            }
        );
        assert_eq!(errors.0[1].kind, ValidationErrorKind::MissingRequired);
    }

    #[test]
    fn test_list_given_for_a_set() {
        let node = ConfigNode::new().with(
            "monitors",
            Value::List(vec!["b".to_string(), "a".to_string()]),
        );
        let errors = Schema::new()
            .field("monitors", Field::string_set())
            .validate(&node)
            .unwrap_err();
        assert_eq!(
            errors.0,
            vec![ValidationError {
                path: "monitors".to_string(),
                kind: ValidationErrorKind::TypeMismatch {
                    expected: "set",
                    found: "list"
                },
            }]
        );
    }

    #[test]
    fn test_conflicting_union_members() {
        let source = ConfigNode::new()
            .with("host_path", ConfigNode::new().with("path", "/data"))
            .with(
                "nfs",
                ConfigNode::new().with("server", "s").with("path", "/export"),
            );
        let errors = source_schema().validate(&source).unwrap_err();
        assert_eq!(
            errors.0,
            vec![ValidationError {
                path: String::new(),
                kind: ValidationErrorKind::Conflicting(vec!["host_path".into(), "nfs".into()]),
            }]
        );
    }

    #[test]
    fn test_unknown_field_and_max_items() {
        let node = ConfigNode::new()
            .with("bogus", "x")
            .with(
                "host_path",
                Value::Block(vec![
                    ConfigNode::new().with("path", "/a"),
                    ConfigNode::new().with("path", "/b"),
                ]),
            );
        let errors = source_schema().validate(&node).unwrap_err();
        assert_eq!(errors.0.len(), 2);
        assert_eq!(errors.0[0].kind, ValidationErrorKind::UnknownField);
        assert_eq!(
            errors.0[1].kind,
            ValidationErrorKind::TooManyItems { max: 1, found: 2 }
        );
        assert!(errors.to_string().contains("bogus: unknown field"));
    }
}
