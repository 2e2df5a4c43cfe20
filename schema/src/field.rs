// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Field descriptors and schemas.
//!
//! Schemas are plain immutable values. They are built once and composed by value:
//! a nested block field owns the schema of its elements.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Semantic type of a field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    String,
    Int,
    Bool,
    /// Ordered list of strings
    StringList,
    /// Unordered set of strings
    StringSet,
    /// Map from string to string
    StringMap,
    /// Nested block(s), each described by the inner schema
    Block(Schema),
}

impl FieldType {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Bool => "bool",
            FieldType::StringList => "list",
            FieldType::StringSet => "set",
            FieldType::StringMap => "map",
            FieldType::Block(_) => "block",
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Who provides the value of a field
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Presence {
    Required,
    #[default]
    Optional,
    /// Set by the remote system only
    Computed,
    /// May be set by the user, filled by the remote system otherwise
    OptionalComputed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub kind: FieldType,
    pub presence: Presence,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub force_new: bool,
    pub description: &'static str,
}

impl Field {
    fn of(kind: FieldType) -> Self {
        Self {
            kind,
            presence: Presence::Optional,
            min_items: None,
            max_items: None,
            force_new: false,
            description: "",
        }
    }

    #[must_use]
    pub fn string() -> Self {
        Self::of(FieldType::String)
    }
    #[must_use]
    pub fn int() -> Self {
        Self::of(FieldType::Int)
    }
    #[must_use]
    pub fn bool() -> Self {
        Self::of(FieldType::Bool)
    }
    #[must_use]
    pub fn string_list() -> Self {
        Self::of(FieldType::StringList)
    }
    #[must_use]
    pub fn string_set() -> Self {
        Self::of(FieldType::StringSet)
    }
    #[must_use]
    pub fn string_map() -> Self {
        Self::of(FieldType::StringMap)
    }
    #[must_use]
    pub fn block(schema: Schema) -> Self {
        Self::of(FieldType::Block(schema))
    }
    /// A nested block holding at most one element
    #[must_use]
    pub fn single_block(schema: Schema) -> Self {
        Self::block(schema).max_items(1)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.presence = Presence::Computed;
        self
    }
    #[must_use]
    pub fn optional_computed(mut self) -> Self {
        self.presence = Presence::OptionalComputed;
        self
    }
    #[must_use]
    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }
    #[must_use]
    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }
    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }
    #[must_use]
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    /// The element schema of a block field
    #[must_use]
    pub fn elem(&self) -> Option<&Schema> {
        match &self.kind {
            FieldType::Block(schema) => Some(schema),
            _ => None,
        }
    }
}

/// A group of fields of which at most one may be set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OneOf {
    pub fields: Vec<&'static str>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    fields: BTreeMap<&'static str, Field>,
    one_of: Vec<OneOf>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: &'static str, field: Field) -> Self {
        self.fields.insert(name, field);
        self
    }

    /// Declare that at most one of `fields` may be populated
    #[must_use]
    pub fn at_most_one_of(mut self, fields: &[&'static str]) -> Self {
        self.one_of.push(OneOf { fields: fields.to_vec() });
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }

    #[must_use]
    pub fn one_of_groups(&self) -> &[OneOf] {
        &self.one_of
    }

    /// Names of the top-level fields whose change forces the resource to be replaced
    pub fn force_new_fields(&self) -> impl Iterator<Item = &'static str> {
        self.iter().filter(|(_, f)| f.force_new).map(|(name, _)| name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_schema_composition() {
        let inner = Schema::new().field("path", Field::string().required());
        let schema = Schema::new()
            .field("name", Field::string().required().force_new())
            .field("host_path", Field::single_block(inner.clone()));

        assert_eq!(schema.len(), 2);
        assert!(schema.get("name").unwrap().is_required());
        assert_eq!(schema.force_new_fields().collect::<Vec<_>>(), vec!["name"]);
        let host_path = schema.get("host_path").unwrap();
        assert_eq!(host_path.max_items, Some(1));
        assert_eq!(host_path.elem(), Some(&inner));
    }
}
