// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Declarative configuration trees and the schemas describing them

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod access;
pub mod decode;
pub mod field;
pub mod utils;
pub mod validate;
pub mod value;

// re-exports
pub use access::AccessError;
pub use field::{Field, FieldType, OneOf, Presence, Schema};
pub use utils::{LoadError, load_config_from_file, load_from_file};
pub use validate::{ValidationError, ValidationErrorKind, ValidationErrors};
pub use value::{ConfigNode, Value};
