//! Typed representation of a model schema.
//!
//! Model schemas arrive as untyped values (usually tables from the configuration
//! file). Only a narrow part of each schema is checked: the `connection` and
//! `collectionName` fields and the `options` object. Everything else, such as the
//! `attributes` used to build the relation graph, is carried through untouched in
//! [`ModelSchema::raw`].
//!
//! ```text
//! <schema>     := { connection: <string>, collectionName: <string>, options: <options>, ... }
//! <options>    := { increments?: <bool>, timestamps: <timestamps> }
//! <timestamps> := <bool> | [ <string>, <string> ]
//! ```

pub mod validate;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;
use std::fmt;

pub use validate::{validate_model_schema, validate_options, ValidationError, Violation};

/// Field name used for the creation timestamp when `timestamps = true`
pub const DEFAULT_CREATED_AT: &str = "created_at";

/// Field name used for the update timestamp when `timestamps = true`
pub const DEFAULT_UPDATED_AT: &str = "updated_at";

/// Whether, and under which field names, a model records its timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Timestamps {
    /// `timestamps = false`
    Disabled,
    /// `timestamps = true`, the default field names are used
    Enabled,
    /// `timestamps = ["createdAtField", "updatedAtField"]`
    Named {
        created_at: String,
        updated_at: String,
    },
}

impl Timestamps {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Timestamps::Disabled)
    }

    /// The `(created_at, updated_at)` field names, if timestamps are recorded
    pub fn field_names(&self) -> Option<(&str, &str)> {
        match self {
            Timestamps::Disabled => None,
            Timestamps::Enabled => Some((DEFAULT_CREATED_AT, DEFAULT_UPDATED_AT)),
            Timestamps::Named {
                created_at,
                updated_at,
            } => Some((created_at, updated_at)),
        }
    }
}

impl fmt::Display for Timestamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamps::Disabled => write!(f, "off"),
            Timestamps::Enabled => write!(f, "on"),
            Timestamps::Named {
                created_at,
                updated_at,
            } => write!(f, "{},{}", created_at, updated_at),
        }
    }
}

impl Serialize for Timestamps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timestamps::Disabled => serializer.serialize_bool(false),
            Timestamps::Enabled => serializer.serialize_bool(true),
            Timestamps::Named {
                created_at,
                updated_at,
            } => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(created_at)?;
                seq.serialize_element(updated_at)?;
                seq.end()
            }
        }
    }
}

/// The validated `options` of a model schema
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Options {
    /// Whether the model uses an auto-incrementing identifier
    pub increments: bool,
    pub timestamps: Timestamps,
}

/// A model schema which passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    /// The data-source connection used by the model
    pub connection: String,
    /// The physical storage identifier
    pub collection_name: String,
    pub options: Options,
    /// The schema exactly as it was supplied
    pub raw: Value,
}

impl ModelSchema {
    /// The `attributes` object of the raw schema, if any
    pub fn attributes(&self) -> Option<&serde_json::Map<String, Value>> {
        self.raw.get("attributes").and_then(Value::as_object)
    }
}
