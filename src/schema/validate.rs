//! Validation of untyped model schemas
//!
//! Validation stops at the first violation. The returned [`ValidationError`]
//! names the offending field with a dotted path, e.g. `options.timestamps[1]`.

use super::{ModelSchema, Options, Timestamps};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// The way in which a field violated the schema contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("is a required field")]
    Required,
    #[error("cannot be empty")]
    Empty,
    #[error("must be of type {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("must contain exactly {expected} items, found {found}")]
    WrongLength { expected: usize, found: usize },
}

/// A schema did not conform to the model schema contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{path} {violation}")]
pub struct ValidationError {
    path: FieldPath,
    violation: Violation,
}

impl ValidationError {
    fn new(path: FieldPath, violation: Violation) -> ValidationError {
        ValidationError { path, violation }
    }

    /// The dotted path of the offending field
    pub fn path(&self) -> String {
        self.path.to_string()
    }

    pub fn violation(&self) -> &Violation {
        &self.violation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    fn field(&self, name: &'static str) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(Segment::Field(name));
        FieldPath { segments }
    }

    fn index(&self, index: usize) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        FieldPath { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "schema");
        }

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Field(name) if i == 0 => write!(f, "{}", name)?,
                Segment::Field(name) => write!(f, ".{}", name)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }

        Ok(())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(path: FieldPath, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::new(
        path,
        Violation::WrongType {
            expected,
            found: type_name(found),
        },
    )
}

fn expect_object<'v>(
    path: &FieldPath,
    value: &'v Value,
) -> Result<&'v Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| wrong_type(path.clone(), "object", value))
}

fn required<'v>(
    path: &FieldPath,
    object: &'v Map<String, Value>,
    name: &'static str,
) -> Result<&'v Value, ValidationError> {
    match object.get(name) {
        None | Some(Value::Null) => {
            Err(ValidationError::new(path.field(name), Violation::Required))
        }
        Some(value) => Ok(value),
    }
}

fn required_string(
    path: &FieldPath,
    object: &Map<String, Value>,
    name: &'static str,
) -> Result<String, ValidationError> {
    match required(path, object, name)? {
        Value::String(s) if s.is_empty() => {
            Err(ValidationError::new(path.field(name), Violation::Empty))
        }
        Value::String(s) => Ok(s.clone()),
        other => Err(wrong_type(path.field(name), "string", other)),
    }
}

fn validate_timestamps(path: FieldPath, value: &Value) -> Result<Timestamps, ValidationError> {
    match value {
        Value::Bool(true) => Ok(Timestamps::Enabled),
        Value::Bool(false) => Ok(Timestamps::Disabled),
        Value::Array(items) => match items.as_slice() {
            [Value::String(created_at), Value::String(updated_at)] => Ok(Timestamps::Named {
                created_at: created_at.clone(),
                updated_at: updated_at.clone(),
            }),
            [first, second] => {
                let (i, item) = if first.is_string() {
                    (1, second)
                } else {
                    (0, first)
                };

                Err(wrong_type(path.index(i), "string", item))
            }
            _ => Err(ValidationError::new(
                path,
                Violation::WrongLength {
                    expected: 2,
                    found: items.len(),
                },
            )),
        },
        other => Err(wrong_type(path, "boolean or array", other)),
    }
}

fn validate_options_at(path: FieldPath, value: &Value) -> Result<Options, ValidationError> {
    let options = expect_object(&path, value)?;

    let increments = match options.get("increments") {
        None => true,
        Some(Value::Bool(increments)) => *increments,
        Some(other) => return Err(wrong_type(path.field("increments"), "boolean", other)),
    };

    let timestamps = required(&path, options, "timestamps")?;
    let timestamps = validate_timestamps(path.field("timestamps"), timestamps)?;

    Ok(Options {
        increments,
        timestamps,
    })
}

/// Validate the `options` object of a model schema on its own.
///
/// Paths in the returned error are relative to the options object.
pub fn validate_options(value: &Value) -> Result<Options, ValidationError> {
    validate_options_at(FieldPath::default(), value)
}

/// Validate a complete model schema, returning its typed form
pub fn validate_model_schema(value: &Value) -> Result<ModelSchema, ValidationError> {
    let root = FieldPath::default();
    let schema = expect_object(&root, value)?;

    let connection = required_string(&root, schema, "connection")?;
    let collection_name = required_string(&root, schema, "collectionName")?;
    let options = required(&root, schema, "options")?;
    let options = validate_options_at(root.field("options"), options)?;

    Ok(ModelSchema {
        connection,
        collection_name,
        options,
        raw: value.clone(),
    })
}
