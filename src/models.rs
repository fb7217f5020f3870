//! Model entities and their namespaced keys

use crate::schema::ModelSchema;
use std::fmt;

/// Namespace used for the models declared by the admin area
pub const ADMIN_NAMESPACE: &str = "admin";

/// A validated content model
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    schema: ModelSchema,
}

impl Model {
    /// Wrap a schema into a model. The schema must already have been validated.
    pub fn new(schema: ModelSchema) -> Model {
        Model { schema }
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }
}

/// A key of the form `<namespace>.<model>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelKey<'k> {
    pub namespace: &'k str,
    pub model: &'k str,
}

impl<'k> ModelKey<'k> {
    pub fn new(namespace: &'k str, model: &'k str) -> ModelKey<'k> {
        ModelKey { namespace, model }
    }

    /// Split a registry key at its first `.`. Keys without a namespace are
    /// treated as belonging to the empty namespace.
    pub fn parse(key: &'k str) -> ModelKey<'k> {
        match key.split_once('.') {
            Some((namespace, model)) => ModelKey { namespace, model },
            None => ModelKey {
                namespace: "",
                model: key,
            },
        }
    }
}

impl fmt::Display for ModelKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_model_schema;
    use serde_json::json;

    #[test]
    fn test_model_carries_its_schema() {
        let raw = json!({
            "connection": "default",
            "collectionName": "users",
            "options": { "timestamps": ["createdAt", "updatedAt"] }
        });

        let schema = validate_model_schema(&raw).unwrap();
        let model = Model::new(schema.clone());

        assert_eq!(model.schema(), &schema);
        assert_eq!(model.schema().raw, raw);
    }

    #[test]
    fn test_model_key() {
        let key = ModelKey::new("auth", "user");
        assert_eq!(key.to_string(), "auth.user");

        let parsed = ModelKey::parse("users-permissions.role");
        assert_eq!(parsed, ModelKey::new("users-permissions", "role"));

        let parsed = ModelKey::parse("orphan");
        assert_eq!(parsed.namespace, "");
        assert_eq!(parsed.model, "orphan");
    }
}
