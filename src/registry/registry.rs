use super::relations::{Reference, Relation, RelationGraph, UnresolvedRelation};

use crate::models::Model;
use crate::schema::{validate_model_schema, ValidationError};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A model schema was rejected, no registry is built
    #[error("model \"{key}\" has an invalid schema: {source}")]
    InvalidSchema {
        key: String,
        #[source]
        source: ValidationError,
    },
}

/// A model schema as declared by one of the sources, under its registry key
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub key: String,
    pub schema: Value,
}

impl ModelInfo {
    pub fn new(key: impl Into<String>, schema: Value) -> ModelInfo {
        ModelInfo {
            key: key.into(),
            schema,
        }
    }
}

/// The read-only collection of every registered model
#[derive(Debug)]
pub struct Registry {
    entries: Vec<(String, Model)>,
    index: HashMap<String, usize>,
    relations: RelationGraph,
}

/// Build a registry from a sequence of model declarations.
///
/// Declarations are validated and inserted in order. A declaration whose key is
/// already registered replaces the earlier model but keeps its position. The
/// first invalid schema aborts the whole build.
pub fn create_manager<I>(model_infos: I) -> Result<Registry, Error>
where
    I: IntoIterator<Item = ModelInfo>,
{
    let mut entries: Vec<(String, Model)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for ModelInfo { key, schema } in model_infos {
        let schema = validate_model_schema(&schema).map_err(|source| Error::InvalidSchema {
            key: key.clone(),
            source,
        })?;

        let model = Model::new(schema);

        match index.get(&key) {
            Some(&position) => entries[position].1 = model,
            None => {
                index.insert(key.clone(), entries.len());
                entries.push((key, model));
            }
        }
    }

    let relations = RelationGraph::build(&entries);

    Ok(Registry {
        entries,
        index,
        relations,
    })
}

impl Registry {
    /// Look up a model by its exact key
    pub fn get(&self, key: &str) -> Option<&Model> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    /// Registered keys, in the order they were first declared
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Model)> {
        self.entries.iter().map(|(key, model)| (key.as_str(), model))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn relations(&self, key: &str) -> &[Relation] {
        self.relations.relations(key)
    }

    pub fn referrers(&self, key: &str) -> impl Iterator<Item = &Reference> {
        self.relations.referrers(key)
    }

    pub fn reachable<'r>(&'r self, key: &'r str) -> Vec<&'r str> {
        self.relations.reachable(key)
    }

    pub fn unresolved(&self) -> &[UnresolvedRelation] {
        self.relations.unresolved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Timestamps, Violation};
    use serde_json::json;

    fn schema(collection: &str) -> Value {
        json!({
            "connection": "default",
            "collectionName": collection,
            "options": { "timestamps": true },
        })
    }

    #[test]
    fn test_get_returns_the_registered_schema() {
        let registry = create_manager(vec![
            ModelInfo::new("auth.user", schema("users")),
            ModelInfo::new("blog.post", schema("posts")),
        ])
        .unwrap();

        let user = registry.get("auth.user").expect("should be registered");

        assert_eq!(user.schema().raw, schema("users"));
        assert_eq!(user.schema().collection_name, "users");
        assert!(user.schema().options.increments);
        assert_eq!(user.schema().options.timestamps, Timestamps::Enabled);

        assert!(registry.get("blog").is_none());
        assert!(registry.get("auth.User").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_later_declarations_overwrite_in_place() {
        let registry = create_manager(vec![
            ModelInfo::new("blog.post", schema("plugin_posts")),
            ModelInfo::new("admin.role", schema("roles")),
            ModelInfo::new("blog.post", schema("api_posts")),
        ])
        .unwrap();

        let keys: Vec<&str> = registry.keys().collect();

        assert_eq!(keys, vec!["blog.post", "admin.role"]);
        assert_eq!(
            registry.get("blog.post").unwrap().schema().collection_name,
            "api_posts"
        );
    }

    #[test]
    fn test_keys_can_be_enumerated_repeatedly() {
        let registry = create_manager(vec![ModelInfo::new("a.b", schema("b"))]).unwrap();

        assert_eq!(registry.keys().count(), 1);
        assert_eq!(registry.keys().count(), 1);
    }

    #[test]
    fn test_invalid_schema_aborts_the_build() {
        let result = create_manager(vec![
            ModelInfo::new("auth.user", schema("users")),
            ModelInfo::new(
                "blog.post",
                json!({ "connection": "default", "options": { "timestamps": true } }),
            ),
            ModelInfo::new("blog.tag", schema("tags")),
        ]);

        match result {
            Err(Error::InvalidSchema { key, source }) => {
                assert_eq!(key, "blog.post");
                assert_eq!(source.path(), "collectionName");
                assert_eq!(source.violation(), &Violation::Required);
            }
            Ok(_) => panic!("build should fail"),
        }
    }

    #[test]
    fn test_error_message_names_the_model() {
        let err = create_manager(vec![ModelInfo::new(
            "blog.post",
            json!({
                "connection": "default",
                "collectionName": "posts",
                "options": { "timestamps": ["createdAt"] }
            }),
        )])
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "model \"blog.post\" has an invalid schema: options.timestamps must contain exactly 2 items, found 1"
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = create_manager(Vec::new()).unwrap();

        assert!(registry.is_empty());
        assert_eq!(registry.keys().next(), None);
    }

    #[test]
    fn test_relations_are_built_after_every_model() {
        let mut post = schema("posts");
        post["attributes"] = json!({ "author": { "model": "user", "plugin": "auth" } });

        let registry = create_manager(vec![
            ModelInfo::new("blog.post", post),
            ModelInfo::new("auth.user", schema("users")),
        ])
        .unwrap();

        assert_eq!(registry.relations("blog.post")[0].target, "auth.user");
        assert_eq!(registry.reachable("blog.post"), vec!["auth.user"]);
        assert_eq!(registry.referrers("auth.user").count(), 1);
        assert!(registry.unresolved().is_empty());
    }

    #[test]
    fn test_registry_can_be_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<Registry>();
    }
}
