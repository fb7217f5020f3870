//! The graph of relations declared between models
//!
//! A model declares a relation through one of its `attributes`:
//!
//! ```text
//! "author":   { "model": "user", "plugin": "auth" }     to-one
//! "comments": { "collection": "comment", "via": "post" } to-many
//! ```
//!
//! The graph is built once every model is registered, so a model may refer to
//! any other regardless of the order models were declared in. Targets are
//! resolved in this order:
//!
//! 1. with a `plugin`, the target is `<plugin>.<name>`
//! 2. a name containing `.` is a complete key
//! 3. `<namespace>.<name>`, where `<namespace>` is the declaring model's own
//! 4. the only registered key whose model part is `<name>`
//!
//! A target which cannot be resolved, either because nothing matches or because
//! several keys match, is kept in [`RelationGraph::unresolved`] instead of failing
//! the build. Cycles and self references are permitted.

use crate::models::{Model, ModelKey};
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};

/// Target name of a polymorphic relation; these are not part of the graph
const POLYMORPHIC_TARGET: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// Declared with `model`
    One,
    /// Declared with `collection`
    Many,
}

/// A resolved relation from one model to another
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Relation {
    /// The attribute declaring the relation
    pub attribute: String,
    /// Registry key of the related model
    pub target: String,
    pub cardinality: Cardinality,
    /// The attribute on the target pointing back, if declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

/// An incoming edge: `source` refers to a model through `attribute`
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Reference {
    pub source: String,
    pub attribute: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// No registered model matches the target
    Missing,
    /// Several registered models match the target
    Ambiguous(Vec<String>),
}

/// A declared relation whose target could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedRelation {
    pub source: String,
    pub attribute: String,
    /// The target as declared, qualified with its plugin if one was given
    pub target: String,
    pub reason: Unresolved,
}

struct Declaration<'s> {
    attribute: &'s str,
    target: &'s str,
    plugin: Option<&'s str>,
    via: Option<&'s str>,
    cardinality: Cardinality,
}

impl<'s> Declaration<'s> {
    fn parse(attribute: &'s str, value: &'s Value) -> Option<Declaration<'s>> {
        let definition = value.as_object()?;

        let (target, cardinality) = match (
            definition.get("collection").and_then(Value::as_str),
            definition.get("model").and_then(Value::as_str),
        ) {
            (Some(target), _) => (target, Cardinality::Many),
            (None, Some(target)) => (target, Cardinality::One),
            (None, None) => return None,
        };

        if target == POLYMORPHIC_TARGET || target.is_empty() {
            return None;
        }

        Some(Declaration {
            attribute,
            target,
            plugin: definition.get("plugin").and_then(Value::as_str),
            via: definition.get("via").and_then(Value::as_str),
            cardinality,
        })
    }

    fn qualified_target(&self) -> String {
        match self.plugin {
            Some(plugin) => ModelKey::new(plugin, self.target).to_string(),
            None => self.target.to_string(),
        }
    }
}

struct Resolver<'r> {
    keys: HashSet<&'r str>,
    by_model_name: HashMap<&'r str, Vec<&'r str>>,
}

impl<'r> Resolver<'r> {
    fn new(entries: &'r [(String, Model)]) -> Resolver<'r> {
        let mut keys = HashSet::new();
        let mut by_model_name: HashMap<&str, Vec<&str>> = HashMap::new();

        for (key, _) in entries {
            keys.insert(key.as_str());
            by_model_name
                .entry(ModelKey::parse(key).model)
                .or_default()
                .push(key.as_str());
        }

        Resolver {
            keys,
            by_model_name,
        }
    }

    fn resolve(&self, source: ModelKey, declaration: &Declaration) -> Result<String, Unresolved> {
        let exact = |key: String| {
            if self.keys.contains(key.as_str()) {
                Ok(key)
            } else {
                Err(Unresolved::Missing)
            }
        };

        if let Some(plugin) = declaration.plugin {
            return exact(ModelKey::new(plugin, declaration.target).to_string());
        }

        if declaration.target.contains('.') {
            return exact(declaration.target.to_string());
        }

        let sibling = ModelKey::new(source.namespace, declaration.target).to_string();

        if self.keys.contains(sibling.as_str()) {
            return Ok(sibling);
        }

        match self.by_model_name.get(declaration.target).map(Vec::as_slice) {
            Some([key]) => Ok(key.to_string()),
            Some(keys) if keys.len() > 1 => Err(Unresolved::Ambiguous(
                keys.iter().map(|k| k.to_string()).collect(),
            )),
            _ => Err(Unresolved::Missing),
        }
    }
}

/// Relations between the models of a registry
#[derive(Debug, Default)]
pub struct RelationGraph {
    outgoing: HashMap<String, Vec<Relation>>,
    incoming: HashMap<String, Vec<Reference>>,
    unresolved: Vec<UnresolvedRelation>,
}

impl RelationGraph {
    /// Build the graph from every registered model
    pub fn build(entries: &[(String, Model)]) -> RelationGraph {
        let resolver = Resolver::new(entries);
        let mut graph = RelationGraph::default();

        for (key, model) in entries {
            let attributes = match model.schema().attributes() {
                Some(attributes) => attributes,
                None => continue,
            };

            let source = ModelKey::parse(key);

            for (attribute, value) in attributes {
                let declaration = match Declaration::parse(attribute, value) {
                    Some(declaration) => declaration,
                    None => continue,
                };

                match resolver.resolve(source, &declaration) {
                    Ok(target) => graph.insert(key, &declaration, target),
                    Err(reason) => graph.unresolved.push(UnresolvedRelation {
                        source: key.clone(),
                        attribute: declaration.attribute.to_string(),
                        target: declaration.qualified_target(),
                        reason,
                    }),
                }
            }
        }

        graph
    }

    fn insert(&mut self, source: &str, declaration: &Declaration, target: String) {
        self.incoming
            .entry(target.clone())
            .or_default()
            .push(Reference {
                source: source.to_string(),
                attribute: declaration.attribute.to_string(),
            });

        self.outgoing
            .entry(source.to_string())
            .or_default()
            .push(Relation {
                attribute: declaration.attribute.to_string(),
                target,
                cardinality: declaration.cardinality,
                via: declaration.via.map(str::to_string),
            });
    }

    /// Resolved relations declared by `key`, ordered by attribute name
    pub fn relations(&self, key: &str) -> &[Relation] {
        self.outgoing.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Relations which target `key`
    pub fn referrers(&self, key: &str) -> impl Iterator<Item = &Reference> {
        self.incoming.get(key).into_iter().flatten()
    }

    /// Every key reachable from `key` by following relations, breadth first.
    /// `key` itself is never part of the result.
    pub fn reachable<'g>(&'g self, key: &'g str) -> Vec<&'g str> {
        let mut visited = HashSet::from([key]);
        let mut queue = VecDeque::from([key]);
        let mut reached = Vec::new();

        while let Some(current) = queue.pop_front() {
            for relation in self.relations(current) {
                if visited.insert(relation.target.as_str()) {
                    reached.push(relation.target.as_str());
                    queue.push_back(relation.target.as_str());
                }
            }
        }

        reached
    }

    pub fn unresolved(&self) -> &[UnresolvedRelation] {
        &self.unresolved
    }
}
