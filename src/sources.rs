//! Descriptors of the places models are declared in
//!
//! Models are declared by plugins, by the admin area and by APIs. Each of these
//! is a [`Source`] which may carry a `models` table. Plugins and APIs are keyed
//! by their name, and the declaration order of every table is kept since it
//! decides which model wins when two sources declare the same key.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// A map which remembers the order its entries were declared in
#[derive(Debug, Clone, PartialEq)]
pub struct Ordered<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Ordered<T> {
    fn default() -> Self {
        Ordered {
            entries: Vec::new(),
        }
    }
}

impl<T> Ordered<T> {
    pub fn new() -> Ordered<T> {
        Ordered::default()
    }

    /// Append an entry, replacing the value of an existing entry in place
    pub fn insert(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();

        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Ordered<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut ordered = Ordered::new();

        for (key, value) in iter {
            ordered.insert(key, value);
        }

        ordered
    }
}

struct OrderedVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
    type Value = Ordered<T>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a table")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut ordered = Ordered::new();

        while let Some((key, value)) = map.next_entry::<String, T>()? {
            ordered.insert(key, value);
        }

        Ok(ordered)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Ordered<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedVisitor {
            marker: PhantomData,
        })
    }
}

impl<T: Serialize> Serialize for Ordered<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;

        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

/// A plugin, the admin area or an API
#[derive(serde::Deserialize, serde::Serialize, Default, Debug, Clone, PartialEq)]
pub struct Source {
    /// Model name to (unvalidated) model schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Ordered<Value>>,
}

impl Source {
    pub fn with_models(models: Ordered<Value>) -> Source {
        Source {
            models: Some(models),
        }
    }

    /// Number of models declared by the source
    pub fn model_count(&self) -> usize {
        self.models.as_ref().map_or(0, Ordered::len)
    }
}

/// Every source models are collected from
#[derive(serde::Deserialize, serde::Serialize, Default, Debug, Clone, PartialEq)]
pub struct Sources {
    #[serde(default)]
    pub plugins: Ordered<Source>,
    #[serde(default)]
    pub admin: Source,
    #[serde(default)]
    pub api: Ordered<Source>,
}

/// The kind of a [`Source`], as shown in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Plugin,
    Admin,
    Api,
}

impl Sources {
    /// Every source along with its name and kind, in aggregation order
    pub fn iter(&self) -> impl Iterator<Item = (&str, SourceKind, &Source)> {
        let plugins = self
            .plugins
            .iter()
            .map(|(name, source)| (name, SourceKind::Plugin, source));

        let admin = std::iter::once((crate::models::ADMIN_NAMESPACE, SourceKind::Admin, &self.admin));

        let apis = self
            .api
            .iter()
            .map(|(name, source)| (name, SourceKind::Api, source));

        plugins.chain(admin).chain(apis)
    }
}
