//! Configuration file declaring the model sources

use crate::sources::Sources;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read config \"{0}\": {1}")]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to reserialize config: {0}")]
    Reserialize(#[from] toml::ser::Error),
}

#[derive(Deserialize, Serialize, Default, Debug)]
pub struct Config {
    #[serde(flatten)]
    pub sources: Sources,
}

const CONFIG_NAME: &str = "contentreg.toml";

fn get_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_NAME);

    if local.exists() {
        return Some(local);
    }

    let home = std::env::var_os("HOME");

    if let Some(home) = home {
        let home = PathBuf::from(home);

        const USER_PATHS: [&str; 2] = [".config/contentreg/config.toml", ".contentreg.toml"];

        for &path in USER_PATHS.iter() {
            let fullpath = home.join(path);

            if fullpath.exists() {
                return Some(fullpath);
            }
        }
    }

    let system_config = PathBuf::from("/etc/contentreg.toml");

    if system_config.exists() {
        Some(system_config)
    } else {
        None
    }
}

fn extra_fields_helper<'a>(
    path: &mut Vec<&'a str>,
    extra: &mut Vec<String>,
    user_config: &'a toml::Table,
    config: &'a toml::Table,
) {
    for (user_key, user_value) in user_config {
        path.push(user_key);

        if let Some(config_value) = config.get(user_key) {
            if let (toml::Value::Table(user_value), toml::Value::Table(config_value)) =
                (user_value, config_value)
            {
                extra_fields_helper(path, extra, user_value, config_value)
            }
        } else {
            extra.push(path.join("."));
        }

        path.pop();
    }
}

impl Config {
    /// Parse a configuration from its TOML text
    pub fn parse(raw_config: &str) -> Result<Config, Error> {
        Ok(toml::de::from_str(raw_config)?)
    }

    /// Dotted paths of the keys in `raw_config` which the configuration does
    /// not use. Model schemas are kept whole, so only keys outside of them
    /// are reported.
    pub fn extraneous_keys(&self, raw_config: &str) -> Result<Vec<String>, Error> {
        let user_config: toml::Table = toml::de::from_str(raw_config)?;

        let config: toml::Table = {
            let serialized_config = toml::ser::to_string(&self)?;

            toml::de::from_str(&serialized_config)?
        };

        let mut path = Vec::new();
        let mut extra = Vec::new();

        extra_fields_helper(&mut path, &mut extra, &user_config, &config);

        Ok(extra)
    }
}

/// A configuration along with the text it was parsed from
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// Where the configuration was read from, `None` when no file was found
    pub path: Option<PathBuf>,
    pub raw: String,
}

fn read_from(path: &Path) -> Result<LoadedConfig, Error> {
    let raw = std::fs::read_to_string(path).map_err(|err| Error::Read(path.to_owned(), err))?;

    let config = Config::parse(&raw)?;

    Ok(LoadedConfig {
        config,
        path: Some(path.to_owned()),
        raw,
    })
}

/// Read the configuration at `config`, or at the first of the default
/// locations which exists. Without a configuration file there are no sources.
pub fn read_config(config: Option<PathBuf>) -> Result<LoadedConfig, Error> {
    match config.or_else(get_config_path) {
        Some(path) => read_from(&path),
        None => Ok(LoadedConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[plugins.auth.models.user]
connection = "default"
collectionName = "users"
options = { timestamps = ["createdAt", "updatedAt"] }

[plugins.upload]

[admin.models.permission]
connection = "default"
collectionName = "permissions"
options = { increments = false, timestamps = true }

[api.blog.models.post]
connection = "default"
collectionName = "posts"
options = { timestamps = false }
attributes = { author = { model = "user", plugin = "auth" } }

[api.about]
models = {}
"#;

    #[test]
    fn test_parse_sources() {
        let config = Config::parse(CONFIG).unwrap();
        let sources = &config.sources;

        let plugins: Vec<&str> = sources.plugins.iter().map(|(name, _)| name).collect();
        assert_eq!(plugins, vec!["auth", "upload"]);

        assert_eq!(sources.plugins.get("upload").unwrap().models, None);
        assert_eq!(sources.admin.model_count(), 1);

        let apis: Vec<&str> = sources.api.iter().map(|(name, _)| name).collect();
        assert_eq!(apis, vec!["blog", "about"]);
        assert_eq!(sources.api.get("about").unwrap().model_count(), 0);

        let user = sources
            .plugins
            .get("auth")
            .and_then(|auth| auth.models.as_ref())
            .and_then(|models| models.get("user"))
            .unwrap();

        assert_eq!(user["collectionName"], "users");
        assert_eq!(user["options"]["timestamps"][1], "updatedAt");
    }

    #[test]
    fn test_declaration_order_survives_parsing() {
        let config = Config::parse(
            r#"
[api.zeta.models.b]
[api.zeta.models.a]
[api.alpha.models.c]
"#,
        )
        .unwrap();

        let declared: Vec<String> = config
            .sources
            .api
            .iter()
            .flat_map(|(api, source)| {
                source
                    .models
                    .iter()
                    .flat_map(|models| models.iter())
                    .map(move |(model, _)| format!("{}.{}", api, model))
            })
            .collect();

        assert_eq!(declared, vec!["zeta.b", "zeta.a", "alpha.c"]);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();

        assert!(config.sources.plugins.is_empty());
        assert!(config.sources.api.is_empty());
        assert_eq!(config.sources.admin.models, None);
    }

    #[test]
    fn test_extraneous_keys() {
        let raw = r#"
editor = "vim"

[admin]
title = "Admin"

[admin.models.permission]
connection = "default"
unknown = 1

[plugins.auth]
version = "1"
"#;

        let config = Config::parse(raw).unwrap();

        let extra = config.extraneous_keys(raw).unwrap();

        assert_eq!(extra, vec!["admin.title", "editor", "plugins.auth.version"]);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("plugins = 3\n").unwrap_err();

        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_demo_config_builds() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/contentreg.toml");

        let loaded = read_config(Some(path)).unwrap();
        let registry = crate::build_models_manager(&loaded.config.sources).unwrap();

        let keys: Vec<&str> = registry.keys().collect();

        assert_eq!(
            keys,
            vec![
                "auth.user",
                "auth.role",
                "upload.file",
                "admin.permission",
                "blog.post",
                "blog.category",
            ]
        );
        assert!(registry.unresolved().is_empty());
        assert!(loaded.config.extraneous_keys(&loaded.raw).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = read_config(Some(PathBuf::from("/nonexistent/contentreg.toml"))).unwrap_err();

        assert!(matches!(err, Error::Read(..)));
    }
}
