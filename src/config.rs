//! Storage configuration, layered with Figment.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. A TOML file, when given
//! 3. `DOCUMENTDB_*` environment variables (e.g. `DOCUMENTDB_DATABASE_NAME`)

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::document::{collection_uri, database_uri};

const ENV_PREFIX: &str = "DOCUMENTDB_";

/// Where the versioned collections live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_name: String,
    pub profiles_collection: String,
    pub services_collection: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_name: "notifications".into(),
            profiles_collection: "profiles".into(),
            services_collection: "services".into(),
        }
    }
}

impl StorageConfig {
    pub fn database_uri(&self) -> String {
        database_uri(&self.database_name)
    }

    pub fn profiles_collection_uri(&self) -> String {
        collection_uri(&self.database_uri(), &self.profiles_collection)
    }

    pub fn services_collection_uri(&self) -> String {
        collection_uri(&self.database_uri(), &self.services_collection)
    }
}

/// Load configuration from defaults and the environment.
pub fn load_config() -> Result<StorageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StorageConfig::default()))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
}

/// Load configuration from a TOML file, with environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<StorageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StorageConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
}

/// Load configuration from TOML text only.
pub fn load_config_from_str(toml_content: &str) -> Result<StorageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StorageConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}
