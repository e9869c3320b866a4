// Copyright 2024 Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub mod crawl;
pub mod store;
pub mod system;

pub use crawl::CrawlConfig;
pub use store::StoreConfig;
pub use system::SystemConfig;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Aggregates the three config layers, mirroring the teacher's `Configs` split.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub store: StoreConfig,
    pub system: SystemConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            store: StoreConfig::default(),
            system: SystemConfig::default(),
        }
    }
}

impl Config {
    /// Loads a config from `path` (extension-sniffed by the `config` crate),
    /// layered with `STRIDER_*` environment overrides, mirroring the
    /// teacher's `app::config::try_load_from_path`.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let stem = path.as_ref().with_extension("");
        let built = config::Config::builder()
            .add_source(config::File::with_name(&stem.to_string_lossy()).required(false))
            .add_source(config::Environment::with_prefix("STRIDER").separator("."))
            .build()?;
        Ok(built.try_deserialize()?)
    }

    /// Loads `config.json` from `data_dir` if present, layered with
    /// `STRIDER_*` environment overrides, otherwise falls back to defaults.
    pub fn discover_or_default<P: AsRef<Path>>(data_dir: P) -> Self {
        let stem = data_dir.as_ref().join("config");
        let built = config::Config::builder()
            .add_source(config::File::with_name(&stem.to_string_lossy()).required(false))
            .add_source(config::Environment::with_prefix("STRIDER").separator("."))
            .build();
        match built.and_then(|c| c.try_deserialize()) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to assemble config under {}: {err}, using defaults", data_dir.as_ref().display());
                Self::default()
            }
        }
    }

    /// Writes the default config as pretty JSON to `data_dir/config.json`.
    pub fn write_default<P: AsRef<Path>>(data_dir: P) -> Result<PathBuf, ConfigError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let path = data_dir.as_ref().join("config.json");
        let file = std::fs::File::options()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        serde_json::to_writer_pretty(file, &Self::default()).map_err(ConfigError::Json)?;
        Ok(path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let written = Config::write_default(dir.path()).unwrap();
        assert!(written.exists());
        let loaded = Config::discover_or_default(dir.path());
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::discover_or_default(dir.path());
        assert_eq!(loaded, Config::default());
    }
}
