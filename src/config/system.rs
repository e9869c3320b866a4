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

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

const DEFAULT_ROBOTS_CACHE_SIZE: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(256) };
const DEFAULT_SITE_CACHE_SIZE: NonZeroUsize = unsafe { NonZeroUsize::new_unchecked(1024) };

/// System-level knobs: logging and in-memory cache sizes, mirroring the
/// teacher's `config::system::SystemConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename(serialize = "System"))]
#[serde(default)]
pub struct SystemConfig {
    #[serde(default = "default_robots_cache_size")]
    pub robots_cache_size: NonZeroUsize,

    #[serde(default = "default_site_cache_size")]
    pub site_cache_size: NonZeroUsize,

    #[serde(default = "default_log_level")]
    pub log_level: log::LevelFilter,

    #[serde(default)]
    pub log_to_file: bool,
}

fn default_robots_cache_size() -> NonZeroUsize {
    DEFAULT_ROBOTS_CACHE_SIZE
}
fn default_site_cache_size() -> NonZeroUsize {
    DEFAULT_SITE_CACHE_SIZE
}
fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            robots_cache_size: default_robots_cache_size(),
            site_cache_size: default_site_cache_size(),
            log_level: default_log_level(),
            log_to_file: false,
        }
    }
}
