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

/// Connection parameters for the durable backend, named the way spec §6 names
/// them (`{user, password, host, database}`) even though this port backs the
/// relational contract with an embedded column-family store — see DESIGN.md.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename(serialize = "Store"))]
#[serde(default)]
pub struct StoreConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,

    /// Directory the embedded column-family store opens on disk.
    pub data_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            user: "crawler".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            database: "strider".to_string(),
            data_dir: "./strider-data".to_string(),
        }
    }
}
