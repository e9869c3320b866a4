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

//! URL canonicalization and the host-suffix admission filter (§4.1, C1).

pub mod canonical;

pub use canonical::canonicalize;

/// §3 I6 / §4.6 domain filter: only URLs whose host ends in the configured
/// suffix may enter the frontier.
pub fn host_matches_suffix(url: &url::Url, suffix: &str) -> bool {
    match url.host_str() {
        Some(host) => host.to_ascii_lowercase().ends_with(&suffix.to_ascii_lowercase()),
        None => false,
    }
}
