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
use time::Duration;

/// The tunables from spec §6, with the same defaults named in the spec body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename(serialize = "Crawl"))]
#[serde(default)]
pub struct CrawlConfig {
    /// Only URLs whose host ends in this suffix may enter the frontier (I6).
    pub allowed_domain_suffix: String,

    /// Number of concurrent workers the supervisor spawns.
    pub number_of_workers: usize,

    /// Consecutive empty-lease attempts before a worker self-terminates.
    pub max_number_of_retries: u32,

    /// Sleep (in milliseconds) between empty-lease attempts. Spec default: 10s.
    pub empty_retry_delay_millis: u64,

    /// Jaccard similarity above which an HTML document is considered a duplicate.
    pub max_similarity: f64,

    /// Width, in tokens, of a shingle window.
    pub shingle_size: usize,

    /// Spider-trap guard: URLs longer than this are dropped at enqueue.
    pub max_url_len: usize,

    /// Aggregate cap, in bytes, on stored non-image binary payloads.
    pub max_binary_table_size: u64,

    /// Corpus cap: once the page table reaches this many rows, enqueue drops silently.
    pub max_pages_table_rows: u64,

    /// User agent string sent with every request and used for robots.txt group matching.
    pub user_agent: String,

    /// Per-request timeout for the HTTP fetcher.
    pub request_timeout: Duration,
}

impl CrawlConfig {
    pub fn empty_retry_delay(&self) -> Duration {
        Duration::milliseconds(self.empty_retry_delay_millis as i64)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            allowed_domain_suffix: ".gov.si".to_string(),
            number_of_workers: num_cpus::get().max(1),
            max_number_of_retries: 5,
            empty_retry_delay_millis: 10_000,
            max_similarity: 0.95,
            shingle_size: 10,
            max_url_len: 2000,
            max_binary_table_size: ubyte::ByteUnit::Gigabyte(1).as_u64(),
            max_pages_table_rows: 100_000,
            user_agent: "StriderCrawler/0.1".to_string(),
            request_timeout: Duration::seconds(30),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = CrawlConfig::default();
        assert_eq!(config.max_number_of_retries, 5);
        assert_eq!(config.empty_retry_delay_millis, 10_000);
        assert_eq!(config.max_similarity, 0.95);
        assert_eq!(config.shingle_size, 10);
        assert_eq!(config.max_url_len, 2000);
        assert_eq!(config.max_binary_table_size, 1024 * 1024 * 1024);
        assert_eq!(config.max_pages_table_rows, 100_000);
    }
}
