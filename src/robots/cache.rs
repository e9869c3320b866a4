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

use crate::robots::{self, RobotsPolicy};
use moka::future::Cache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// In-memory front for the policy §4.6 step 3 re-derives from `Site.robots_content`
/// on every lease. Workers share one cache so the common case - many pages
/// on the same site in a row - parses robots.txt once, not once per page.
#[derive(Clone)]
pub struct RobotsCache {
    inner: Cache<String, Arc<RobotsPolicy>>,
}

impl RobotsCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Cache::new(capacity.get() as u64),
        }
    }

    /// Records a freshly-bootstrapped policy (the §4.4 step 2-3 creator's
    /// path), skipping a redundant re-parse.
    pub async fn put(&self, domain: &str, policy: Arc<RobotsPolicy>) {
        self.inner.insert(domain.to_string(), policy).await;
    }

    /// Returns the cached policy, or parses `robots_content` and caches it.
    pub async fn get_or_parse(&self, domain: &str, robots_content: Option<&str>, user_agent: &str) -> Arc<RobotsPolicy> {
        if let Some(cached) = self.inner.get(domain).await {
            return cached;
        }
        let policy = Arc::new(robots::from_cached(robots_content, user_agent));
        self.inner.insert(domain.to_string(), policy.clone()).await;
        policy
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn reuses_a_put_policy() {
        let cache = RobotsCache::new(NonZeroUsize::new(8).unwrap());
        let policy = Arc::new(RobotsPolicy::absent());
        cache.put("http://example.gov.si/", policy.clone()).await;
        let fetched = cache.get_or_parse("http://example.gov.si/", Some("User-agent: *\nDisallow: /x"), "agent").await;
        assert!(fetched.allowed("http://example.gov.si/x"));
    }

    #[tokio::test]
    async fn parses_and_caches_on_miss() {
        let cache = RobotsCache::new(NonZeroUsize::new(8).unwrap());
        let fetched = cache
            .get_or_parse("http://example.gov.si/", Some("User-agent: *\nDisallow: /private"), "agent")
            .await;
        assert!(!fetched.allowed("http://example.gov.si/private/x"));
    }
}
