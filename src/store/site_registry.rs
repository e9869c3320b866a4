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

use crate::store::database::{COUNTER_CF, SITE_CF};
use crate::store::error::StoreError;
use crate::store::schema::{Site, SiteId};
use rocksdb::DB;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Per-site metadata of §3/§4.2 (C4): robots.txt body, sitemap body, last
/// crawl time. One row per registered domain.
pub struct SiteRegistry {
    db: Arc<DB>,
    creation_lock: Mutex<()>,
}

impl SiteRegistry {
    pub fn new(db: Arc<DB>) -> Self {
        Self {
            db,
            creation_lock: Mutex::new(()),
        }
    }

    fn site_key(domain: &str) -> Vec<u8> {
        domain.as_bytes().to_vec()
    }

    pub fn get(&self, domain: &str) -> Result<Option<Site>, StoreError> {
        let cf = self.db.cf_handle(SITE_CF).expect("site cf");
        match self.db.get_cf(&cf, Self::site_key(domain))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, site: &Site) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(SITE_CF).expect("site cf");
        self.db
            .put_cf(&cf, Self::site_key(&site.domain), bincode::serialize(site)?)?;
        Ok(())
    }

    fn next_site_id(&self) -> Result<SiteId, StoreError> {
        let cf = self.db.cf_handle(COUNTER_CF).expect("counter cf");
        let current = match self.db.get_cf(&cf, b"site")? {
            Some(bytes) => u64::from_be_bytes(bytes.as_slice().try_into().unwrap()),
            None => 0,
        };
        let next = current + 1;
        self.db.put_cf(&cf, b"site", next.to_be_bytes())?;
        Ok(next)
    }

    /// §4.4 step 1: fetches the registered site or registers a fresh,
    /// unpopulated one. Registration is serialized so two workers
    /// discovering the same domain at once don't allocate two rows (I2).
    ///
    /// Returns whether this call created the row. Only the caller that
    /// created it should run the robots/sitemap bootstrap of §4.4 steps
    /// 2-3 — that keeps the one-fetch-per-domain guarantee without a
    /// separate "already bootstrapped" flag.
    pub async fn get_or_create(&self, domain: &str) -> Result<(Site, bool), StoreError> {
        if let Some(site) = self.get(domain)? {
            return Ok((site, false));
        }
        let _guard = self.creation_lock.lock().await;
        if let Some(site) = self.get(domain)? {
            return Ok((site, false));
        }
        let site = Site {
            id: self.next_site_id()?,
            domain: domain.to_string(),
            robots_content: None,
            sitemap_content: None,
            last_crawled_at: None,
        };
        self.put(&site)?;
        Ok((site, true))
    }

    /// Records the robots.txt and sitemap bodies fetched during §4.2.
    pub fn record_policy(
        &self,
        domain: &str,
        robots_content: Option<String>,
        sitemap_content: Option<String>,
    ) -> Result<(), StoreError> {
        let mut site = self.get(domain)?.ok_or_else(|| StoreError::NotFound(0))?;
        site.robots_content = robots_content;
        site.sitemap_content = sitemap_content;
        self.put(&site)
    }

    /// §4.2: stamps the site with the time its first page was fetched.
    pub fn mark_crawled(&self, domain: &str, now: OffsetDateTime) -> Result<(), StoreError> {
        let mut site = self.get(domain)?.ok_or_else(|| StoreError::NotFound(0))?;
        site.last_crawled_at = Some(now);
        self.put(&site)
    }

    /// All registered sites, for export (§6).
    pub fn all_sites(&self) -> Result<Vec<Site>, StoreError> {
        let cf = self.db.cf_handle(SITE_CF).expect("site cf");
        let mut sites = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item?;
            sites.push(bincode::deserialize(&value)?);
        }
        Ok(sites)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::database::open_db;

    fn open() -> (tempfile::TempDir, Arc<DB>) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(open_db(dir.path()).unwrap());
        (dir, db)
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let (_dir, db) = open();
        let registry = SiteRegistry::new(db);
        let (a, a_created) = registry.get_or_create("example.gov.si").await.unwrap();
        let (b, b_created) = registry.get_or_create("example.gov.si").await.unwrap();
        assert_eq!(a.id, b.id);
        assert!(a_created);
        assert!(!b_created);
    }

    #[tokio::test]
    async fn mark_crawled_persists() {
        let (_dir, db) = open();
        let registry = SiteRegistry::new(db);
        registry.get_or_create("example.gov.si").await.unwrap();
        let now = OffsetDateTime::now_utc();
        registry.mark_crawled("example.gov.si", now).unwrap();
        let site = registry.get("example.gov.si").unwrap().unwrap();
        assert!(site.last_crawled_at.is_some());
    }
}
