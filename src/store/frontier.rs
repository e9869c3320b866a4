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

use crate::store::database::{COUNTER_CF, LINK_CF, PAGE_BY_URL_CF, PAGE_CF, PENDING_CF};
use crate::store::error::StoreError;
use crate::store::schema::{Link, Page, PageId, PageType, TerminalFields};
use rocksdb::DB;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;

fn page_key(id: PageId) -> [u8; 8] {
    id.to_be_bytes()
}

fn link_key(from: PageId, to: PageId) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&from.to_be_bytes());
    key[8..].copy_from_slice(&to.to_be_bytes());
    key
}

/// The durable, shared frontier of §4.5 (C5). Backs the Page table and the
/// Link edges created at enqueue time (§4.5 step 4).
///
/// Mutual exclusion for `lease()` and for the read-then-insert sequence in
/// `enqueue_discovered`/`enqueue_seed` is a single in-process [`Mutex`]
/// wrapping the two-statement critical section — the option spec §4.5 and
/// §9 explicitly sanction in place of `SELECT ... FOR UPDATE SKIP LOCKED`.
pub struct FrontierStore {
    db: Arc<DB>,
    critical_section: Mutex<()>,
}

impl FrontierStore {
    pub fn new(db: Arc<DB>) -> Self {
        Self {
            db,
            critical_section: Mutex::new(()),
        }
    }

    fn next_page_id(&self) -> Result<PageId, StoreError> {
        let cf = self.db.cf_handle(COUNTER_CF).expect("counter cf");
        let current = match self.db.get_cf(&cf, b"page")? {
            Some(bytes) => u64::from_be_bytes(bytes.as_slice().try_into().unwrap()),
            None => 0,
        };
        let next = current + 1;
        self.db.put_cf(&cf, b"page", next.to_be_bytes())?;
        Ok(next)
    }

    fn get_page(&self, id: PageId) -> Result<Option<Page>, StoreError> {
        let cf = self.db.cf_handle(PAGE_CF).expect("page cf");
        match self.db.get_cf(&cf, page_key(id))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put_page(&self, page: &Page) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(PAGE_CF).expect("page cf");
        let bytes = bincode::serialize(page)?;
        self.db.put_cf(&cf, page_key(page.id), bytes)?;
        Ok(())
    }

    fn find_by_url(&self, url: &str) -> Result<Option<PageId>, StoreError> {
        let cf = self.db.cf_handle(PAGE_BY_URL_CF).expect("page_by_url cf");
        match self.db.get_cf(&cf, url.as_bytes())? {
            Some(bytes) => Ok(Some(u64::from_be_bytes(bytes.as_slice().try_into().unwrap()))),
            None => Ok(None),
        }
    }

    fn index_url(&self, url: &str, id: PageId) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(PAGE_BY_URL_CF).expect("page_by_url cf");
        self.db.put_cf(&cf, url.as_bytes(), id.to_be_bytes())?;
        Ok(())
    }

    fn mark_pending(&self, id: PageId) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(PENDING_CF).expect("pending cf");
        self.db.put_cf(&cf, page_key(id), [])?;
        Ok(())
    }

    /// All Page rows, for export (§6).
    pub fn all_pages(&self) -> Result<Vec<Page>, StoreError> {
        let cf = self.db.cf_handle(PAGE_CF).expect("page cf");
        let mut pages = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item?;
            pages.push(bincode::deserialize(&value)?);
        }
        Ok(pages)
    }

    /// Total number of Page rows, for the §4.5 `MAX_PAGES_TABLE_ROWS` cap (P10).
    pub fn page_count(&self) -> Result<u64, StoreError> {
        let cf = self.db.cf_handle(PAGE_CF).expect("page cf");
        Ok(self
            .db
            .iterator_cf(&cf, rocksdb::IteratorMode::Start)
            .count() as u64)
    }

    /// §4.5 `enqueue_seed`: idempotent insert of a seed URL. Duplicates are
    /// silently dropped (I1, the `DuplicateUrl` kind of §7).
    pub async fn enqueue_seed(&self, url: &str) -> Result<Option<PageId>, StoreError> {
        let _guard = self.critical_section.lock().await;
        if self.find_by_url(url)?.is_some() {
            return Ok(None);
        }
        let id = self.next_page_id()?;
        let page = Page::new_frontier(id, url.to_string(), OffsetDateTime::now_utc());
        self.put_page(&page)?;
        self.index_url(url, id)?;
        self.mark_pending(id)?;
        Ok(Some(id))
    }

    /// §4.5 `enqueue_discovered`: applies the URL-length guard, the corpus
    /// cap, URL dedup, and the Link edge insert, in the order the spec lists
    /// them. `max_url_len` and `max_pages_table_rows` are the caller's
    /// configured tunables (P9, P10).
    pub async fn enqueue_discovered(
        &self,
        from_page: PageId,
        to_url: &str,
        max_url_len: usize,
        max_pages_table_rows: u64,
    ) -> Result<(), StoreError> {
        if to_url.len() > max_url_len {
            return Ok(());
        }
        let _guard = self.critical_section.lock().await;
        if self.page_count()? >= max_pages_table_rows {
            return Ok(());
        }
        let to_id = match self.find_by_url(to_url)? {
            Some(id) => id,
            None => {
                let id = self.next_page_id()?;
                let page = Page::new_frontier(id, to_url.to_string(), OffsetDateTime::now_utc());
                self.put_page(&page)?;
                self.index_url(to_url, id)?;
                self.mark_pending(id)?;
                id
            }
        };
        self.insert_link(from_page, to_id)?;
        Ok(())
    }

    fn insert_link(&self, from_page: PageId, to_page: PageId) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(LINK_CF).expect("link cf");
        let key = link_key(from_page, to_page);
        if self.db.get_cf(&cf, key)?.is_some() {
            return Ok(());
        }
        let link = Link { from_page, to_page };
        self.db.put_cf(&cf, key, bincode::serialize(&link)?)?;
        Ok(())
    }

    /// §4.5 `lease`: atomically claims the oldest unleased FRONTIER row.
    /// Ordering over [`PENDING_CF`] is by page id, which is assigned in
    /// discovery order, so it doubles as the `added_at_time` FIFO ordering
    /// the spec asks for.
    pub async fn lease(&self) -> Result<Option<Page>, StoreError> {
        let _guard = self.critical_section.lock().await;
        let pending_cf = self.db.cf_handle(PENDING_CF).expect("pending cf");
        let mut iter = self.db.iterator_cf(&pending_cf, rocksdb::IteratorMode::Start);
        let Some(first) = iter.next() else {
            return Ok(None);
        };
        let (key, _) = first?;
        let id = u64::from_be_bytes(key.as_ref().try_into().unwrap());
        let mut page = self
            .get_page(id)?
            .expect("pending index referenced a missing page");
        self.db.delete_cf(&pending_cf, &key)?;

        // If persisting the leased page below fails, the row must not end up
        // silently dropped from the pending index - restore it unless the
        // lease actually commits.
        let restore_on_drop = scopeguard::guard(&key, |key| {
            let _ = self.db.put_cf(&pending_cf, key, []);
        });
        page.active_in_crawler = Some(true);
        self.put_page(&page)?;
        scopeguard::ScopeGuard::into_inner(restore_on_drop);

        Ok(Some(page))
    }

    /// §4.5 `complete`: writes terminal fields and releases the lease.
    /// Errors with [`StoreError::NotLeased`] if the row wasn't actually held
    /// by a worker, matching "non-transitionable" in the spec.
    pub fn complete(&self, page_id: PageId, fields: TerminalFields) -> Result<(), StoreError> {
        let mut page = self.get_page(page_id)?.ok_or(StoreError::NotFound(page_id))?;
        if page.active_in_crawler != Some(true) {
            return Err(StoreError::NotLeased(page_id));
        }
        page.site_id = fields.site_id;
        page.page_type_code = fields.page_type_code;
        page.html_content = fields.html_content;
        page.hash_content = fields.hash_content;
        page.http_status_code = fields.http_status_code;
        page.accessed_time = Some(fields.accessed_time);
        page.active_in_crawler = None;
        self.put_page(&page)
    }

    /// §4.5 `reset_leases`: called once at supervisor startup (S6). Clears
    /// every stale lease and re-admits the row to the pending index.
    pub fn reset_leases(&self) -> Result<usize, StoreError> {
        let page_cf = self.db.cf_handle(PAGE_CF).expect("page cf");
        let mut reset = 0usize;
        let mut to_restore = Vec::new();
        for item in self.db.iterator_cf(&page_cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item?;
            let page: Page = bincode::deserialize(&value)?;
            if page.page_type_code == PageType::Frontier && page.active_in_crawler == Some(true) {
                to_restore.push(page.id);
            }
        }
        for id in to_restore {
            let mut page = self.get_page(id)?.expect("page vanished mid-reset");
            page.active_in_crawler = None;
            self.put_page(&page)?;
            self.mark_pending(id)?;
            reset += 1;
        }
        Ok(reset)
    }

    pub fn get(&self, id: PageId) -> Result<Option<Page>, StoreError> {
        self.get_page(id)
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
    async fn seed_is_idempotent() {
        let (_dir, db) = open();
        let frontier = FrontierStore::new(db);
        let first = frontier.enqueue_seed("http://example.gov.si/").await.unwrap();
        let second = frontier.enqueue_seed("http://example.gov.si/").await.unwrap();
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(frontier.page_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn lease_then_complete_releases_and_is_terminal() {
        let (_dir, db) = open();
        let frontier = FrontierStore::new(db);
        frontier.enqueue_seed("http://example.gov.si/").await.unwrap();
        let leased = frontier.lease().await.unwrap().unwrap();
        assert_eq!(leased.active_in_crawler, Some(true));
        assert!(frontier.lease().await.unwrap().is_none());

        frontier
            .complete(
                leased.id,
                TerminalFields {
                    site_id: Some(1),
                    page_type_code: PageType::Html,
                    html_content: Some("<html></html>".to_string()),
                    hash_content: Some("deadbeef".to_string()),
                    http_status_code: Some(200),
                    accessed_time: OffsetDateTime::now_utc(),
                },
            )
            .unwrap();

        let page = frontier.get(leased.id).unwrap().unwrap();
        assert_eq!(page.active_in_crawler, None);
        assert_eq!(page.page_type_code, PageType::Html);
    }

    #[tokio::test]
    async fn complete_without_lease_is_rejected() {
        let (_dir, db) = open();
        let frontier = FrontierStore::new(db);
        let id = frontier
            .enqueue_seed("http://example.gov.si/")
            .await
            .unwrap()
            .unwrap();
        let err = frontier.complete(
            id,
            TerminalFields {
                site_id: None,
                page_type_code: PageType::Error,
                html_content: None,
                hash_content: None,
                http_status_code: Some(500),
                accessed_time: OffsetDateTime::now_utc(),
            },
        );
        assert!(matches!(err, Err(StoreError::NotLeased(_))));
    }

    #[tokio::test]
    async fn url_too_long_is_dropped() {
        let (_dir, db) = open();
        let frontier = FrontierStore::new(db);
        let from = frontier.enqueue_seed("http://example.gov.si/").await.unwrap().unwrap();
        let long_url = format!("http://example.gov.si/{}", "a".repeat(2000));
        assert!(long_url.len() > 2000);
        frontier
            .enqueue_discovered(from, &long_url, 2000, 100_000)
            .await
            .unwrap();
        assert_eq!(frontier.page_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn corpus_cap_drops_further_enqueues() {
        let (_dir, db) = open();
        let frontier = FrontierStore::new(db);
        let from = frontier.enqueue_seed("http://example.gov.si/").await.unwrap().unwrap();
        frontier
            .enqueue_discovered(from, "http://example.gov.si/a", 2000, 1)
            .await
            .unwrap();
        // cap of 1 row was already reached by the seed itself.
        assert_eq!(frontier.page_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn reset_leases_restores_pending_rows() {
        let (_dir, db) = open();
        let frontier = FrontierStore::new(db);
        frontier.enqueue_seed("http://example.gov.si/a").await.unwrap();
        frontier.enqueue_seed("http://example.gov.si/b").await.unwrap();
        frontier.enqueue_seed("http://example.gov.si/c").await.unwrap();
        let _a = frontier.lease().await.unwrap().unwrap();
        let _b = frontier.lease().await.unwrap().unwrap();
        let _c = frontier.lease().await.unwrap().unwrap();
        assert!(frontier.lease().await.unwrap().is_none());

        let reset = frontier.reset_leases().unwrap();
        assert_eq!(reset, 3);

        let mut released = 0;
        while frontier.lease().await.unwrap().is_some() {
            released += 1;
        }
        assert_eq!(released, 3);
    }
}
