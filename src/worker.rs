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

use crate::classify::{classify, Classification};
use crate::config::CrawlConfig;
use crate::dedup;
use crate::dedup::shingle::ShingleSet;
use crate::extraction::{extract_all, html::strip_to_text};
use crate::fetch::{HttpFetcher, RenderAgent};
use crate::robots;
use crate::robots::policy::RobotsPolicy;
use crate::robots::RobotsCache;
use crate::store::schema::{DataTypeCode, ImageData, Page, PageData, PageType, TerminalFields};
use crate::store::Store;
use crate::url::{canonicalize, host_matches_suffix};
use std::sync::Arc;
use time::OffsetDateTime;
use url::Url;

/// §4.6 (C7): the per-worker lease -> fetch -> classify -> persist ->
/// discover -> enqueue loop.
pub struct Worker {
    pub id: usize,
    pub store: Arc<Store>,
    pub fetcher: HttpFetcher,
    pub render_agent: Arc<dyn RenderAgent>,
    pub robots_cache: Arc<RobotsCache>,
    pub config: CrawlConfig,
}

impl Worker {
    /// Runs until `config.max_number_of_retries` consecutive empty leases
    /// have elapsed (§4.6 step 1, §5).
    pub async fn run(self) {
        let mut empty_retries = 0u32;
        loop {
            match self.store.frontier.lease().await {
                Ok(Some(page)) => {
                    empty_retries = 0;
                    let page_id = page.id;
                    if let Err(err) = self.process(page).await {
                        log::warn!("worker {}: iteration for page {page_id} failed: {err}", self.id);
                    }
                }
                Ok(None) => {
                    empty_retries += 1;
                    if empty_retries >= self.config.max_number_of_retries {
                        log::info!(
                            "worker {}: exiting after {empty_retries} empty leases",
                            self.id
                        );
                        return;
                    }
                    tokio::time::sleep(self.config.empty_retry_delay().unsigned_abs()).await;
                }
                Err(err) => {
                    log::error!("worker {}: lease failed: {err}", self.id);
                    tokio::time::sleep(self.config.empty_retry_delay().unsigned_abs()).await;
                }
            }
        }
    }

    async fn process(&self, page: Page) -> crate::error::Result<()> {
        let url = match Url::parse(&page.url) {
            Ok(url) => url,
            Err(_) => {
                return self.complete_error(page.id, None);
            }
        };
        let Some(domain) = domain_of(&url) else {
            return self.complete_error(page.id, None);
        };

        let (site, created) = self.store.sites.get_or_create(&domain).await?;
        let policy = if created {
            let bootstrap = robots::bootstrap(&self.fetcher, &self.store.sites, &domain, &self.config.user_agent)
                .await?;
            for sitemap_url in &bootstrap.sitemap_urls {
                if let Some(canonical) = canonicalize(sitemap_url, &url) {
                    if host_matches_suffix(&canonical, &self.config.allowed_domain_suffix) {
                        let _ = self.store.frontier.enqueue_seed(canonical.as_str()).await;
                    }
                }
            }
            let policy = Arc::new(bootstrap.policy);
            self.robots_cache.put(&domain, policy.clone()).await;
            policy
        } else {
            self.robots_cache
                .get_or_parse(&domain, site.robots_content.as_deref(), &self.config.user_agent)
                .await
        };

        if !policy.allowed(page.url.as_str()) {
            self.complete(
                page.id,
                TerminalFields {
                    site_id: Some(site.id),
                    page_type_code: PageType::Disallowed,
                    html_content: None,
                    hash_content: None,
                    http_status_code: Some(500),
                    accessed_time: OffsetDateTime::now_utc(),
                },
            )?;
            return Ok(());
        }

        self.enforce_crawl_delay(&site, &policy).await;

        let response = match self.fetcher.get(&url).await {
            Ok(response) => response,
            Err(_) => {
                return self.complete_error(page.id, Some(site.id));
            }
        };

        let content_type = response.content_type.clone().unwrap_or_default();
        match classify(&content_type) {
            Classification::Html => self.handle_html(&page, &site, &url, &response.body).await?,
            Classification::Image => {
                let filename = url
                    .path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .filter(|s| !s.is_empty())
                    .unwrap_or("image")
                    .to_string();
                let data_size = response.body.len() as u64;
                self.store.links.insert_image_data(&ImageData {
                    page_id: page.id,
                    filename,
                    content_type: content_type.clone(),
                    data: response.body.to_vec(),
                    data_size,
                    accessed_time: OffsetDateTime::now_utc(),
                })?;
                self.complete(
                    page.id,
                    TerminalFields {
                        site_id: Some(site.id),
                        page_type_code: PageType::Image,
                        html_content: None,
                        hash_content: None,
                        http_status_code: Some(response.status),
                        accessed_time: OffsetDateTime::now_utc(),
                    },
                )?;
            }
            Classification::Binary(data_type_code) => {
                self.persist_binary(page.id, data_type_code, &response.body)?;
                self.complete(
                    page.id,
                    TerminalFields {
                        site_id: Some(site.id),
                        page_type_code: PageType::Binary,
                        html_content: None,
                        hash_content: None,
                        http_status_code: Some(response.status),
                        accessed_time: OffsetDateTime::now_utc(),
                    },
                )?;
            }
            Classification::UnrecognizedBinary => {
                self.complete(
                    page.id,
                    TerminalFields {
                        site_id: Some(site.id),
                        page_type_code: PageType::Binary,
                        html_content: None,
                        hash_content: None,
                        http_status_code: Some(response.status),
                        accessed_time: OffsetDateTime::now_utc(),
                    },
                )?;
            }
        }

        self.store.sites.mark_crawled(&domain, OffsetDateTime::now_utc())?;
        Ok(())
    }

    async fn enforce_crawl_delay(&self, site: &crate::store::schema::Site, policy: &RobotsPolicy) {
        let Some(delay) = policy.crawl_delay() else {
            return;
        };
        let Some(last_crawled) = site.last_crawled_at else {
            return;
        };
        let now = OffsetDateTime::now_utc();
        let next_allowed = last_crawled + time::Duration::try_from(delay).unwrap_or(time::Duration::ZERO);
        if next_allowed > now {
            let remaining = (next_allowed - now).unsigned_abs();
            tokio::time::sleep(remaining).await;
        }
    }

    async fn handle_html(
        &self,
        page: &Page,
        site: &crate::store::schema::Site,
        url: &Url,
        body: &[u8],
    ) -> crate::error::Result<()> {
        let fetched_body = String::from_utf8_lossy(body).into_owned();
        let rendered = match self.render_agent.render(url, &fetched_body).await {
            Ok(html) => html,
            Err(_) => {
                return self.complete_error(page.id, Some(site.id));
            }
        };

        let hash_hex = dedup::exact_hash(&rendered);
        let stripped = strip_to_text(&rendered);
        let shingles = ShingleSet::compute(&stripped, self.config.shingle_size);

        let is_duplicate = self.store.dedup.find_by_exact_hash(&hash_hex)?.is_some()
            || self
                .store
                .dedup
                .max_similarity(&shingles)?
                .is_some_and(|(_, similarity)| similarity > self.config.max_similarity);

        if is_duplicate {
            self.complete(
                page.id,
                TerminalFields {
                    site_id: Some(site.id),
                    page_type_code: PageType::Duplicate,
                    html_content: None,
                    hash_content: Some(hash_hex),
                    http_status_code: Some(200),
                    accessed_time: OffsetDateTime::now_utc(),
                },
            )?;
            return Ok(());
        }

        self.store.dedup.insert_signature(page.id, &hash_hex, &shingles)?;

        let extracted = extract_all(&rendered);
        for raw in extracted.anchors.into_iter().chain(extracted.script_urls) {
            self.discover(page.id, &raw, url).await;
        }
        for raw in extracted.images {
            self.discover(page.id, &raw, url).await;
        }

        self.complete(
            page.id,
            TerminalFields {
                site_id: Some(site.id),
                page_type_code: PageType::Html,
                html_content: Some(rendered),
                hash_content: Some(hash_hex),
                http_status_code: Some(200),
                accessed_time: OffsetDateTime::now_utc(),
            },
        )?;
        Ok(())
    }

    async fn discover(&self, from_page: u64, raw: &str, base: &Url) {
        let Some(canonical) = canonicalize(raw, base) else {
            return;
        };
        if !host_matches_suffix(&canonical, &self.config.allowed_domain_suffix) {
            return;
        }
        if let Err(err) = self
            .store
            .frontier
            .enqueue_discovered(
                from_page,
                canonical.as_str(),
                self.config.max_url_len,
                self.config.max_pages_table_rows,
            )
            .await
        {
            log::warn!("worker {}: failed to enqueue {canonical}: {err}", self.id);
        }
    }

    fn persist_binary(&self, page_id: u64, data_type_code: DataTypeCode, body: &[u8]) -> crate::error::Result<()> {
        let data_size = body.len() as u64;
        if self.store.links.binary_table_size()? + data_size > self.config.max_binary_table_size {
            log::info!("worker {}: binary table cap reached, dropping payload for page {page_id}", self.id);
            return Ok(());
        }
        self.store.links.insert_page_data(&PageData {
            page_id,
            data_type_code,
            data: body.to_vec(),
            data_size,
        })?;
        Ok(())
    }

    fn complete(&self, page_id: u64, fields: TerminalFields) -> crate::error::Result<()> {
        self.store.frontier.complete(page_id, fields)?;
        Ok(())
    }

    fn complete_error(&self, page_id: u64, site_id: Option<u64>) -> crate::error::Result<()> {
        self.complete(
            page_id,
            TerminalFields {
                site_id,
                page_type_code: PageType::Error,
                html_content: None,
                hash_content: None,
                http_status_code: Some(500),
                accessed_time: OffsetDateTime::now_utc(),
            },
        )
    }
}

/// `scheme://host/`, the §3 Site.domain shape.
fn domain_of(url: &Url) -> Option<String> {
    Some(format!("{}://{}/", url.scheme(), url.host_str()?))
}
