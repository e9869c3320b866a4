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

//! Robots policy (§4.2, C2) plus the site-bootstrap orchestration of §4.4
//! (C4 step 2-3): fetching robots.txt, parsing it, and walking its listed
//! sitemaps for `<loc>` URLs.

pub mod cache;
pub mod error;
pub mod policy;

pub use cache::RobotsCache;
pub use error::RobotsError;
pub use policy::RobotsPolicy;

use crate::fetch::HttpFetcher;
use crate::store::{site_registry::SiteRegistry, StoreError};
use sitemap::reader::SiteMapEntity;
use sitemap::structs::Location;
use std::io::Cursor;
use url::Url;

/// Everything discovered while bootstrapping a freshly-registered site:
/// the policy to enforce, and URLs pulled from its sitemap(s).
pub struct SiteBootstrap {
    pub policy: RobotsPolicy,
    pub sitemap_urls: Vec<String>,
}

/// §4.4 steps 2-3, run once per domain the first time a worker encounters
/// it. Subsequent workers hit the cached `Site` row instead (see
/// `from_cached`).
pub async fn bootstrap(
    fetcher: &HttpFetcher,
    sites: &SiteRegistry,
    domain: &str,
    user_agent: &str,
) -> Result<SiteBootstrap, StoreError> {
    // `domain` is `scheme://host/` (§3 Site.domain); robots.txt always lives
    // at the site root.
    let robots_url = match Url::parse(&format!("{domain}robots.txt")) {
        Ok(url) => url,
        Err(_) => {
            return Ok(SiteBootstrap {
                policy: RobotsPolicy::absent(),
                sitemap_urls: Vec::new(),
            })
        }
    };

    let robots_body = match fetcher.get(&robots_url).await {
        Ok(response)
            if response.status == 200
                && response
                    .content_type
                    .as_deref()
                    .is_some_and(|ct| ct.starts_with("text/plain")) =>
        {
            Some(String::from_utf8_lossy(&response.body).into_owned())
        }
        _ => None,
    };

    let policy = match &robots_body {
        Some(body) => RobotsPolicy::parse(user_agent, body.as_bytes()).unwrap_or_else(|_| RobotsPolicy::absent()),
        None => RobotsPolicy::absent(),
    };

    let mut sitemap_urls = Vec::new();
    let mut sitemap_bodies = Vec::new();
    for sitemap_url in policy.sitemaps() {
        let Ok(parsed) = Url::parse(&sitemap_url) else {
            continue;
        };
        let Ok(response) = fetcher.get(&parsed).await else {
            continue;
        };
        if response.status != 200 {
            continue;
        }
        let text = String::from_utf8_lossy(&response.body).into_owned();
        for entity in sitemap::reader::SiteMapReader::new(Cursor::new(text.as_bytes())) {
            match entity {
                SiteMapEntity::Url(entry) => {
                    if let Location::Url(url) = entry.loc {
                        sitemap_urls.push(url.to_string());
                    }
                }
                SiteMapEntity::SiteMap(_) => {
                    // Sitemap-index files are not recursed into; see DESIGN.md.
                }
                SiteMapEntity::Err(error) => {
                    log::debug!("sitemap entry at {sitemap_url} could not be parsed: {error}");
                }
            }
        }
        sitemap_bodies.push(text);
    }

    sites.record_policy(domain, robots_body, sitemap_bodies.into_iter().next())?;

    Ok(SiteBootstrap {
        policy,
        sitemap_urls,
    })
}

/// Rebuilds the policy from a `Site` row's cached `robots_content`, without
/// any network access (§4.6 step 3: "Parse robots (from cached text if
/// present)").
pub fn from_cached(robots_content: Option<&str>, user_agent: &str) -> RobotsPolicy {
    match robots_content {
        Some(body) => RobotsPolicy::parse(user_agent, body.as_bytes()).unwrap_or_else(|_| RobotsPolicy::absent()),
        None => RobotsPolicy::absent(),
    }
}
