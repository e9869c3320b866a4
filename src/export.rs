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

//! JSON export of the `(site -> pages)` hierarchy and the link list (§6).
//! Out of scope for the crawl core proper, but defined at the boundary.

use crate::store::schema::{Link, Page, Site};
use crate::store::{Store, StoreError};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct SiteExport {
    site: Site,
    pages: Vec<Page>,
}

#[derive(Debug, Serialize)]
struct Export {
    sites: Vec<SiteExport>,
    links: Vec<Link>,
}

pub fn export_json(store: &Store, out: &Path) -> Result<(), ExportError> {
    let sites = store.sites.all_sites()?;
    let pages = store.frontier.all_pages()?;
    let links = store.links.all_links()?;

    let mut pages_by_site: HashMap<u64, Vec<Page>> = HashMap::new();
    for page in pages {
        if let Some(site_id) = page.site_id {
            pages_by_site.entry(site_id).or_default().push(page);
        }
    }

    let export = Export {
        sites: sites
            .into_iter()
            .map(|site| {
                let pages = pages_by_site.remove(&site.id).unwrap_or_default();
                SiteExport { site, pages }
            })
            .collect(),
        links,
    };

    let file = std::fs::File::create(out)?;
    serde_json::to_writer_pretty(file, &export)?;
    Ok(())
}
