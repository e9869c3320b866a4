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
use std::collections::HashSet;
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// Opaque durable identifiers. Plain monotonically increasing counters play
/// the role of a relational store's auto-increment primary key.
pub type SiteId = u64;
pub type PageId = u64;

/// §3 Page.page_type_code. `Frontier` is the only non-terminal variant (I3).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum PageType {
    Frontier,
    Html,
    Binary,
    Image,
    Duplicate,
    Error,
    Disallowed,
}

impl PageType {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PageType::Frontier)
    }
}

/// §6 content types recognized for non-HTML, non-image binary payloads.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum DataTypeCode {
    Pdf,
    Doc,
    Docx,
    Ppt,
    Pptx,
    Other,
}

/// §3 Site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Site {
    pub id: SiteId,
    pub domain: String,
    pub robots_content: Option<String>,
    pub sitemap_content: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_crawled_at: Option<OffsetDateTime>,
}

/// §3 Page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub site_id: Option<SiteId>,
    pub url: String,
    pub page_type_code: PageType,
    pub html_content: Option<String>,
    pub hash_content: Option<String>,
    pub http_status_code: Option<u16>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub accessed_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at_time: OffsetDateTime,
    pub active_in_crawler: Option<bool>,
}

impl Page {
    pub fn new_frontier(id: PageId, url: String, now: OffsetDateTime) -> Self {
        Self {
            id,
            site_id: None,
            url,
            page_type_code: PageType::Frontier,
            html_content: None,
            hash_content: None,
            http_status_code: None,
            accessed_time: None,
            added_at_time: now,
            active_in_crawler: None,
        }
    }
}

/// Terminal fields written by `FrontierStore::complete` (§4.5).
#[derive(Debug, Clone)]
pub struct TerminalFields {
    pub site_id: Option<SiteId>,
    pub page_type_code: PageType,
    pub html_content: Option<String>,
    pub hash_content: Option<String>,
    pub http_status_code: Option<u16>,
    pub accessed_time: OffsetDateTime,
}

/// §3 PageData (non-image binary).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageData {
    pub page_id: PageId,
    pub data_type_code: DataTypeCode,
    pub data: Vec<u8>,
    pub data_size: u64,
}

/// §3 ImageData.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageData {
    pub page_id: PageId,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub data_size: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub accessed_time: OffsetDateTime,
}

/// §3 Link: directed edge, unique per `(from_page, to_page)` pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub from_page: PageId,
    pub to_page: PageId,
}

/// §3 ContentHash (shingle index entry).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentHash {
    pub page_id: PageId,
    pub hash: HashSet<u32>,
    pub hash_length: usize,
}
