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

//! The embedded, durable store of §3/§6. A relational schema is exposed as
//! the contract; rocksdb column families are the backend (see
//! `DESIGN.md` for why that substitution is spec-sanctioned).

pub mod database;
pub mod dedup_index;
pub mod error;
pub mod frontier;
pub mod link_graph;
pub mod schema;
pub mod site_registry;

pub use error::StoreError;
pub use schema::{PageId, SiteId};

use database::open_db;
use dedup_index::DuplicateIndex;
use frontier::FrontierStore;
use link_graph::LinkGraphStore;
use rocksdb::DB;
use site_registry::SiteRegistry;
use std::path::Path;
use std::sync::Arc;

/// Owns the shared rocksdb handle and hands out the four collaborators
/// that implement §6's table operations.
pub struct Store {
    pub frontier: FrontierStore,
    pub sites: SiteRegistry,
    pub links: LinkGraphStore,
    pub dedup: DuplicateIndex,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, database::OpenDbError> {
        let db: Arc<DB> = Arc::new(open_db(path)?);
        Ok(Self {
            frontier: FrontierStore::new(db.clone()),
            sites: SiteRegistry::new(db.clone()),
            links: LinkGraphStore::new(db.clone()),
            dedup: DuplicateIndex::new(db),
        })
    }
}
