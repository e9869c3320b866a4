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

use crate::store::database::{IMAGE_CF, LINK_CF, PAGE_DATA_CF};
use crate::store::error::StoreError;
use crate::store::schema::{ImageData, Link, PageData, PageId};
use rocksdb::DB;
use std::sync::Arc;

/// Link edges and the non-HTML artifacts hung off a completed page (C6):
/// binary payloads and images. Backs §6's `link`, `page_data` and `image`
/// tables.
pub struct LinkGraphStore {
    db: Arc<DB>,
}

impl LinkGraphStore {
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }

    pub fn insert_page_data(&self, data: &PageData) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(PAGE_DATA_CF).expect("page_data cf");
        self.db
            .put_cf(&cf, data.page_id.to_be_bytes(), bincode::serialize(data)?)?;
        Ok(())
    }

    pub fn insert_image_data(&self, data: &ImageData) -> Result<(), StoreError> {
        let cf = self.db.cf_handle(IMAGE_CF).expect("image cf");
        self.db
            .put_cf(&cf, data.page_id.to_be_bytes(), bincode::serialize(data)?)?;
        Ok(())
    }

    /// All link edges, for export (§6).
    pub fn all_links(&self) -> Result<Vec<Link>, StoreError> {
        let cf = self.db.cf_handle(LINK_CF).expect("link cf");
        let mut links = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item?;
            links.push(bincode::deserialize(&value)?);
        }
        Ok(links)
    }

    /// Cumulative size of stored binary payloads, for the §4.5
    /// `MAX_BINARY_TABLE_SIZE` cap (P11).
    pub fn binary_table_size(&self) -> Result<u64, StoreError> {
        let cf = self.db.cf_handle(PAGE_DATA_CF).expect("page_data cf");
        let mut total = 0u64;
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item?;
            let data: PageData = bincode::deserialize(&value)?;
            total += data.data_size;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::database::open_db;
    use crate::store::schema::DataTypeCode;

    fn open() -> (tempfile::TempDir, Arc<DB>) {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(open_db(dir.path()).unwrap());
        (dir, db)
    }

    #[test]
    fn all_links_lists_every_edge() {
        let (_dir, db) = open();
        let cf = db.cf_handle(LINK_CF).unwrap();
        for link in [Link { from_page: 1, to_page: 2 }, Link { from_page: 1, to_page: 3 }] {
            let mut key = [0u8; 16];
            key[..8].copy_from_slice(&link.from_page.to_be_bytes());
            key[8..].copy_from_slice(&link.to_page.to_be_bytes());
            db.put_cf(&cf, key, bincode::serialize(&link).unwrap()).unwrap();
        }
        let graph = LinkGraphStore::new(db);
        let mut targets: Vec<PageId> = graph.all_links().unwrap().into_iter().map(|l| l.to_page).collect();
        targets.sort();
        assert_eq!(targets, vec![2, 3]);
    }

    #[test]
    fn binary_table_size_accumulates() {
        let (_dir, db) = open();
        let graph = LinkGraphStore::new(db);
        graph
            .insert_page_data(&PageData {
                page_id: 1,
                data_type_code: DataTypeCode::Pdf,
                data: vec![0u8; 10],
                data_size: 10,
            })
            .unwrap();
        graph
            .insert_page_data(&PageData {
                page_id: 2,
                data_type_code: DataTypeCode::Docx,
                data: vec![0u8; 20],
                data_size: 20,
            })
            .unwrap();
        assert_eq!(graph.binary_table_size().unwrap(), 30);
    }
}
