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

use crate::dedup::shingle::ShingleSet;
use crate::store::database::{CONTENT_HASH_CF, HASH_INDEX_CF};
use crate::store::error::StoreError;
use crate::store::schema::{ContentHash, PageId};
use rocksdb::DB;
use std::sync::Arc;

/// Durable side of the §4.3 near-duplicate check (C3): the exact-hash index
/// for the fast path, and the shingle sets candidates are compared against.
pub struct DuplicateIndex {
    db: Arc<DB>,
}

impl DuplicateIndex {
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }

    /// §4.3 step 1: exact sha256 match against a prior page, if any.
    pub fn find_by_exact_hash(&self, hash_hex: &str) -> Result<Option<PageId>, StoreError> {
        let cf = self.db.cf_handle(HASH_INDEX_CF).expect("hash_index cf");
        match self.db.get_cf(&cf, hash_hex.as_bytes())? {
            Some(bytes) => Ok(Some(u64::from_be_bytes(bytes.as_slice().try_into().unwrap()))),
            None => Ok(None),
        }
    }

    /// §4.3 step 2: highest Jaccard similarity between `candidate` and any
    /// previously indexed shingle set, and the page it belongs to. `None` if
    /// the index is empty.
    pub fn max_similarity(&self, candidate: &ShingleSet) -> Result<Option<(PageId, f64)>, StoreError> {
        let cf = self.db.cf_handle(CONTENT_HASH_CF).expect("content_hash cf");
        let mut best: Option<(PageId, f64)> = None;
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_, value) = item?;
            let stored: ContentHash = bincode::deserialize(&value)?;
            let other = ShingleSet::from_raw(stored.hash);
            let similarity = candidate.jaccard(&other);
            if best.map_or(true, |(_, best_sim)| similarity > best_sim) {
                best = Some((stored.page_id, similarity));
            }
        }
        Ok(best)
    }

    /// Persists `(page_id, shingle set)` into the corpus index, per §4.3
    /// step 4 ("regardless of the outcome").
    pub fn insert_signature(&self, page_id: PageId, hash_hex: &str, shingles: &ShingleSet) -> Result<(), StoreError> {
        let hash_cf = self.db.cf_handle(HASH_INDEX_CF).expect("hash_index cf");
        self.db.put_cf(&hash_cf, hash_hex.as_bytes(), page_id.to_be_bytes())?;

        let content_cf = self.db.cf_handle(CONTENT_HASH_CF).expect("content_hash cf");
        let entry = ContentHash {
            page_id,
            hash: shingles.as_set().clone(),
            hash_length: shingles.set_len(),
        };
        self.db
            .put_cf(&content_cf, page_id.to_be_bytes(), bincode::serialize(&entry)?)?;
        Ok(())
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

    #[test]
    fn exact_hash_roundtrips() {
        let (_dir, db) = open();
        let index = DuplicateIndex::new(db);
        let shingles = ShingleSet::compute("the quick brown fox jumps over the lazy dog", 3);
        index.insert_signature(7, "deadbeef", &shingles).unwrap();
        assert_eq!(index.find_by_exact_hash("deadbeef").unwrap(), Some(7));
        assert_eq!(index.find_by_exact_hash("cafebabe").unwrap(), None);
    }

    #[test]
    fn max_similarity_finds_the_closest_match() {
        let (_dir, db) = open();
        let index = DuplicateIndex::new(db);
        let a = ShingleSet::compute("one two three four five six seven eight nine ten", 3);
        let b = ShingleSet::compute("completely different words with no overlap at all whatsoever", 3);
        index.insert_signature(1, "hash-a", &a).unwrap();
        index.insert_signature(2, "hash-b", &b).unwrap();

        let probe = ShingleSet::compute("one two three four five six seven eight nine ten", 3);
        let (page_id, similarity) = index.max_similarity(&probe).unwrap().unwrap();
        assert_eq!(page_id, 1);
        assert!(similarity > 0.99);
    }
}
