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

use rocksdb::{BlockBasedOptions, Options, SliceTransform, DB};
use std::path::Path;
use thiserror::Error;

/// Sites keyed by domain.
pub const SITE_CF: &str = "site";
/// Pages keyed by `page_id`, the frontier/lease table of §4.5.
pub const PAGE_CF: &str = "page";
/// Secondary index: canonical url -> page_id, enforcing I1.
pub const PAGE_BY_URL_CF: &str = "page_by_url";
/// Non-image binary payloads keyed by `page_id`.
pub const PAGE_DATA_CF: &str = "page_data";
/// Image payloads keyed by `page_id`.
pub const IMAGE_CF: &str = "image";
/// Link edges keyed by `from_page:to_page`.
pub const LINK_CF: &str = "link";
/// Shingle sets keyed by `page_id`, the corpus index of §4.3.
pub const CONTENT_HASH_CF: &str = "content_hash";
/// Exact-hash index: hex sha256 -> page_id, for the fast path of §4.3 step 1.
pub const HASH_INDEX_CF: &str = "hash_index";
/// Monotonic id counters (`page`, `site`).
pub const COUNTER_CF: &str = "counter";
/// Secondary index of leaseable FRONTIER page ids, in discovery order. Lets
/// `lease()` scan only the still-pending subset instead of the whole table.
pub const PENDING_CF: &str = "pending";

pub const ALL_COLUMN_FAMILIES: [&str; 10] = [
    SITE_CF,
    PAGE_CF,
    PAGE_BY_URL_CF,
    PAGE_DATA_CF,
    IMAGE_CF,
    LINK_CF,
    CONTENT_HASH_CF,
    HASH_INDEX_CF,
    COUNTER_CF,
    PENDING_CF,
];

#[derive(Debug, Error)]
pub enum OpenDbError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    RocksDb(#[from] rocksdb::Error),
}

fn db_options() -> Options {
    let mut options = Options::default();
    options.create_if_missing(true);
    options.create_missing_column_families(true);
    options
}

fn page_cf_options() -> Options {
    let mut options = Options::default();
    options.create_if_missing(true);
    options.create_missing_column_families(true);
    // Pages are read back by id constantly (lease scans, completion) - a
    // bloom filter on the whole key pays for itself.
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_bloom_filter(10.0, true);
    block_opts.set_whole_key_filtering(true);
    options.set_block_based_table_factory(&block_opts);
    options
}

fn link_cf_options() -> Options {
    let mut options = Options::default();
    options.create_if_missing(true);
    options.create_missing_column_families(true);
    // Keys are `from_page:to_page`; prefix scans over `from_page` are common
    // when walking the link graph for export.
    options.set_prefix_extractor(SliceTransform::create_fixed_prefix(8));
    options
}

fn default_cf_options() -> Options {
    let mut options = Options::default();
    options.create_if_missing(true);
    options.create_missing_column_families(true);
    options
}

/// Opens the embedded store the way the teacher's `database::open_db` does,
/// with one column family per logical table of §3/§6.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<DB, OpenDbError> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    let cf_descriptors = vec![
        rocksdb::ColumnFamilyDescriptor::new(SITE_CF, default_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(PAGE_CF, page_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(PAGE_BY_URL_CF, default_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(PAGE_DATA_CF, default_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(IMAGE_CF, default_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(LINK_CF, link_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(CONTENT_HASH_CF, default_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(HASH_INDEX_CF, default_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(COUNTER_CF, default_cf_options()),
        rocksdb::ColumnFamilyDescriptor::new(PENDING_CF, default_cf_options()),
    ];
    Ok(DB::open_cf_descriptors(&db_options(), path, cf_descriptors)?)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn opens_with_all_column_families() {
        let dir = tempfile::tempdir().unwrap();
        let db = open_db(dir.path()).unwrap();
        for cf in ALL_COLUMN_FAMILIES {
            assert!(db.cf_handle(cf).is_some(), "missing cf {cf}");
        }
    }
}
