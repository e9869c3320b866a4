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

use thiserror::Error;

/// The `DatabaseTransient` kind of spec §7 plus the handful of in-process
/// invariants a caller can violate (e.g. completing a lease it doesn't hold).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    RocksDb(#[from] rocksdb::Error),

    #[error(transparent)]
    Serialization(#[from] Box<bincode::ErrorKind>),

    #[error("page {0} was not leased by this worker")]
    NotLeased(crate::store::PageId),

    #[error("page {0} does not exist")]
    NotFound(crate::store::PageId),
}
