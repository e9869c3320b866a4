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

//! Near-duplicate detection (§4.3, C3): an exact sha256 fast path plus a
//! Jaccard similarity over shingled text for the fuzzy path.

pub mod shingle;

use sha2::{Digest, Sha256};

/// Hex-encoded sha256 of the raw page body, the §4.3 step 1 fast path.
pub fn exact_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    data_encoding::HEXLOWER.encode(&digest)
}
