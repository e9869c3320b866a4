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

use std::collections::HashSet;

/// A page's shingle set (§4.3 step 2): CRC-32 hashes of each `size`-token
/// sliding window over its text, as a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShingleSet {
    hashes: HashSet<u32>,
    token_count: usize,
}

impl ShingleSet {
    /// Tokenizes on whitespace and hashes every `size`-token window. Texts
    /// shorter than `size` tokens produce a single shingle over all of them.
    pub fn compute(text: &str, size: usize) -> Self {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let size = size.max(1);
        let mut hashes = HashSet::new();
        if tokens.is_empty() {
            return Self {
                hashes,
                token_count: 0,
            };
        }
        if tokens.len() <= size {
            hashes.insert(crc32fast::hash(tokens.join(" ").as_bytes()));
        } else {
            for window in tokens.windows(size) {
                hashes.insert(crc32fast::hash(window.join(" ").as_bytes()));
            }
        }
        Self {
            hashes,
            token_count: tokens.len(),
        }
    }

    /// Rehydrates a shingle set already persisted in [`ContentHash`](crate::store::schema::ContentHash).
    pub fn from_raw(hashes: HashSet<u32>) -> Self {
        let token_count = hashes.len();
        Self { hashes, token_count }
    }

    pub fn as_set(&self) -> &HashSet<u32> {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.token_count
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Cardinality of the shingle set itself (distinct hashes), the §3
    /// `ContentHash.hash_length` quantity — not [`ShingleSet::len`], which is
    /// the token count the set was computed from.
    pub fn set_len(&self) -> usize {
        self.hashes.len()
    }

    /// `|intersection| / |union|`; `0.0` when both sets are empty.
    pub fn jaccard(&self, other: &ShingleSet) -> f64 {
        if self.hashes.is_empty() && other.hashes.is_empty() {
            return 0.0;
        }
        let intersection = self.hashes.intersection(&other.hashes).count();
        let union = self.hashes.union(&other.hashes).count();
        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn identical_text_has_similarity_one() {
        let a = ShingleSet::compute("the quick brown fox jumps over the lazy dog again", 4);
        let b = ShingleSet::compute("the quick brown fox jumps over the lazy dog again", 4);
        assert_eq!(a.jaccard(&b), 1.0);
    }

    #[test]
    fn disjoint_text_has_similarity_zero() {
        let a = ShingleSet::compute("alpha beta gamma delta epsilon zeta eta theta", 4);
        let b = ShingleSet::compute("one two three four five six seven eight", 4);
        assert_eq!(a.jaccard(&b), 0.0);
    }

    #[test]
    fn near_duplicate_text_is_above_threshold() {
        let a = ShingleSet::compute(
            "a polite crawler should respect robots.txt and crawl delay at all times",
            5,
        );
        let b = ShingleSet::compute(
            "a polite crawler should respect robots.txt and crawl delay at most times",
            5,
        );
        assert!(a.jaccard(&b) > 0.5);
    }

    #[test]
    fn empty_text_yields_empty_set() {
        let set = ShingleSet::compute("", 10);
        assert!(set.is_empty());
    }

    #[test]
    fn generated_prose_is_self_similar_but_distinct_from_other_pages() {
        let page_a = lipsum::lipsum(400);
        let page_b = lipsum::lipsum(400);
        let a1 = ShingleSet::compute(&page_a, 10);
        let a2 = ShingleSet::compute(&page_a, 10);
        assert_eq!(a1.jaccard(&a2), 1.0);

        let b = ShingleSet::compute(&page_b, 10);
        assert!(a1.jaccard(&b) < 0.5);
    }
}
