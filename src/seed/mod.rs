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

//! Seed file loading (§6): plaintext, one URL per line, `#` marks a comment.

use std::path::Path;

/// Reads `path` and returns the non-comment, non-blank lines, trimmed.
/// A line is a comment if it starts with `#` or contains `#` anywhere.
pub fn load_seeds<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.contains('#'))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn skips_comments_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seeds.txt");
        std::fs::write(
            &path,
            "http://example.gov.si/\n# a full-line comment\n\nhttp://other.gov.si/ # trailing comment\n",
        )
        .unwrap();
        let seeds = load_seeds(&path).unwrap();
        assert_eq!(seeds, vec!["http://example.gov.si/".to_string()]);
    }
}
