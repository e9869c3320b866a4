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

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

/// Conservative character class matching bare `http(s)://host(/path)?`
/// occurrences inside `<script>` bodies (§4.1). Deliberately not a full URL
/// grammar - it only needs to catch literal URLs JS assembles as strings.
fn script_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"https?://[A-Za-z0-9.\-]+(?:/[A-Za-z0-9._~:/?#\[\]@!$&'()*+,;=%-]*)?"#).unwrap()
    })
}

/// Scans every `<script>` element's text content for embedded URLs.
pub fn extract_script_urls(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script").expect("static selector");
    let mut found = Vec::new();
    for script in document.select(&selector) {
        let text: String = script.text().collect();
        for m in script_url_pattern().find_iter(&text) {
            found.push(m.as_str().to_string());
        }
    }
    found
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn finds_urls_embedded_in_script_text() {
        let html = r#"<html><body><script>
            var api = "https://example.gov.si/api/v1/data";
            fetch(api);
        </script></body></html>"#;
        let urls = extract_script_urls(html);
        assert_eq!(urls, vec!["https://example.gov.si/api/v1/data".to_string()]);
    }

    #[test]
    fn ignores_markup_outside_script_tags() {
        let html = r#"<html><body><p>See https://example.gov.si/ignored</p></body></html>"#;
        assert!(extract_script_urls(html).is_empty());
    }
}
