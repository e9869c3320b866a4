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

use scraper::{Html, Selector};

/// Raw `href` and `src` attribute values; canonicalization and filtering
/// happen downstream (§4.1).
pub fn extract_anchors_and_images(html: &str) -> (Vec<String>, Vec<String>) {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").expect("static selector");
    let image_selector = Selector::parse("img[src]").expect("static selector");

    let anchors = document
        .select(&anchor_selector)
        .filter_map(|el| el.value().attr("href"))
        .map(str::to_string)
        .collect();
    let images = document
        .select(&image_selector)
        .filter_map(|el| el.value().attr("src"))
        .map(str::to_string)
        .collect();
    (anchors, images)
}

/// Strips markup and collapses whitespace, for shingling (§4.3).
pub fn strip_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extracts_hrefs_and_srcs() {
        let html = r#"<html><body>
            <a href="/a">A</a>
            <a href="http://outside.com/">outside</a>
            <img src="/logo.png">
        </body></html>"#;
        let (anchors, images) = extract_anchors_and_images(html);
        assert_eq!(anchors, vec!["/a".to_string(), "http://outside.com/".to_string()]);
        assert_eq!(images, vec!["/logo.png".to_string()]);
    }

    #[test]
    fn strips_tags_to_plain_text() {
        let html = "<html><body><p>Hello <b>world</b></p></body></html>";
        assert_eq!(strip_to_text(html), "Hello world");
    }
}
