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

use url::Url;

const REJECTED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// Normalizes a raw href/src into an absolute, fragment-free `http(s)` URL,
/// or `None` if it should be dropped.
///
/// Relative references resolve against `base` — the page the link was found
/// on — per RFC 3986. The distilled rule this replaces resolved against the
/// site's domain instead of the page's own URL; §9 calls that out as a
/// known bug in the source to fix, not preserve, so this port resolves
/// against `base` (see `DESIGN.md`).
pub fn canonicalize(raw: &str, base: &Url) -> Option<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if REJECTED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }
    if trimmed.starts_with('#') || trimmed == "/" {
        return None;
    }

    let candidate = if lower.starts_with("www.") {
        format!("http://{trimmed}")
    } else {
        trimmed.to_string()
    };

    let mut resolved = match Url::parse(&candidate) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(&candidate).ok()?,
        Err(_) => return None,
    };

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

#[cfg(test)]
mod test {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.gov.si/some/page").unwrap()
    }

    #[test]
    fn rejects_empty_and_fragment_only() {
        assert!(canonicalize("", &base()).is_none());
        assert!(canonicalize("#section", &base()).is_none());
        assert!(canonicalize("/", &base()).is_none());
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(canonicalize("javascript:void(0)", &base()).is_none());
        assert!(canonicalize("mailto:a@b.si", &base()).is_none());
        assert!(canonicalize("tel:+38612345", &base()).is_none());
        assert!(canonicalize("data:image/png;base64,aaaa", &base()).is_none());
    }

    #[test]
    fn prefixes_www_with_scheme() {
        let url = canonicalize("www.example.gov.si/x", &base()).unwrap();
        assert_eq!(url.as_str(), "http://www.example.gov.si/x");
    }

    #[test]
    fn resolves_root_relative_against_base_host() {
        let url = canonicalize("/a", &base()).unwrap();
        assert_eq!(url.as_str(), "http://example.gov.si/a");
    }

    #[test]
    fn resolves_path_relative_against_base_path() {
        let url = canonicalize("child", &base()).unwrap();
        assert_eq!(url.as_str(), "http://example.gov.si/some/child");
    }

    #[test]
    fn strips_fragment() {
        let url = canonicalize("http://example.gov.si/a#top", &base()).unwrap();
        assert_eq!(url.as_str(), "http://example.gov.si/a");
    }

    #[test]
    fn is_idempotent() {
        let once = canonicalize("http://example.gov.si/a?x=1#top", &base()).unwrap();
        let twice = canonicalize(once.as_str(), &base()).unwrap();
        assert_eq!(once, twice);
    }
}
