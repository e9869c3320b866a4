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

//! Link/image/script-URL extraction from rendered HTML (§4.1, part of C1).

pub mod html;
pub mod script;

/// Everything an HTML document yielded for discovery.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractedLinks {
    pub anchors: Vec<String>,
    pub images: Vec<String>,
    pub script_urls: Vec<String>,
}

pub fn extract_all(html: &str) -> ExtractedLinks {
    use itertools::Itertools;

    let (anchors, images) = html::extract_anchors_and_images(html);
    let script_urls = script::extract_script_urls(html);
    ExtractedLinks {
        anchors: anchors.into_iter().unique().collect(),
        images: images.into_iter().unique().collect(),
        script_urls: script_urls.into_iter().unique().collect(),
    }
}
