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

use crate::fetch::error::RenderError;
use async_trait::async_trait;
use url::Url;

/// The headless browser is out of scope (§1): it's an opaque collaborator
/// exposing `render(url) -> html | error`. Per-worker, single-tenant (§4.8) —
/// implementations should not be shared across workers.
#[async_trait]
pub trait RenderAgent: Send + Sync {
    async fn render(&self, url: &Url, fetched_body: &str) -> Result<String, RenderError>;
}

/// Stand-in used when no real headless engine is wired in: treats the
/// already-fetched HTML body as "rendered". Adequate for sites that don't
/// depend on client-side rendering; swap in a real adapter for the rest.
pub struct PassthroughRenderAgent;

#[async_trait]
impl RenderAgent for PassthroughRenderAgent {
    async fn render(&self, _url: &Url, fetched_body: &str) -> Result<String, RenderError> {
        Ok(fetched_body.to_string())
    }
}
