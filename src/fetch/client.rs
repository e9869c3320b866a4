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

use crate::fetch::error::FetchError;
use bytes::Bytes;
use std::time::Duration;
use url::Url;

/// A fetched response, stripped down to what the classifier and store need
/// (§4.8 C9: "returns status, headers, body").
pub struct FetchedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Thin wrapper over a pooled `reqwest::Client`. No automatic retries — a
/// transport error is always surfaced, per §4.8.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .expect("reqwest client configuration is static and valid");
        Self { client }
    }

    pub async fn get(&self, url: &Url) -> Result<FetchedResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| {
                if source.is_timeout() {
                    FetchError::Timeout(url.to_string())
                } else {
                    FetchError::Transport {
                        url: url.to_string(),
                        source,
                    }
                }
            })?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        Ok(FetchedResponse {
            status,
            content_type,
            body,
        })
    }
}
