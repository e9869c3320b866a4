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

use crate::store::StoreError;
use thiserror::Error;

/// The kind a worker iteration can fail with. Fetch and render failures are
/// handled inline via `complete_error` (they map to a terminal
/// [`crate::store::PageType::Error`], per spec §7) rather than propagated
/// here; only a store failure — which the worker can't recover from — is
/// allowed to unwind out of `Worker::process`.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
