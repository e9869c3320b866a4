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

use crate::config::{CrawlConfig, SystemConfig};
use crate::fetch::{HttpFetcher, RenderAgent};
use crate::robots::RobotsCache;
use crate::store::{Store, StoreError};
use crate::worker::Worker;
use std::sync::Arc;

/// §4/§4.6/§5 (C8): seeds the frontier, resets stale leases from a prior
/// crash, then spawns `config.number_of_workers` workers and waits for all
/// of them to self-terminate (S5, S6).
pub async fn run(
    store: Arc<Store>,
    config: CrawlConfig,
    system: SystemConfig,
    seeds: &[String],
    render_agent: Arc<dyn RenderAgent>,
) -> Result<(), StoreError> {
    let reset = store.frontier.reset_leases()?;
    if reset > 0 {
        log::info!("supervisor: reset {reset} stale lease(s) from a prior run");
    }

    for seed in seeds {
        match store.frontier.enqueue_seed(seed).await {
            Ok(Some(_)) => {}
            Ok(None) => log::debug!("supervisor: seed {seed} already present"),
            Err(err) => log::warn!("supervisor: failed to enqueue seed {seed}: {err}"),
        }
    }

    let fetcher = HttpFetcher::new(&config.user_agent, config.request_timeout.unsigned_abs());
    let robots_cache = Arc::new(RobotsCache::new(system.robots_cache_size));

    let mut handles = Vec::with_capacity(config.number_of_workers);
    for id in 0..config.number_of_workers {
        let worker = Worker {
            id,
            store: store.clone(),
            fetcher: fetcher.clone(),
            render_agent: render_agent.clone(),
            robots_cache: robots_cache.clone(),
            config: config.clone(),
        };
        handles.push(tokio::spawn(worker.run()));
    }

    for handle in handles {
        if let Err(err) = handle.await {
            log::error!("supervisor: a worker task panicked: {err}");
        }
    }

    Ok(())
}
