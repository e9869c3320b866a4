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

pub mod args;
pub mod logging;

use crate::config::Config;
use crate::export::export_json;
use crate::fetch::{PassthroughRenderAgent, RenderAgent};
use crate::store::Store;
use crate::{seed, supervisor};
use anyhow::Context;
pub use args::{Mode, StriderArgs};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level dispatch, mirroring the teacher's `app::exec_args`.
pub fn exec_args(args: StriderArgs) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    if let Err(err) = runtime.block_on(execute(args.mode)) {
        log::error!("exit with error: {err:#}");
    }
}

async fn execute(mode: Mode) -> anyhow::Result<()> {
    match mode {
        Mode::Init { data_dir } => {
            let path = Config::write_default(&data_dir).context("writing default config")?;
            println!("wrote default config to {}", path.display());
            Ok(())
        }
        Mode::Export { data_dir, out } => {
            let store = Store::open(&data_dir).context("opening store")?;
            export_json(&store, &PathBuf::from(out)).context("exporting")?;
            Ok(())
        }
        Mode::Crawl {
            seeds,
            config,
            data_dir,
            workers,
            suffix,
            log_to_file,
        } => {
            let mut config = match config {
                Some(path) => Config::load_from(&path).context("loading config")?,
                None => Config::discover_or_default(&data_dir),
            };
            if let Some(workers) = workers {
                config.crawl.number_of_workers = workers;
            }
            if let Some(suffix) = suffix {
                config.crawl.allowed_domain_suffix = suffix;
            }
            if log_to_file {
                config.system.log_to_file = true;
            }

            logging::configure_logging(&config, std::path::Path::new(&data_dir));

            let store = Arc::new(Store::open(&config.store.data_dir).context("opening store")?);
            let seed_urls = seed::load_seeds(&seeds).context("loading seed file")?;
            let render_agent: Arc<dyn RenderAgent> = Arc::new(PassthroughRenderAgent);

            let crawl_config = config.crawl.clone();
            let system_config = config.system.clone();
            let supervisor_future = supervisor::run(store, crawl_config, system_config, &seed_urls, render_agent);
            tokio::pin!(supervisor_future);

            tokio::select! {
                result = &mut supervisor_future => {
                    result.context("crawl run failed")?;
                    log::info!("crawl finished");
                }
                _ = tokio::signal::ctrl_c() => {
                    log::info!("received ctrl-c, letting in-flight workers wind down");
                }
            }
            Ok(())
        }
    }
}
