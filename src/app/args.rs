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

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "A polite, suffix-scoped web crawler", long_about = None)]
pub struct StriderArgs {
    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Crawl the seeds to completion.
    Crawl {
        /// Plaintext seed file, one URL per line; `#` starts a comment.
        seeds: String,
        /// Optional config.json to load instead of the data dir's default.
        #[arg(short, long)]
        config: Option<String>,
        /// Directory the embedded store opens; also where config.json lives.
        #[arg(short, long, default_value = "./strider-data")]
        data_dir: String,
        /// Overrides `crawl.number_of_workers` from the config.
        #[arg(short, long)]
        workers: Option<usize>,
        /// Overrides `crawl.allowed_domain_suffix` from the config.
        #[arg(long)]
        suffix: Option<String>,
        /// Log to a file under the data directory instead of the console.
        #[arg(long)]
        log_to_file: bool,
    },
    /// Writes a default config.json into the data directory.
    Init {
        #[arg(short, long, default_value = "./strider-data")]
        data_dir: String,
    },
    /// Dumps the site/page hierarchy and link list as JSON (see spec §6).
    Export {
        #[arg(short, long, default_value = "./strider-data")]
        data_dir: String,
        #[arg(short, long)]
        out: String,
    },
}
