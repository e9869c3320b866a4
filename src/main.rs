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

//! A polite, multi-worker web crawler scoped to a single top-level domain
//! suffix. See `DESIGN.md` for how this crate's pieces map onto the system
//! it implements.

mod app;
mod classify;
mod config;
mod dedup;
mod error;
mod export;
mod extraction;
mod fetch;
mod robots;
mod seed;
mod store;
mod supervisor;
mod url;
mod worker;

use app::StriderArgs;
use clap::Parser;

fn main() {
    app::exec_args(StriderArgs::parse());
}
