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

use crate::config::Config;
use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config as LogConfig;
use std::path::Path;

/// Configures the global logger the way the teacher's `app::logging` does:
/// console by default, a file appender under the data directory when
/// `log_to_file` is set.
pub fn configure_logging(config: &Config, data_dir: &Path) {
    let builder = LogConfig::builder();

    let builder = if config.system.log_to_file {
        let file_logger = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{l} - {d} - {t} - {m}{n}")))
            .build(data_dir.join("strider.log"))
            .expect("failed to open log file");
        builder.appender(Appender::builder().build("out", Box::new(file_logger)))
    } else {
        let console_logger = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{l} - {d} - {t} - {m}{n}")))
            .build();
        builder.appender(Appender::builder().build("out", Box::new(console_logger)))
    };

    let config = builder
        .logger(Logger::builder().build("strider", config.system.log_level))
        .build(Root::builder().appender("out").build(LevelFilter::Warn))
        .expect("failed to assemble log4rs config");

    let _ = log4rs::init_config(config);
}
