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

use crate::robots::error::RobotsError;
use std::time::Duration;
use texting_robots::Robot;

/// §4.2: the parsed robots.txt for a site, or its absence. A missing or
/// non-`text/plain` robots.txt means "all URLs allowed, no delay".
pub enum RobotsPolicy {
    Present(Robot),
    Absent,
}

impl RobotsPolicy {
    pub fn absent() -> Self {
        RobotsPolicy::Absent
    }

    /// Parses a raw robots.txt body for the given user agent.
    pub fn parse(user_agent: &str, body: &[u8]) -> Result<Self, RobotsError> {
        let robot = Robot::new(user_agent, body).map_err(|e| RobotsError::ParseFailed(format!("{e:?}")))?;
        Ok(RobotsPolicy::Present(robot))
    }

    pub fn allowed(&self, url: &str) -> bool {
        match self {
            RobotsPolicy::Present(robot) => robot.allowed(url),
            RobotsPolicy::Absent => true,
        }
    }

    pub fn crawl_delay(&self) -> Option<Duration> {
        match self {
            RobotsPolicy::Present(robot) => robot.delay.map(Duration::from_secs_f32),
            RobotsPolicy::Absent => None,
        }
    }

    pub fn sitemaps(&self) -> Vec<String> {
        match self {
            RobotsPolicy::Present(robot) => robot.sitemaps.clone(),
            RobotsPolicy::Absent => Vec::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const ROBOTS: &str = "User-agent: *\nDisallow: /private\nCrawl-delay: 2\nSitemap: http://example.gov.si/sitemap.xml\n";

    #[test]
    fn absent_allows_everything() {
        let policy = RobotsPolicy::absent();
        assert!(policy.allowed("http://example.gov.si/anything"));
        assert!(policy.crawl_delay().is_none());
        assert!(policy.sitemaps().is_empty());
    }

    #[test]
    fn parses_disallow_and_delay() {
        let policy = RobotsPolicy::parse("StriderCrawler", ROBOTS.as_bytes()).unwrap();
        assert!(!policy.allowed("http://example.gov.si/private/x"));
        assert!(policy.allowed("http://example.gov.si/public"));
        assert_eq!(policy.crawl_delay(), Some(Duration::from_secs(2)));
        assert_eq!(policy.sitemaps(), vec!["http://example.gov.si/sitemap.xml".to_string()]);
    }
}
