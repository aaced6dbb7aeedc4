//! Helper functions for rendering
//!
//! These turn view-model values into display strings: localized dates,
//! URLs and reading time.

mod date;
mod html;
mod url;

use chrono::{DateTime, Utc};

pub use date::*;
pub use html::*;
pub use url::*;

use crate::config::SiteConfig;
use crate::content::{estimate_minutes_at, ContentBlock};

/// Collection of all helper functions
pub struct Helpers {
    config: SiteConfig,
}

impl Helpers {
    /// Create a new helpers instance
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Format a publication date with the site's format, locale and time zone
    pub fn date(&self, date: Option<&DateTime<Utc>>) -> Option<String> {
        date.map(|d| {
            format_date_localized(
                d,
                &self.config.date_format,
                &self.config.language,
                &self.config.timezone,
            )
        })
    }

    /// Get url_for helper
    pub fn url_for(&self, path: &str) -> String {
        url_for(&self.config, path)
    }

    /// Get post_url helper
    pub fn post_url(&self, uid: &str) -> String {
        post_url(&self.config, uid)
    }

    /// Get post_permalink helper
    pub fn post_permalink(&self, uid: &str) -> String {
        post_permalink(&self.config, uid)
    }

    /// Get listing_url helper
    pub fn listing_url(&self, pages: usize) -> String {
        listing_url(&self.config, pages)
    }

    /// Get listing_page_url helper
    pub fn listing_page_url(&self, pages: usize) -> String {
        listing_page_url(&self.config, pages)
    }

    /// Reading time in minutes at the configured speed
    pub fn reading_time(&self, content: &[ContentBlock]) -> u32 {
        estimate_minutes_at(content, self.config.words_per_minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_uses_config() {
        let helpers = Helpers::new(SiteConfig {
            language: "en_US".to_string(),
            timezone: "America/Sao_Paulo".to_string(),
            date_format: "DD MMM YYYY".to_string(),
            ..Default::default()
        });
        let date = Utc.with_ymd_and_hms(2021, 3, 26, 1, 0, 0).unwrap();
        assert_eq!(helpers.date(Some(&date)).as_deref(), Some("25 Mar 2021"));
        assert_eq!(helpers.date(None), None);
    }
}
