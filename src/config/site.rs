//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,
    pub static_dir: String,

    // Content API
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    pub page_size: usize,
    pub max_pages: usize,
    pub request_timeout_secs: u64,
    pub master_ref_ttl_secs: u64,

    // Normalization
    pub require_banner: bool,
    pub strict_fields: bool,

    // Reading
    pub words_per_minute: u32,

    // Date / Time format
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt_BR".to_string(),
            timezone: "UTC".to_string(),

            url: "http://localhost:3000".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            api_endpoint: String::new(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 2,
            max_pages: 50,
            request_timeout_secs: 10,
            master_ref_ttl_secs: 5,

            require_banner: true,
            strict_fields: false,

            words_per_minute: 200,

            date_format: "DD MMM YYYY".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        if self.words_per_minute == 0 {
            anyhow::bail!("words_per_minute must be at least 1");
        }
        if self.max_pages == 0 {
            anyhow::bail!("max_pages must be at least 1");
        }
        Ok(())
    }

    /// Timeout applied to every content API request
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// How long a resolved master ref is reused before asking the API again
    pub fn master_ref_ttl(&self) -> Duration {
        Duration::from_secs(self.master_ref_ttl_secs)
    }
}
