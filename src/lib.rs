//! spacetraveling: a blog front-end backed by a headless CMS
//!
//! Posts are fetched from a Prismic-style content API, normalized into
//! view models and rendered with embedded Tera templates, either ahead of
//! time into a static directory or on request by the built-in server.

pub mod cms;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod pagination;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets directory
    pub static_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a blog instance from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            public_dir,
            static_dir,
        }
    }

    /// Build the content API client
    ///
    /// Call once and share the result; the client caches the master ref.
    pub fn client(&self) -> Result<Arc<dyn cms::CmsClient>> {
        if self.config.api_endpoint.is_empty() {
            anyhow::bail!("api_endpoint is not set in _config.yml");
        }
        let client = cms::PrismicClient::from_config(&self.config)?;
        Ok(Arc::new(client))
    }

    /// Normalizer configured for this site
    pub fn normalizer(&self) -> content::Normalizer {
        content::Normalizer::from_config(&self.config)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
