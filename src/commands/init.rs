//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG_TEMPLATE: &str = r#"# spacetraveling configuration

# Site
title: spacetraveling
language: pt_BR
timezone: America/Sao_Paulo

# URL
url: http://localhost:3000
root: /

# Directory
public_dir: public
static_dir: static

# Content API
api_endpoint: https://your-repository.cdn.prismic.io/api/v2
# access_token: ''
document_type: posts
page_size: 2
max_pages: 50
request_timeout_secs: 10
master_ref_ttl_secs: 5

# Normalization
require_banner: true
strict_fields: false

# Reading
words_per_minute: 200

# Date / Time format
date_format: DD MMM YYYY
"#;

const STYLE_TEMPLATE: &str = r#"body {
  margin: 0;
  background: #1a1d23;
  color: #bbbbbb;
  font-family: Inter, sans-serif;
}

.container {
  max-width: 720px;
  margin: 0 auto;
  padding: 0 1rem;
}

.post {
  display: block;
  margin-top: 3rem;
  color: inherit;
  text-decoration: none;
}

.post strong {
  display: block;
  color: #f8f8f8;
  font-size: 1.75rem;
}

.info {
  display: flex;
  gap: 1.5rem;
  font-size: 0.875rem;
}

.load-more {
  display: inline-block;
  margin: 4rem 0;
  color: #ff57b2;
  font-weight: 600;
}
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("File already exists: {:?}", config_path);
    }

    fs::create_dir_all(target_dir.join("static"))?;
    fs::write(&config_path, CONFIG_TEMPLATE)?;

    let style_path = target_dir.join("static/style.css");
    if !style_path.exists() {
        fs::write(style_path, STYLE_TEMPLATE)?;
    }

    Ok(())
}
