//! HTTP client for a Prismic-style content API

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use super::{CmsClient, CmsError, ContinuationToken, RawDocument, RawPage, Result};
use crate::config::SiteConfig;

/// Entry of the `refs` list advertised by the API root
#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

#[derive(Debug, Deserialize)]
struct ApiRoot {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

/// Default time a resolved master ref is reused
pub const DEFAULT_REF_TTL: Duration = Duration::from_secs(5);

#[derive(Debug)]
struct CachedRef {
    reference: String,
    fetched_at: Instant,
}

/// Content API client, constructed once and shared by every request
///
/// The master ref changes on every publish, so it is re-resolved once the
/// cached one is older than `ref_ttl`.
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: Option<String>,
    master_ref: RwLock<Option<CachedRef>>,
    ref_ttl: Duration,
}

impl PrismicClient {
    /// Create a client for the API root at `endpoint`
    pub fn new(endpoint: &str, access_token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            access_token,
            master_ref: RwLock::new(None),
            ref_ttl: DEFAULT_REF_TTL,
        })
    }

    /// Set how long a resolved master ref is reused
    pub fn with_ref_ttl(mut self, ttl: Duration) -> Self {
        self.ref_ttl = ttl;
        self
    }

    /// Create a client from the site configuration
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Self::new(
            &config.api_endpoint,
            config.access_token.clone(),
            config.request_timeout(),
        )
        .map(|client| client.with_ref_ttl(config.master_ref_ttl()))
    }

    /// Current master ref, re-fetched from the API root when the cached one is stale
    async fn master_ref(&self) -> Result<String> {
        if let Some(cached) = self.master_ref.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.ref_ttl {
                return Ok(cached.reference.clone());
            }
        }

        let mut request = self.http.get(&self.endpoint);
        if let Some(token) = &self.access_token {
            request = request.query(&[("access_token", token)]);
        }
        let root: ApiRoot = self.get_json(request, &self.endpoint).await?;
        let reference = root
            .refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(CmsError::MissingMasterRef)?;
        tracing::debug!(reference = %reference, "Resolved master ref");

        *self.master_ref.write().await = Some(CachedRef {
            reference: reference.clone(),
            fetched_at: Instant::now(),
        });
        Ok(reference)
    }

    /// Run a search query against the documents endpoint
    async fn search(&self, predicate: &str, page_size: usize) -> Result<RawPage> {
        let reference = self.master_ref().await?;
        let url = format!("{}/documents/search", self.endpoint);
        let page_size = page_size.to_string();

        let mut params = vec![
            ("ref", reference.as_str()),
            ("q", predicate),
            ("pageSize", page_size.as_str()),
        ];
        if let Some(token) = &self.access_token {
            params.push(("access_token", token.as_str()));
        }

        let request = self.http.get(&url).query(&params);
        self.get_json(request, &url).await
    }

    /// Send a request and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> Result<T> {
        let response = request.send().await.map_err(|e| timeout_or_http(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CmsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| timeout_or_http(e, url))?;
        tracing::trace!(url, payload = %String::from_utf8_lossy(&body), "Content API response");

        Ok(serde_json::from_slice(&body)?)
    }
}

fn timeout_or_http(err: reqwest::Error, url: &str) -> CmsError {
    if err.is_timeout() {
        CmsError::Timeout {
            url: url.to_string(),
        }
    } else {
        CmsError::Http(err)
    }
}

/// Quote a value for use inside a predicate string
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn type_predicate(doc_type: &str) -> String {
    format!("[[at(document.type,{})]]", quote(doc_type))
}

fn uid_predicate(doc_type: &str, uid: &str) -> String {
    format!("[[at(my.{}.uid,{})]]", doc_type, quote(uid))
}

fn log_page(page: &RawPage) {
    tracing::debug!(
        page = page.page,
        results = page.results.len(),
        total = page.total_results_size,
        has_next = page.next_page.is_some(),
        "Fetched listing page"
    );
}

#[async_trait]
impl CmsClient for PrismicClient {
    async fn get_by_type(&self, doc_type: &str, page_size: usize) -> Result<RawPage> {
        let page = self.search(&type_predicate(doc_type), page_size).await?;
        log_page(&page);
        Ok(page)
    }

    async fn get_next(&self, token: &ContinuationToken) -> Result<RawPage> {
        let request = self.http.get(token.as_str());
        let page: RawPage = self.get_json(request, token.as_str()).await?;
        log_page(&page);
        Ok(page)
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<RawDocument>> {
        let page = self.search(&uid_predicate(doc_type, uid), 1).await?;
        let doc = page.results.into_iter().next();
        tracing::debug!(uid, found = doc.is_some(), "Fetched document");
        Ok(doc)
    }
}
