//! Request-time rendering server
//!
//! Every request runs its own flow against the shared content client: the
//! listing builds a fresh pagination controller, the detail page fetches a
//! single document. No mutable state is shared between requests.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::CmsClient;
use crate::config::SiteConfig;
use crate::content::Normalizer;
use crate::helpers::Helpers;
use crate::pagination::{PaginationController, PaginationError};
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Seconds a client is asked to wait before retrying a failed fetch
const RETRY_AFTER_SECS: u64 = 5;

/// Server state
pub struct ServerState {
    client: Arc<dyn CmsClient>,
    renderer: TemplateRenderer,
    helpers: Helpers,
    normalizer: Normalizer,
    config: SiteConfig,
}

impl ServerState {
    pub fn new(blog: &Blog, client: Arc<dyn CmsClient>) -> Result<Self> {
        Ok(Self {
            client,
            renderer: TemplateRenderer::new(&blog.config)?,
            helpers: Helpers::new(blog.config.clone()),
            normalizer: blog.normalizer(),
            config: blog.config.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListingQuery {
    pages: Option<usize>,
}

/// Build the application router
pub fn router(state: Arc<ServerState>, static_dir: &std::path::Path) -> Router {
    Router::new()
        .route("/", get(listing_handler))
        .route("/post/:uid", get(post_handler))
        .route("/post/:uid/", get(post_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, client: Arc<dyn CmsClient>, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState::new(blog, client)?);
    let app = router(state, &blog.static_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Listing of the first `?pages=N` pages
async fn listing_handler(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let max_pages = state.config.max_pages;
    let requested = query.pages.unwrap_or(1).clamp(1, max_pages);

    let result = async {
        let mut controller = PaginationController::start(
            state.client.clone(),
            state.normalizer.clone(),
            &state.config.document_type,
            state.config.page_size,
        )
        .await?;
        controller.load_pages(requested).await?;
        Ok::<_, PaginationError>(controller)
    }
    .await;

    let controller = match result {
        Ok(controller) => controller,
        Err(e) => return fetch_failure(&state, e),
    };

    let pages = controller.pages_loaded();
    let next_url =
        (controller.has_more() && pages < max_pages).then(|| state.helpers.listing_url(pages + 1));

    match state.renderer.render_listing(controller.posts(), next_url) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_failure(e),
    }
}

/// Detail page of one post
async fn post_handler(State(state): State<Arc<ServerState>>, Path(uid): Path<String>) -> Response {
    let doc = match state
        .client
        .get_by_uid(&state.config.document_type, &uid)
        .await
    {
        Ok(Some(doc)) => doc,
        Ok(None) => return not_found(&state),
        Err(e) => return fetch_failure(&state, PaginationError::Fetch(e)),
    };

    let post = match state.normalizer.detail(&doc) {
        Ok(post) => post,
        Err(e) => return fetch_failure(&state, PaginationError::Normalize(e)),
    };

    match state.renderer.render_post(&post) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_failure(e),
    }
}

async fn not_found_handler(State(state): State<Arc<ServerState>>) -> Response {
    not_found(&state)
}

fn not_found(state: &ServerState) -> Response {
    match state.renderer.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => render_failure(e),
    }
}

/// Retryable failures get the loading placeholder, the rest a bad gateway
fn fetch_failure(state: &ServerState, err: PaginationError) -> Response {
    if err.is_retryable() {
        tracing::warn!("Content temporarily unavailable: {}", err);
        match state.renderer.render_loading(RETRY_AFTER_SECS) {
            Ok(html) => (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::RETRY_AFTER, RETRY_AFTER_SECS.to_string())],
                Html(html),
            )
                .into_response(),
            Err(e) => render_failure(e),
        }
    } else {
        tracing::error!("Content request failed: {}", err);
        (StatusCode::BAD_GATEWAY, "Content unavailable").into_response()
    }
}

fn render_failure(err: anyhow::Error) -> Response {
    tracing::error!("Template rendering failed: {:#}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}
