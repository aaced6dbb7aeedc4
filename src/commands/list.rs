//! List posts from the content API

use anyhow::Result;

use crate::cms::CmsClient;
use crate::content::Post;
use crate::helpers::Helpers;
use crate::pagination::PaginationController;
use crate::Blog;

/// Print the first `pages` listing pages
pub async fn run(blog: &Blog, pages: usize) -> Result<()> {
    let client = blog.client()?;
    let posts = fetch(blog, client, pages).await?;
    let helpers = Helpers::new(blog.config.clone());

    println!("Posts ({}):", posts.len());
    for line in posts.iter().map(|post| format_line(&helpers, post)) {
        println!("  {}", line);
    }

    Ok(())
}

async fn fetch<C: CmsClient>(blog: &Blog, client: C, pages: usize) -> Result<Vec<Post>> {
    let config = &blog.config;
    let mut controller = PaginationController::start(
        client,
        blog.normalizer(),
        &config.document_type,
        config.page_size,
    )
    .await?;
    controller.load_pages(pages.clamp(1, config.max_pages)).await?;

    if controller.has_more() {
        tracing::info!("More posts available beyond {} pages", controller.pages_loaded());
    }

    Ok(controller.into_posts())
}

fn format_line(helpers: &Helpers, post: &Post) -> String {
    format!(
        "{} - {} by {} [{}]",
        helpers
            .date(post.published_at.as_ref())
            .unwrap_or_else(|| "-".to_string()),
        post.title,
        post.author,
        post.id.as_deref().unwrap_or("-")
    )
}
