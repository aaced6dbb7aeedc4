//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Build the static site from the content API
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let client = blog.client()?;
    let generator = Generator::new(blog, client)?;
    let stats = generator.generate().await?;

    if stats.skipped > 0 {
        tracing::warn!("{} posts were skipped", stats.skipped);
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} listing pages and {} posts in {:.2}s",
        stats.listing_pages,
        stats.details,
        duration.as_secs_f64()
    );

    Ok(())
}
