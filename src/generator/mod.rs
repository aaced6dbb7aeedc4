//! Generator module - renders the blog to static HTML files
//!
//! Output layout:
//! - `index.html`: first listing page
//! - `page/N/index.html`: listing with the first N pages appended
//! - `post/<uid>/index.html`: one detail page per post
//! - `static/`: copy of the static assets directory

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cms::CmsClient;
use crate::content::Normalizer;
use crate::helpers::Helpers;
use crate::pagination::{LoadMore, PaginationController};
use crate::templates::TemplateRenderer;
use crate::Blog;

/// Counts reported after a build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub listing_pages: usize,
    pub posts: usize,
    pub details: usize,
    pub skipped: usize,
}

/// Static site generator
pub struct Generator<C> {
    blog: Blog,
    client: C,
    renderer: TemplateRenderer,
    helpers: Helpers,
    normalizer: Normalizer,
}

impl<C: CmsClient> Generator<C> {
    /// Create a new generator
    pub fn new(blog: &Blog, client: C) -> Result<Self> {
        let renderer = TemplateRenderer::new(&blog.config)?;

        Ok(Self {
            blog: blog.clone(),
            client,
            renderer,
            helpers: Helpers::new(blog.config.clone()),
            normalizer: blog.normalizer(),
        })
    }

    /// Generate the entire site
    pub async fn generate(&self) -> Result<GenerateStats> {
        fs::create_dir_all(&self.blog.public_dir)?;
        self.copy_static_assets()?;

        let mut stats = GenerateStats::default();
        let uids = self.generate_listing_pages(&mut stats).await?;
        self.generate_post_pages(&uids, &mut stats).await?;

        Ok(stats)
    }

    /// Render one listing file per page, each holding every post loaded so far
    async fn generate_listing_pages(&self, stats: &mut GenerateStats) -> Result<Vec<String>> {
        let config = &self.blog.config;
        let mut controller = PaginationController::start(
            &self.client,
            self.normalizer.clone(),
            &config.document_type,
            config.page_size,
        )
        .await?;

        loop {
            let pages = controller.pages_loaded();
            let next_url = (controller.has_more() && pages < config.max_pages)
                .then(|| self.helpers.listing_page_url(pages + 1));

            let html = self.renderer.render_listing(controller.posts(), next_url)?;
            write_file(&self.listing_path(pages), &html)?;
            stats.listing_pages = pages;

            if pages >= config.max_pages {
                if controller.has_more() {
                    tracing::warn!(
                        "Stopped after {} listing pages (max_pages); older posts are not linked",
                        pages
                    );
                }
                break;
            }
            if controller.load_more().await? == LoadMore::Exhausted {
                break;
            }
        }

        let uids: Vec<String> = controller
            .posts()
            .iter()
            .filter_map(|p| p.id.clone())
            .collect();
        stats.posts = controller.posts().len();
        tracing::info!(
            "Rendered {} listing pages with {} posts",
            stats.listing_pages,
            stats.posts
        );

        Ok(uids)
    }

    /// Fetch and render every post detail page
    async fn generate_post_pages(&self, uids: &[String], stats: &mut GenerateStats) -> Result<()> {
        let doc_type = &self.blog.config.document_type;

        for uid in uids {
            if !is_safe_segment(uid) {
                tracing::warn!("Skipping post with unsafe uid {:?}", uid);
                stats.skipped += 1;
                continue;
            }

            let Some(doc) = self.client.get_by_uid(doc_type, uid).await? else {
                tracing::warn!("Post {:?} disappeared between listing and detail fetch", uid);
                stats.skipped += 1;
                continue;
            };

            let post = match self.normalizer.detail(&doc) {
                Ok(post) => post,
                Err(e) => {
                    tracing::warn!("Skipping post {:?}: {}", uid, e);
                    stats.skipped += 1;
                    continue;
                }
            };

            let html = self.renderer.render_post(&post)?;
            let output_path = self
                .blog
                .public_dir
                .join("post")
                .join(uid)
                .join("index.html");
            write_file(&output_path, &html)?;
            tracing::debug!("Generated post: {:?}", output_path);
            stats.details += 1;
        }

        Ok(())
    }

    fn listing_path(&self, pages: usize) -> PathBuf {
        if pages <= 1 {
            self.blog.public_dir.join("index.html")
        } else {
            self.blog
                .public_dir
                .join(format!("page/{}/index.html", pages))
        }
    }

    /// Copy the static assets directory to public/static
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.blog.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(static_dir)?;
                let dest = self.blog.public_dir.join("static").join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// Whether a uid can be used as a single directory name
fn is_safe_segment(uid: &str) -> bool {
    !uid.is_empty() && uid != "." && uid != ".." && !uid.contains(['/', '\\'])
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    fs::write(path, content).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::fake::{detail_doc, listing_doc, page_of, FakeClient};
    use crate::cms::RawBanner;
    use crate::config::SiteConfig;

    fn blog(dir: &Path, max_pages: usize) -> Blog {
        let config = SiteConfig {
            max_pages,
            page_size: 1,
            ..Default::default()
        };
        Blog::with_config(dir, config)
    }

    fn client() -> FakeClient {
        let mut no_banner = detail_doc("sem-banner", "Sem banner");
        no_banner.data.banner = Some(RawBanner::default());

        FakeClient::new(page_of(vec![listing_doc("primeiro", "Primeiro")], Some("tok1")))
            .with_page(
                "tok1",
                page_of(vec![listing_doc("sem-banner", "Sem banner")], Some("tok2")),
            )
            .with_page("tok2", page_of(vec![listing_doc("terceiro", "Terceiro")], None))
            .with_document(detail_doc("primeiro", "Primeiro"))
            .with_document(no_banner)
            .with_document(detail_doc("terceiro", "Terceiro"))
    }

    #[tokio::test]
    async fn test_generate_site() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/style.css"), "body {}").unwrap();

        let blog = blog(dir.path(), 10);
        let generator = Generator::new(&blog, client()).unwrap();
        let stats = generator.generate().await.unwrap();

        assert_eq!(
            stats,
            GenerateStats {
                listing_pages: 3,
                posts: 3,
                details: 2,
                skipped: 1,
            }
        );

        let public = &blog.public_dir;
        let first = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(first.contains("Primeiro"));
        assert!(!first.contains("Terceiro"));
        assert!(first.contains(r#"href="/page/2/""#));

        let last = fs::read_to_string(public.join("page/3/index.html")).unwrap();
        assert!(last.contains("Primeiro"));
        assert!(last.contains("Terceiro"));
        assert!(!last.contains("Carregar mais posts"));

        assert!(public.join("post/primeiro/index.html").exists());
        assert!(!public.join("post/sem-banner/index.html").exists());
        assert!(public.join("static/style.css").exists());
    }

    #[tokio::test]
    async fn test_generate_respects_max_pages() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path(), 2);
        let generator = Generator::new(&blog, client()).unwrap();
        let stats = generator.generate().await.unwrap();

        assert_eq!(stats.listing_pages, 2);
        assert_eq!(stats.posts, 2);
        assert!(!blog.public_dir.join("page/3/index.html").exists());

        let second = fs::read_to_string(blog.public_dir.join("page/2/index.html")).unwrap();
        assert!(!second.contains("Carregar mais posts"));
    }

    #[test]
    fn test_is_safe_segment() {
        assert!(is_safe_segment("como-utilizar-hooks"));
        assert!(!is_safe_segment("../etc"));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment(""));
    }
}
