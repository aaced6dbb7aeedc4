//! Show a single post

use anyhow::Result;

use crate::cms::CmsClient;
use crate::content::{rich_text, Post};
use crate::helpers::Helpers;
use crate::Blog;

/// Fetch one post by uid and print its summary
pub async fn run(blog: &Blog, uid: &str) -> Result<()> {
    let client = blog.client()?;
    let post = fetch(blog, client, uid).await?;
    let helpers = Helpers::new(blog.config.clone());

    println!("{}", format_post(&helpers, &post));

    Ok(())
}

async fn fetch<C: CmsClient>(blog: &Blog, client: C, uid: &str) -> Result<Post> {
    let Some(doc) = client.get_by_uid(&blog.config.document_type, uid).await? else {
        anyhow::bail!("Post not found: {}", uid);
    };

    Ok(blog.normalizer().detail(&doc)?)
}

fn format_post(helpers: &Helpers, post: &Post) -> String {
    let mut lines = vec![post.title.clone()];
    if !post.subtitle.is_empty() {
        lines.push(format!("  {}", post.subtitle));
    }
    lines.push(format!("  Author: {}", post.author));
    if let Some(date) = helpers.date(post.published_at.as_ref()) {
        lines.push(format!("  Published: {}", date));
    }
    lines.push(format!(
        "  Reading time: {} min",
        helpers.reading_time(&post.content)
    ));
    if let Some(banner) = &post.banner {
        lines.push(format!("  Banner: {}", banner.url));
    }
    for section in &post.content {
        lines.push(String::new());
        lines.push(format!("## {}", section.heading));
        lines.push(rich_text::as_text(&section.body));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::fake::{detail_doc, page_of, FakeClient};
    use crate::cms::RawBanner;
    use crate::config::SiteConfig;

    fn blog() -> Blog {
        let config = SiteConfig {
            language: "en_US".to_string(),
            ..Default::default()
        };
        Blog::with_config(".", config)
    }

    fn client() -> FakeClient {
        let mut no_banner = detail_doc("sem-banner", "Sem banner");
        no_banner.data.banner = Some(RawBanner::default());

        FakeClient::new(page_of(Vec::new(), None))
            .with_document(detail_doc("criando-um-app", "Criando um app"))
            .with_document(no_banner)
    }

    #[tokio::test]
    async fn test_show_post() {
        let blog = blog();
        let post = fetch(&blog, &client(), "criando-um-app").await.unwrap();
        let helpers = Helpers::new(blog.config.clone());

        assert_eq!(
            format_post(&helpers, &post),
            [
                "Criando um app",
                "  Tudo sobre como criar a sua primeira aplicação",
                "  Author: Danilo Vieira",
                "  Published: 25 Mar 2021",
                "  Reading time: 1 min",
                "  Banner: https://images.prismic.io/banner.png",
                "",
                "## Proin et varius",
                "Nullam dolor sapien, vulputate eu diam at",
            ]
            .join("\n")
        );
    }

    #[tokio::test]
    async fn test_show_unknown_post() {
        let err = fetch(&blog(), &client(), "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Post not found: nope");
    }

    #[tokio::test]
    async fn test_show_post_without_banner() {
        let err = fetch(&blog(), &client(), "sem-banner").await.unwrap_err();
        assert!(err.to_string().contains("has no banner"));
    }
}
