//! OpenGraph link previews.
//!
//! Teams messages and feed items are enriched with the conference page's
//! `og:description` and `og:image`. A preview is decoration: any failure to
//! fetch or parse the page yields an empty preview.

use reqwest::Client;
use scraper::{Html, Selector};
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use crate::models::PreviewConfig;

/// Description and image scraped from a page's OpenGraph tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPreview {
    pub description: Option<String>,
    pub image: Option<String>,
}

impl LinkPreview {
    /// Extract OpenGraph tags from an HTML document.
    ///
    /// Relative image URLs are resolved against `page_url`. Only the first
    /// `og:image` is used.
    pub fn from_html(html: &str, page_url: &str) -> Self {
        let document = Html::parse_document(html);

        let description = meta_content(&document, "og:description");
        let image = meta_content(&document, "og:image").map(|href| {
            Url::parse(page_url)
                .and_then(|base| base.join(&href))
                .map(|u| u.to_string())
                .unwrap_or(href)
        });

        Self { description, image }
    }

    /// Cut the description to at most `max_chars` graphemes.
    pub fn truncated(mut self, max_chars: usize) -> Self {
        if let Some(description) = &self.description {
            if description.graphemes(true).count() > max_chars {
                let cut: String = description.graphemes(true).take(max_chars).collect();
                self.description = Some(format!("{}…", cut.trim_end()));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.image.is_none()
    }
}

fn meta_content(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#)).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

/// Service for fetching link previews.
pub struct PreviewFetcher {
    client: Client,
    config: PreviewConfig,
}

impl PreviewFetcher {
    pub fn new(client: Client, config: PreviewConfig) -> Self {
        Self { client, config }
    }

    /// Fetch the preview for `url`, or an empty one if disabled or failing.
    pub async fn fetch(&self, url: &str) -> LinkPreview {
        if !self.config.enabled || url.is_empty() {
            return LinkPreview::default();
        }

        match self.fetch_html(url).await {
            Ok(html) => {
                let preview = LinkPreview::from_html(&html, url)
                    .truncated(self.config.max_description_chars);
                if preview.is_empty() {
                    log::debug!("No OpenGraph tags on {}", url);
                }
                preview
            }
            Err(e) => {
                log::debug!("No preview for {}: {}", url, e);
                LinkPreview::default()
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> reqwest::Result<String> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r#"<!doctype html>
        <html><head>
            <meta property="og:title" content="RustConf 2026">
            <meta property="og:description" content="  The official Rust conference.  ">
            <meta property="og:image" content="/img/banner.png">
            <meta property="og:image" content="/img/second.png">
        </head><body></body></html>"#;

    #[test]
    fn test_from_html_reads_description_and_first_image() {
        let preview = LinkPreview::from_html(PAGE, "https://rustconf.com/2026/");

        assert_eq!(
            preview.description.as_deref(),
            Some("The official Rust conference.")
        );
        assert_eq!(
            preview.image.as_deref(),
            Some("https://rustconf.com/img/banner.png")
        );
    }

    #[test]
    fn test_from_html_without_tags_is_empty() {
        let preview = LinkPreview::from_html("<html><head></head></html>", "https://x.dev");
        assert!(preview.is_empty());
    }

    #[test]
    fn test_truncated_cuts_on_graphemes() {
        let preview = LinkPreview {
            description: Some("Ünïcödé conference 🇩🇪 rocks".to_string()),
            image: None,
        }
        .truncated(7);

        assert_eq!(preview.description.as_deref(), Some("Ünïcödé…"));
    }

    #[test]
    fn test_truncated_keeps_short_descriptions() {
        let preview = LinkPreview {
            description: Some("Short".to_string()),
            image: None,
        }
        .truncated(280);

        assert_eq!(preview.description.as_deref(), Some("Short"));
    }

    #[tokio::test]
    async fn test_fetch_uses_page_tags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conf"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .mount(&server)
            .await;

        let fetcher = PreviewFetcher::new(Client::new(), PreviewConfig::default());
        let preview = fetcher.fetch(&format!("{}/conf", server.uri())).await;

        assert_eq!(
            preview.image,
            Some(format!("{}/img/banner.png", server.uri()))
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_gives_empty_preview() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string(PAGE))
            .mount(&server)
            .await;

        let fetcher = PreviewFetcher::new(Client::new(), PreviewConfig::default());
        assert!(fetcher.fetch(&server.uri()).await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_fetcher_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
            .expect(0)
            .mount(&server)
            .await;

        let config = PreviewConfig {
            enabled: false,
            ..PreviewConfig::default()
        };
        let fetcher = PreviewFetcher::new(Client::new(), config);
        assert!(fetcher.fetch(&server.uri()).await.is_empty());
    }
}
