//! Atom feed generation.
//!
//! Unlike the webhook publishers, the feed is rendered for the whole list at
//! once and written out in one go.

use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;
use atom_syndication::{
    EntryBuilder, FeedBuilder, FixedDateTime, LinkBuilder, PersonBuilder, Text,
};
use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Conference, FeedConfig};
use crate::publish::{BatchPublisher, Formatter};
use crate::services::{LinkPreview, PreviewFetcher};

const DESTINATION: &str = "atom";

/// Renders a topic's conferences as an Atom feed.
pub struct FeedRenderer<'a> {
    formatter: Formatter<'a>,
    config: &'a FeedConfig,
}

impl<'a> FeedRenderer<'a> {
    pub fn new(formatter: Formatter<'a>, config: &'a FeedConfig) -> Self {
        Self { formatter, config }
    }

    /// Render the feed document. Entry ids are the conference urls.
    pub fn render(
        &self,
        topic: &str,
        entries: &[(&Conference, LinkPreview)],
        now: DateTime<Utc>,
    ) -> String {
        let updated: FixedDateTime = now.into();
        let feed_link = format!("{}/{}", self.config.site_url.trim_end_matches('/'), topic);

        let entries: Vec<atom_syndication::Entry> = entries
            .iter()
            .map(|(conference, preview)| {
                EntryBuilder::default()
                    .title(conference.name.clone())
                    .id(conference.url.clone())
                    .links(vec![LinkBuilder::default().href(conference.url.clone()).build()])
                    .summary(Some(Text::html(self.entry_body(conference, preview))))
                    .updated(updated)
                    .published(Some(updated))
                    .build()
            })
            .collect();

        let feed = FeedBuilder::default()
            .title(format!("{topic} tech conferences"))
            .id(feed_link.clone())
            .links(vec![LinkBuilder::default().href(feed_link).build()])
            .authors(vec![
                PersonBuilder::default()
                    .name(self.config.author.clone())
                    .build(),
            ])
            .updated(updated)
            .entries(entries)
            .build();

        feed.to_string()
    }

    fn entry_body(&self, conference: &Conference, preview: &LinkPreview) -> String {
        let mut body = format!(
            "<p>{}・{}</p>",
            escape_html(&self.formatter.location(conference)),
            escape_html(&self.formatter.date_range(conference))
        );
        if let Some(description) = &preview.description {
            body.push_str(&format!("<p>{}</p>", escape_html(description)));
        }
        if let Some(image) = &preview.image {
            body.push_str(&format!(
                "<p><img src=\"{}\" alt=\"img\" /></p>",
                escape_html(image)
            ));
        }
        body
    }
}

/// Escape HTML special characters
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Writes the rendered feed for one topic to an output stream.
pub struct FeedPublisher<'a, W> {
    renderer: FeedRenderer<'a>,
    previews: &'a PreviewFetcher,
    topic: String,
    out: Mutex<W>,
}

impl<'a, W: Write + Send> FeedPublisher<'a, W> {
    pub fn new(
        renderer: FeedRenderer<'a>,
        previews: &'a PreviewFetcher,
        topic: impl Into<String>,
        out: W,
    ) -> Self {
        Self {
            renderer,
            previews,
            topic: topic.into(),
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> Result<W> {
        self.out
            .into_inner()
            .map_err(|_| AppError::publish(DESTINATION, &self.topic, "output lock poisoned"))
    }
}

#[async_trait]
impl<W: Write + Send> BatchPublisher for FeedPublisher<'_, W> {
    fn destination(&self) -> &str {
        DESTINATION
    }

    async fn publish_all(&self, conferences: &[Conference]) -> Result<()> {
        let mut entries = Vec::with_capacity(conferences.len());
        for conference in conferences {
            let preview = self.previews.fetch(&conference.url).await;
            entries.push((conference, preview));
        }

        let document = self.renderer.render(&self.topic, &entries, Utc::now());

        let mut out = self
            .out
            .lock()
            .map_err(|_| AppError::publish(DESTINATION, &self.topic, "output lock poisoned"))?;
        writeln!(out, "{document}")?;
        out.flush()?;

        log::info!(
            "Rendered feed for '{}' with {} conferences",
            self.topic,
            conferences.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PreviewConfig;
    use crate::publish::CountryFlags;
    use atom_syndication::Feed;
    use chrono::TimeZone;
    use reqwest::Client;

    fn go(name: &str, url: &str, city: &str, country: &str, start: &str) -> Conference {
        Conference {
            name: name.to_string(),
            url: url.to_string(),
            start_date: start.to_string(),
            end_date: start.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            ..Conference::default()
        }
    }

    fn no_previews() -> PreviewFetcher {
        PreviewFetcher::new(
            Client::new(),
            PreviewConfig {
                enabled: false,
                ..PreviewConfig::default()
            },
        )
    }

    #[test]
    fn test_render_feed() {
        let flags = CountryFlags::new();
        let config = FeedConfig::default();
        let renderer = FeedRenderer::new(Formatter::new(&flags), &config);
        let go_one = go("Go one", "https://go1.com/", "Berlin", "Germany", "2026-11-20");
        let go_two = go("Go two", "https://go2.com/", "Mariupol", "Ukraine", "2026-11-21");
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();

        let xml = renderer.render(
            "golang",
            &[
                (&go_one, LinkPreview::default()),
                (
                    &go_two,
                    LinkPreview {
                        description: Some("Gophers & friends".to_string()),
                        image: None,
                    },
                ),
            ],
            now,
        );

        let feed = Feed::read_from(xml.as_bytes()).unwrap();
        assert_eq!(feed.title().value, "golang tech conferences");
        assert_eq!(feed.links()[0].href(), "https://confs.tech/golang");
        assert_eq!(feed.authors()[0].name(), "https://confs.tech/");
        assert_eq!(feed.entries().len(), 2);

        let first = &feed.entries()[0];
        assert_eq!(first.title().value, "Go one");
        assert_eq!(first.id(), "https://go1.com/");
        assert_eq!(first.links()[0].href(), "https://go1.com/");
        assert_eq!(
            first.summary().map(|s| s.value.as_str()),
            Some("<p>Berlin, Germany 🇩🇪・2026-11-20</p>")
        );

        let second = &feed.entries()[1];
        assert_eq!(second.id(), "https://go2.com/");
        assert_eq!(
            second.summary().map(|s| s.value.as_str()),
            Some("<p>Mariupol, Ukraine 🇺🇦・2026-11-21</p><p>Gophers &amp; friends</p>")
        );
    }

    #[test]
    fn test_render_image_paragraph() {
        let flags = CountryFlags::new();
        let config = FeedConfig::default();
        let renderer = FeedRenderer::new(Formatter::new(&flags), &config);
        let conference = go("Go one", "https://go1.com/", "Berlin", "Germany", "2026-11-20");
        let preview = LinkPreview {
            description: None,
            image: Some("https://go1.com/og.png".to_string()),
        };

        let xml = renderer.render("golang", &[(&conference, preview)], Utc::now());
        let feed = Feed::read_from(xml.as_bytes()).unwrap();
        let summary = feed.entries()[0].summary().map(|s| s.value.clone());

        assert_eq!(
            summary.as_deref(),
            Some("<p>Berlin, Germany 🇩🇪・2026-11-20</p><p><img src=\"https://go1.com/og.png\" alt=\"img\" /></p>")
        );
    }

    #[tokio::test]
    async fn test_publish_all_writes_document() {
        let flags = CountryFlags::new();
        let config = FeedConfig::default();
        let previews = no_previews();
        let publisher = FeedPublisher::new(
            FeedRenderer::new(Formatter::new(&flags), &config),
            &previews,
            "rust",
            Vec::new(),
        );

        let conferences = vec![go(
            "RustFest",
            "https://rustfest.eu",
            "Zurich",
            "Switzerland",
            "2026-11-10",
        )];
        publisher.publish_all(&conferences).await.unwrap();

        let written = String::from_utf8(publisher.into_inner().unwrap()).unwrap();
        let feed = Feed::read_from(written.as_bytes()).unwrap();
        assert_eq!(feed.entries().len(), 1);
        assert_eq!(feed.entries()[0].title().value, "RustFest");
    }

    #[tokio::test]
    async fn test_publish_all_empty_list_still_renders_feed() {
        let flags = CountryFlags::new();
        let config = FeedConfig::default();
        let previews = no_previews();
        let publisher = FeedPublisher::new(
            FeedRenderer::new(Formatter::new(&flags), &config),
            &previews,
            "rust",
            Vec::new(),
        );

        publisher.publish_all(&[]).await.unwrap();

        let written = publisher.into_inner().unwrap();
        let feed = Feed::read_from(&written[..]).unwrap();
        assert_eq!(feed.title().value, "rust tech conferences");
        assert!(feed.entries().is_empty());
    }
}
