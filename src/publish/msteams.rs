//! Microsoft Teams incoming-webhook publisher.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::Conference;
use crate::publish::{Formatter, Publisher};
use crate::services::{LinkPreview, PreviewFetcher};
use crate::utils::http::post_json;

const DESTINATION: &str = "msteams";

#[derive(Debug, Serialize)]
struct TeamsMessage {
    text: String,
}

/// Posts one markdown message per conference to a Teams incoming webhook.
pub struct TeamsPublisher<'a> {
    client: Client,
    webhook_url: String,
    formatter: Formatter<'a>,
    previews: &'a PreviewFetcher,
}

impl<'a> TeamsPublisher<'a> {
    pub fn new(
        client: Client,
        webhook_url: impl Into<String>,
        formatter: Formatter<'a>,
        previews: &'a PreviewFetcher,
    ) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
            formatter,
            previews,
        }
    }

    fn text(&self, conference: &Conference, preview: &LinkPreview) -> String {
        let mut text = format!(
            "**{}**  \n[{}]({})\n\n{}・{}",
            conference.name,
            conference.url,
            conference.url,
            self.formatter.location(conference),
            self.formatter.date_range(conference)
        );
        if let Some(description) = &preview.description {
            text.push_str("\n\n");
            text.push_str(description);
        }
        if let Some(image) = &preview.image {
            text.push_str(&format!("\n\n![img]({image})"));
        }
        text
    }
}

#[async_trait]
impl Publisher for TeamsPublisher<'_> {
    fn destination(&self) -> &str {
        DESTINATION
    }

    async fn publish(&self, conference: &Conference) -> Result<()> {
        let preview = self.previews.fetch(&conference.url).await;
        let message = TeamsMessage {
            text: self.text(conference, &preview),
        };

        let status = post_json(&self.client, &self.webhook_url, &message)
            .await
            .map_err(|e| AppError::publish(DESTINATION, &conference.name, e))?;

        if status != StatusCode::OK {
            return Err(AppError::publish(
                DESTINATION,
                &conference.name,
                format!(
                    "Got response code {} when sending message to msteams",
                    status.as_u16()
                ),
            ));
        }

        log::info!("Sent '{}' to msteams", conference.name);
        Ok(())
    }
}
