//! Slack incoming-webhook publisher.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::Conference;
use crate::publish::{Formatter, Publisher};
use crate::utils::http::post_json;

const DESTINATION: &str = "slack";

#[derive(Debug, Serialize, PartialEq)]
struct SlackField {
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    value: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    short: bool,
}

#[derive(Debug, Serialize, PartialEq)]
struct SlackAttachment {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<SlackField>,
}

#[derive(Debug, Serialize, PartialEq)]
struct SlackMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<String>,
    text: String,
    attachments: Vec<SlackAttachment>,
    unfurl_links: bool,
    mrkdwn: bool,
}

/// Posts one message per conference to a Slack incoming webhook.
pub struct SlackPublisher<'a> {
    client: Client,
    webhook_url: String,
    channel: Option<String>,
    formatter: Formatter<'a>,
}

impl<'a> SlackPublisher<'a> {
    pub fn new(
        client: Client,
        webhook_url: impl Into<String>,
        channel: Option<String>,
        formatter: Formatter<'a>,
    ) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
            channel: channel.filter(|c| !c.is_empty()),
            formatter,
        }
    }

    fn message(&self, conference: &Conference) -> SlackMessage {
        SlackMessage {
            channel: self.channel.clone(),
            text: format!("*{}*\n<{}>", conference.name, conference.url),
            attachments: vec![SlackAttachment {
                fields: vec![
                    SlackField {
                        title: "Location".to_string(),
                        value: self.formatter.location(conference),
                        short: true,
                    },
                    SlackField {
                        title: "Dates".to_string(),
                        value: self.formatter.date_range(conference),
                        short: true,
                    },
                ],
            }],
            unfurl_links: true,
            mrkdwn: true,
        }
    }
}

#[async_trait]
impl Publisher for SlackPublisher<'_> {
    fn destination(&self) -> &str {
        DESTINATION
    }

    async fn publish(&self, conference: &Conference) -> Result<()> {
        let message = self.message(conference);
        let status = post_json(&self.client, &self.webhook_url, &message)
            .await
            .map_err(|e| AppError::publish(DESTINATION, &conference.name, e))?;

        if status != StatusCode::OK {
            return Err(AppError::publish(
                DESTINATION,
                &conference.name,
                format!(
                    "Got response code {} when sending message to slack",
                    status.as_u16()
                ),
            ));
        }

        log::info!("Sent '{}' to slack", conference.name);
        Ok(())
    }
}
