// src/services/conferences.rs

//! Upstream conference list fetcher.
//!
//! Conferences are published as one JSON array per year and topic:
//! `{base_url}/{year}/{topic}.json`.

use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::Conference;

/// Service for downloading a topic's conference list.
pub struct ConferenceSource {
    client: Client,
    base_url: String,
}

impl ConferenceSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// URL of the list for `topic` in `year`.
    pub fn topic_url(&self, year: i32, topic: &str) -> String {
        format!("{}/{}/{}.json", self.base_url.trim_end_matches('/'), year, topic)
    }

    /// Fetch every conference listed for `topic` in `year`.
    ///
    /// Anything but a 200 response, or a body that is not a JSON array of
    /// conferences, is an error.
    pub async fn fetch(&self, year: i32, topic: &str) -> Result<Vec<Conference>> {
        let url = self.topic_url(year, topic);
        log::info!("Fetching conferences from {}", url);

        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(AppError::Fetch {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let conferences: Vec<Conference> = serde_json::from_str(&body)?;
        log::info!("Fetched {} conferences for '{}'", conferences.len(), topic);
        Ok(conferences)
    }
}
