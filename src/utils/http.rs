// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// POST `body` as JSON and return the response status.
pub async fn post_json<T: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    body: &T,
) -> Result<StatusCode> {
    let payload = serde_json::to_vec(body)?;
    let response = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await?;
    Ok(response.status())
}
