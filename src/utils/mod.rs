//! Utility functions and helpers.

pub mod http;

use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::error::{AppError, Result};

static TOPIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z\-]+$").expect("topic pattern is valid"));

/// Today's local date as `YYYY-MM-DD`.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Calendar year of a `YYYY-MM-DD` date.
pub fn year_of(date: &str) -> Result<i32> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.year())
        .map_err(|e| AppError::validation(format!("Invalid date '{date}': {e}")))
}

/// Check the topic argument before anything touches the network.
///
/// Topics are lowercase words joined by dashes, e.g. `rust` or `data-science`.
pub fn validate_topic(topic: Option<&str>) -> Result<String> {
    let topic = topic
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Please provide conference topic"))?;

    if !TOPIC.is_match(topic) {
        return Err(AppError::validation("Invalid conference topic"));
    }

    Ok(topic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic_accepts_lowercase_and_dashes() {
        assert_eq!(validate_topic(Some("rust")).unwrap(), "rust");
        assert_eq!(validate_topic(Some("data-science")).unwrap(), "data-science");
    }

    #[test]
    fn test_validate_topic_missing() {
        for topic in [None, Some("")] {
            let err = validate_topic(topic).unwrap_err();
            assert_eq!(err.to_string(), "Please provide conference topic");
        }
    }

    #[test]
    fn test_validate_topic_rejects_other_characters() {
        for topic in ["Rust", "rust2", "../etc", "data_science", "rust "] {
            let err = validate_topic(Some(topic)).unwrap_err();
            assert_eq!(err.to_string(), "Invalid conference topic", "{topic}");
        }
    }

    #[test]
    fn test_year_of() {
        assert_eq!(year_of("2026-10-16").unwrap(), 2026);
        assert!(year_of("16/10/2026").is_err());
    }

    #[test]
    fn test_today_is_iso_date() {
        let today = today();
        assert_eq!(today.len(), 10);
        assert!(year_of(&today).is_ok());
    }

    #[test]
    fn test_validate_topic_repeated_calls() {
        for _ in 0..3 {
            assert_eq!(validate_topic(Some("golang")).unwrap(), "golang");
            assert!(validate_topic(Some("Go")).is_err());
        }
    }
}
