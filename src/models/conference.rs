//! Conference data structure.

use serde::{Deserialize, Deserializer, Serialize};

/// A conference listed in the upstream feed.
///
/// Dates are kept as `YYYY-MM-DD` strings. Every date comparison in the crate
/// is a plain string comparison, which is chronological only because the
/// format is fixed-width and zero-padded.
///
/// Besides the upstream camelCase names, snake_case and the PascalCase keys
/// of older state files (`URL`, `StartDate`, `CFPEndDate`, ...) are read.
/// A `null` in any field reads as an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Conference {
    /// Display name
    #[serde(alias = "Name", deserialize_with = "null_as_empty")]
    pub name: String,

    /// Conference website
    #[serde(alias = "URL", deserialize_with = "null_as_empty")]
    pub url: String,

    /// First day (`YYYY-MM-DD`)
    #[serde(
        alias = "start_date",
        alias = "StartDate",
        deserialize_with = "null_as_empty"
    )]
    pub start_date: String,

    /// Last day, equal to `start_date` for one-day events
    #[serde(alias = "end_date", alias = "EndDate", deserialize_with = "null_as_empty")]
    pub end_date: String,

    #[serde(alias = "City", deserialize_with = "null_as_empty")]
    pub city: String,

    /// Country name, matched verbatim against the blacklist
    #[serde(alias = "Country", deserialize_with = "null_as_empty")]
    pub country: String,

    /// Call for papers page, empty when there is none
    #[serde(alias = "cfp_url", alias = "CFPUrl", deserialize_with = "null_as_empty")]
    pub cfp_url: String,

    /// Call for papers deadline, empty when there is none
    #[serde(
        alias = "cfp_end_date",
        alias = "CFPEndDate",
        deserialize_with = "null_as_empty"
    )]
    pub cfp_end_date: String,

    #[serde(alias = "Twitter", deserialize_with = "null_as_empty")]
    pub twitter: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The fields that decide whether two records are the same announcement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConferenceKey {
    pub url: String,
    pub start_date: String,
    pub city: String,
}

impl Conference {
    /// Identity used for deduplication: `(url, start_date, city)`.
    pub fn key(&self) -> ConferenceKey {
        ConferenceKey {
            url: self.url.clone(),
            start_date: self.start_date.clone(),
            city: self.city.clone(),
        }
    }

    pub fn has_cfp(&self) -> bool {
        !self.cfp_end_date.is_empty()
    }
}
