//! Composable conference filters.
//!
//! Every filter is a [`Predicate`]: a pure test over a [`Conference`] that is
//! fixed at construction. [`apply`] keeps the records for which every
//! predicate holds, in their original order.
//!
//! All date tests compare `YYYY-MM-DD` strings lexically.

use std::collections::HashSet;

use crate::models::{Conference, ConferenceKey};

/// A configured keep/drop test.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Keep iff `start_date > today`.
    IsInFuture { today: String },

    /// Keep iff `cfp_end_date < today`. `None` keeps everything.
    CfpFinished { today: Option<String> },

    /// Keep iff the country is not listed (exact, case-sensitive).
    CountryNotBlacklisted { countries: HashSet<String> },

    /// Keep iff no announced conference has the same identity key.
    NotAlreadyAnnounced { announced: HashSet<ConferenceKey> },
}

impl Predicate {
    pub fn is_in_future(today: impl Into<String>) -> Self {
        Self::IsInFuture {
            today: today.into(),
        }
    }

    /// Build the call-for-papers test.
    ///
    /// When enabled, a conference without a CFP is kept: no CFP counts as a
    /// finished CFP.
    pub fn cfp_finished(enabled: bool, today: impl Into<String>) -> Self {
        Self::CfpFinished {
            today: enabled.then(|| today.into()),
        }
    }

    pub fn country_not_blacklisted<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::CountryNotBlacklisted {
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_already_announced(announced: &[Conference]) -> Self {
        Self::NotAlreadyAnnounced {
            announced: announced.iter().map(Conference::key).collect(),
        }
    }

    /// Returns true if the conference should be kept.
    pub fn evaluate(&self, conference: &Conference) -> bool {
        match self {
            Self::IsInFuture { today } => conference.start_date.as_str() > today.as_str(),
            Self::CfpFinished { today: None } => true,
            Self::CfpFinished { today: Some(today) } => {
                !conference.has_cfp() || conference.cfp_end_date.as_str() < today.as_str()
            }
            Self::CountryNotBlacklisted { countries } => !countries.contains(&conference.country),
            Self::NotAlreadyAnnounced { announced } => !announced.contains(&conference.key()),
        }
    }
}

/// Keep the conferences that pass every predicate, preserving order.
///
/// An empty predicate list keeps everything.
pub fn apply(conferences: Vec<Conference>, predicates: &[Predicate]) -> Vec<Conference> {
    conferences
        .into_iter()
        .filter(|conference| predicates.iter().all(|p| p.evaluate(conference)))
        .collect()
}
