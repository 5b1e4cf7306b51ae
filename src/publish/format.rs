//! Text fragments shared by every destination.

use crate::models::Conference;
use crate::publish::flags::CountryFlags;

/// Formats locations and date ranges.
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    flags: &'a CountryFlags,
}

impl<'a> Formatter<'a> {
    pub fn new(flags: &'a CountryFlags) -> Self {
        Self { flags }
    }

    /// `City, Country` followed by the country's flag when known.
    pub fn location(&self, conference: &Conference) -> String {
        let location = format!("{}, {}", conference.city, conference.country);
        match self.flags.get(&conference.country) {
            Some(flag) => format!("{location} {flag}"),
            None => location,
        }
    }

    /// Start date, or `start — end` for multi-day events.
    pub fn date_range(&self, conference: &Conference) -> String {
        if conference.start_date == conference.end_date || conference.end_date.is_empty() {
            conference.start_date.clone()
        } else {
            format!("{} — {}", conference.start_date, conference.end_date)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go_two(city: &str, country: &str) -> Conference {
        Conference {
            name: "Go two".to_string(),
            url: "https://go2.com/".to_string(),
            start_date: "2026-08-21".to_string(),
            end_date: "2026-08-21".to_string(),
            city: city.to_string(),
            country: country.to_string(),
            ..Conference::default()
        }
    }

    #[test]
    fn test_location_adds_flag() {
        let flags = CountryFlags::new();
        let formatter = Formatter::new(&flags);
        assert_eq!(
            formatter.location(&go_two("Mariupol", "Ukraine")),
            "Mariupol, Ukraine 🇺🇦"
        );
    }

    #[test]
    fn test_location_unknown_country() {
        let flags = CountryFlags::new();
        let formatter = Formatter::new(&flags);
        assert_eq!(
            formatter.location(&go_two("Voodoocity", "Voodooland")),
            "Voodoocity, Voodooland"
        );
    }

    #[test]
    fn test_date_range() {
        let flags = CountryFlags::new();
        let formatter = Formatter::new(&flags);
        let mut conference = go_two("Berlin", "Germany");
        assert_eq!(formatter.date_range(&conference), "2026-08-21");

        conference.end_date = "2026-08-23".to_string();
        assert_eq!(formatter.date_range(&conference), "2026-08-21 — 2026-08-23");
    }
}
