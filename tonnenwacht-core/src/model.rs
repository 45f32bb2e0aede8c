//! Domain data structures for addresses, bins, and pickup dates.

use std::fmt;

use chrono::NaiveDate;
use chrono::ParseError as ChronoParseError;
use serde::{Deserialize, Serialize};

/// Date format used by the lookup site's result tables.
pub const SITE_DATE_FORMAT: &str = "%d.%m.%Y";
/// Date format used when rendering a date into a message.
pub const MESSAGE_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Household address submitted to the lookup form.
///
/// Loaded once from the settings file (German field names on the wire)
/// and never mutated for the rest of the run.
pub struct Address {
    /// Locality ("Ort") as listed by the site's select box.
    #[serde(rename = "ort")]
    pub locality: String,
    /// Street ("Strasse") as listed by the site's select box.
    #[serde(rename = "strasse")]
    pub street: String,
    /// House number ("Hausnummer").
    #[serde(rename = "nummer")]
    pub house_number: String,
    /// House number suffix ("Hausnummerzusatz"), may be empty.
    #[serde(rename = "nummerzusatz")]
    pub house_number_suffix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// The three bin categories tracked by the watcher.
pub enum Bin {
    /// Residual waste ("Restmülltonne").
    Residual,
    /// Paper and cardboard ("Papiertonne").
    Paper,
    /// Organic waste ("Biotonne").
    Organic,
}

impl Bin {
    /// All bins in the order they appear on the result page.
    pub const ALL: [Bin; 3] = [Bin::Residual, Bin::Paper, Bin::Organic];

    /// German bin name used in messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Bin::Residual => "Restmülltonne",
            Bin::Paper => "Papiertonne",
            Bin::Organic => "Biotonne",
        }
    }

    /// Lid color tag used in messages.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Bin::Residual => "black",
            Bin::Paper => "blue",
            Bin::Organic => "brown",
        }
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Bin::Residual => "residual",
            Bin::Paper => "paper",
            Bin::Organic => "organic",
        };
        write!(formatter, "{slug}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Nearest upcoming pickup for a single bin.
pub struct PickupEvent {
    /// Bin being collected.
    pub bin: Bin,
    /// Date of the pickup.
    pub date: NaiveDate,
}

/// Check whether `date` is the day after `today`.
#[must_use]
pub fn is_tomorrow(today: NaiveDate, date: NaiveDate) -> bool {
    today.succ_opt() == Some(date)
}

/// Strip the decoration (spaces and `*` markers) the site wraps around
/// date cells.
#[must_use]
pub fn clean_date_text(raw: &str) -> &str {
    raw.trim_matches(|ch| ch == ' ' || ch == '*')
}

/// Parse a date cell from the result page.
///
/// # Errors
///
/// Returns the chrono parse error when the cleaned text does not match
/// the site's `%d.%m.%Y` format.
pub fn parse_site_date(raw: &str) -> Result<NaiveDate, ChronoParseError> {
    NaiveDate::parse_from_str(clean_date_text(raw), SITE_DATE_FORMAT)
}

/// Render a date for use in a notification message.
#[must_use]
pub fn format_message_date(date: NaiveDate) -> String {
    date.format(MESSAGE_DATE_FORMAT).to_string()
}

/// Rotate the member list by one position and return the member that was
/// at the front, or `None` for an empty list.
pub fn rotate_front_to_back(members: &mut [String]) -> Option<String> {
    let front = members.first().cloned()?;
    members.rotate_left(1);
    Some(front)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn tomorrow_is_exactly_one_day_ahead() {
        let today = date(2023, 3, 14);

        assert!(is_tomorrow(today, date(2023, 3, 15)), "next day qualifies");
        assert!(!is_tomorrow(today, today), "same day does not qualify");
        assert!(
            !is_tomorrow(today, date(2023, 3, 16)),
            "day after tomorrow does not qualify"
        );
        assert!(
            !is_tomorrow(today, date(2023, 3, 13)),
            "yesterday does not qualify"
        );
    }

    #[test]
    fn tomorrow_crosses_month_and_year_boundaries() {
        assert!(
            is_tomorrow(date(2023, 12, 31), date(2024, 1, 1)),
            "year boundary"
        );
        assert!(
            is_tomorrow(date(2024, 2, 29), date(2024, 3, 1)),
            "leap month boundary"
        );
    }

    #[test]
    fn date_cell_decoration_is_stripped() {
        assert_eq!(clean_date_text(" 14.03.2023 *"), "14.03.2023");
        assert_eq!(clean_date_text("14.03.2023"), "14.03.2023");
        assert_eq!(clean_date_text("** 14.03.2023"), "14.03.2023");
    }

    #[test]
    fn site_date_round_trips_through_the_message_format() {
        let parsed = parse_site_date(" 05.01.2024 *").expect("parseable cell");
        assert_eq!(parsed, date(2024, 1, 5));

        let rendered = format_message_date(parsed);
        assert_eq!(rendered, "05/01/2024");

        let reparsed = NaiveDate::parse_from_str(&rendered, MESSAGE_DATE_FORMAT)
            .expect("message format parses back");
        assert_eq!(reparsed, parsed);
    }

    #[test]
    fn unparseable_date_cell_is_an_error() {
        assert!(parse_site_date("gibberish").is_err(), "garbage must not parse");
        assert!(parse_site_date("2023-03-14").is_err(), "ISO order must not parse");
    }

    #[test]
    fn rotation_moves_the_front_member_to_the_back() {
        let mut members = vec!["A".to_owned(), "B".to_owned(), "C".to_owned()];

        let popped = rotate_front_to_back(&mut members);

        assert_eq!(popped.as_deref(), Some("A"));
        assert_eq!(members, ["B", "C", "A"]);
    }

    #[test]
    fn rotating_n_times_restores_a_list_of_length_n() {
        let original = vec!["A".to_owned(), "B".to_owned(), "C".to_owned()];
        let mut members = original.clone();

        for _ in 0..members.len() {
            rotate_front_to_back(&mut members);
        }

        assert_eq!(members, original);
    }

    #[test]
    fn rotating_an_empty_list_yields_nobody() {
        let mut members: Vec<String> = Vec::new();
        assert_eq!(rotate_front_to_back(&mut members), None);
        assert!(members.is_empty(), "empty list stays empty");
    }
}
