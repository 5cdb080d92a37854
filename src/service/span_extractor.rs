//! Date/time span extraction from free-form email text.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, ParseError};
use regex::Regex;

const MONTH_NAMES: &str = "January|February|March|April|May|June|July|August|September|October|November|December";

/// A start/end pair of naive local instants pulled out of one text.
///
/// No ordering is enforced between the two: if the source text says the
/// event runs backwards, the span runs backwards. Callers treat the pair
/// as best-effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

enum DateToken<'t> {
    LongForm(&'t str),
    Numeric(&'t str),
}

/// Extracts a meeting span from unstructured text.
///
/// Pattern families are tried in fixed priority order: a date range beats
/// both single-date forms, and the long-form single date beats the numeric
/// one. At most one time range is honored, the first one in the text.
pub struct SpanExtractor {
    date_range: Regex,
    long_date: Regex,
    numeric_date: Regex,
    time_range: Regex,
    four_digit: Regex,
    trailing_year: Regex,
}

impl SpanExtractor {
    pub fn new() -> Self {
        let range_start = format!(r"((?:\d{{1,2}}\s)?(?:{MONTH_NAMES})\s\d{{1,2}}(?:,\s\d{{4}})?)");
        let range_end = format!(r"((?:\d{{1,2}}\s)?(?:{MONTH_NAMES})\s\d{{1,2}},\s\d{{4}})");
        let clock = r"\d{1,2}:\d{2}\s*[APMapm]{2}|\d{1,2}\s*[APMapm]{2}";
        Self {
            date_range: Regex::new(&format!(r"(?i)\b{range_start}\s*-\s*{range_end}\b"))
                .expect("date range pattern should compile"),
            long_date: Regex::new(&format!(r"(?i)\b(\d{{1,2}}\s(?:{MONTH_NAMES})\s\d{{4}})\b"))
                .expect("long date pattern should compile"),
            numeric_date: Regex::new(r"\b(\d{2}-\d{2}-\d{4})\b")
                .expect("numeric date pattern should compile"),
            time_range: Regex::new(&format!(r"({clock})\s*-\s*({clock})"))
                .expect("time range pattern should compile"),
            four_digit: Regex::new(r"\d{4}").expect("year pattern should compile"),
            trailing_year: Regex::new(r"\s\d{4}$").expect("trailing year pattern should compile"),
        }
    }

    /// Pulls a `(start, end)` span out of `text`.
    ///
    /// `Ok(None)` means no date pattern matched anywhere. `Err` means a
    /// pattern matched syntactically but did not form a real calendar
    /// date or clock time (day 31 in a 30-day month, hour 13 with a
    /// meridiem marker). Per-call, pure, no state carried between calls.
    pub fn extract(&self, text: &str) -> Result<Option<EventSpan>, ParseError> {
        let clock_times = self.match_time_range(text);

        if let Some((start_side, end_side)) = self.match_date_range(text) {
            let start_side = self.inherit_year(start_side, &end_side);
            let start_date = parse_range_side(&start_side)?;
            let end_date = parse_range_side(&end_side)?;
            let span = match clock_times {
                Some((first, second)) => EventSpan {
                    start: start_date.and_time(parse_clock_time(first)?),
                    end: end_date.and_time(parse_clock_time(second)?),
                },
                None => EventSpan {
                    start: start_date.and_time(NaiveTime::MIN),
                    end: end_date.and_time(NaiveTime::MIN),
                },
            };
            return Ok(Some(span));
        }

        if let Some(token) = self.match_single_date(text) {
            let date = parse_date_token(token)?;
            let span = match clock_times {
                Some((first, second)) => EventSpan {
                    start: date.and_time(parse_clock_time(first)?),
                    end: date.and_time(parse_clock_time(second)?),
                },
                None => {
                    let start = date.and_time(NaiveTime::MIN);
                    EventSpan {
                        start,
                        end: start + Duration::hours(1),
                    }
                }
            };
            return Ok(Some(span));
        }

        Ok(None)
    }

    fn match_date_range(&self, text: &str) -> Option<(String, String)> {
        let caps = self.date_range.captures(text)?;
        Some((caps[1].to_string(), caps[2].to_string()))
    }

    fn match_single_date<'t>(&self, text: &'t str) -> Option<DateToken<'t>> {
        if let Some(caps) = self.long_date.captures(text) {
            return caps.get(1).map(|m| DateToken::LongForm(m.as_str()));
        }
        if let Some(caps) = self.numeric_date.captures(text) {
            return caps.get(1).map(|m| DateToken::Numeric(m.as_str()));
        }
        None
    }

    fn match_time_range<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        let caps = self.time_range.captures(text)?;
        match (caps.get(1), caps.get(2)) {
            (Some(first), Some(second)) => Some((first.as_str(), second.as_str())),
            _ => None,
        }
    }

    // A range start like "August 2" carries no year of its own; it borrows
    // the trailing year of the end side, e.g. "August 18, 2024" -> " 2024".
    // Only a side with no 4-digit number anywhere qualifies.
    fn inherit_year(&self, start_side: String, end_side: &str) -> String {
        if self.four_digit.is_match(&start_side) {
            return start_side;
        }
        match self.trailing_year.find(end_side) {
            Some(year) => format!("{}{}", start_side, year.as_str()),
            None => start_side,
        }
    }
}

impl Default for SpanExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_range_side(raw: &str) -> Result<NaiveDate, ParseError> {
    let cleaned = raw.replace(',', "");
    NaiveDate::parse_from_str(cleaned.trim(), "%B %d %Y")
}

fn parse_date_token(token: DateToken<'_>) -> Result<NaiveDate, ParseError> {
    match token {
        DateToken::LongForm(raw) => NaiveDate::parse_from_str(raw, "%d %B %Y"),
        DateToken::Numeric(raw) => {
            // Captured fields are day-month-year, not month-day-year.
            let mut fields = raw.split('-');
            let day = fields.next().unwrap_or_default();
            let month = fields.next().unwrap_or_default();
            let year = fields.next().unwrap_or_default();
            NaiveDate::parse_from_str(&format!("{year}-{month}-{day}"), "%Y-%m-%d")
        }
    }
}

fn parse_clock_time(raw: &str) -> Result<NaiveTime, ParseError> {
    let token = raw.trim();
    // The matcher guarantees a two-letter marker at the end of the token.
    let (front, marker) = token.split_at(token.len() - 2);
    let front = front.trim();
    let canonical = if front.contains(':') {
        format!("{} {}", front, marker.to_ascii_uppercase())
    } else {
        format!("{}:00 {}", front, marker.to_ascii_uppercase())
    };
    NaiveTime::parse_from_str(&canonical, "%I:%M %p")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn long_form_date_defaults_to_one_hour() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("The exam is scheduled for 2 August 2024 in the main hall.")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 2, 0, 0));
        assert_eq!(span.end, at(2024, 8, 2, 1, 0));
    }

    #[test]
    fn numeric_date_fields_are_day_month_year() {
        let extractor = SpanExtractor::new();
        let span = extractor.extract("Meeting on 15-09-2024").unwrap().unwrap();
        assert_eq!(span.start, at(2024, 9, 15, 0, 0));
        assert_eq!(span.end, at(2024, 9, 15, 1, 0));
    }

    #[test]
    fn workshop_with_time_range() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("Join us 2 August 2024, 9 AM - 5 PM for the workshop")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 2, 9, 0));
        assert_eq!(span.end, at(2024, 8, 2, 17, 0));
    }

    #[test]
    fn time_range_with_minutes() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("Webinar on 2 August 2024, 9:30 AM - 5:15 PM")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 2, 9, 30));
        assert_eq!(span.end, at(2024, 8, 2, 17, 15));
    }

    #[test]
    fn range_start_inherits_end_year() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("Conference: August 2 - August 18, 2024")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 2, 0, 0));
        assert_eq!(span.end, at(2024, 8, 18, 0, 0));
    }

    #[test]
    fn range_wins_over_single_date() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("Kickoff 2 August 2024. Full program runs August 5 - August 18, 2024.")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 5, 0, 0));
        assert_eq!(span.end, at(2024, 8, 18, 0, 0));
    }

    #[test]
    fn range_with_explicit_times_uses_both_dates() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("Hackathon August 2, 2024 - August 4, 2024, 9:00 AM - 5:00 PM")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 2, 9, 0));
        assert_eq!(span.end, at(2024, 8, 4, 17, 0));
    }

    #[test]
    fn only_first_time_range_is_used() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("2 August 2024, 9 AM - 5 PM, afterparty 6 PM - 9 PM")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 2, 9, 0));
        assert_eq!(span.end, at(2024, 8, 2, 17, 0));
    }

    #[test]
    fn lowercase_tokens_match() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("join us 2 august 2024, 9 am - 5 pm")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 2, 9, 0));
        assert_eq!(span.end, at(2024, 8, 2, 17, 0));
    }

    #[test]
    fn twenty_four_hour_times_are_not_recognized() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("Sync on 2 August 2024, 14:00 - 15:00")
            .unwrap()
            .unwrap();
        // No meridiem marker, so the clock range is ignored entirely.
        assert_eq!(span.start, at(2024, 8, 2, 0, 0));
        assert_eq!(span.end, at(2024, 8, 2, 1, 0));
    }

    #[test]
    fn reversed_range_is_not_corrected() {
        let extractor = SpanExtractor::new();
        let span = extractor
            .extract("Retro: August 18 - August 2, 2024")
            .unwrap()
            .unwrap();
        assert_eq!(span.start, at(2024, 8, 18, 0, 0));
        assert_eq!(span.end, at(2024, 8, 2, 0, 0));
        assert!(span.end < span.start);
    }

    #[test]
    fn malformed_numeric_date_is_an_error() {
        let extractor = SpanExtractor::new();
        assert!(extractor.extract("Meeting on 31-02-2024").is_err());
    }

    #[test]
    fn invalid_meridiem_hour_is_an_error() {
        let extractor = SpanExtractor::new();
        assert!(extractor.extract("2 August 2024, 13 PM - 14 PM").is_err());
    }

    #[test]
    fn no_date_returns_none() {
        let extractor = SpanExtractor::new();
        assert_eq!(
            extractor.extract("no dates mentioned here at all").unwrap(),
            None
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let extractor = SpanExtractor::new();
        let text = "Join us 2 August 2024, 9 AM - 5 PM for the workshop";
        let first = extractor.extract(text).unwrap();
        let second = extractor.extract(text).unwrap();
        assert_eq!(first, second);
    }
}
