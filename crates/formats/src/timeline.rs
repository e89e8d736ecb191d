//! Human-readable durations for free-text lived periods.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Display text and length in days for a period such as
/// `"Jan 2022 → Mar 2023"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub text: String,
    pub duration_days: u32,
}

const ARROW: char = '→';

// `%B` parses both abbreviated and full month names.
const FULL_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%Y %B %d",
];

/// Computes the timeline for a period string.
///
/// The text is split on `→` (exactly two parts) or else on `-` (exactly two
/// parts). When both ends parse as dates the result is the year range plus
/// the whole years and weeks between them; otherwise the trimmed input is
/// kept verbatim with zero days.
pub fn compute_timeline(period: &str) -> Timeline {
    let period = period.trim();
    if period.is_empty() {
        return Timeline::default();
    }

    match split_period(period).and_then(|(a, b)| Some((parse_date(a)?, parse_date(b)?))) {
        Some((start, end)) => timeline_between(start, end),
        None => Timeline {
            text: period.to_string(),
            duration_days: 0,
        },
    }
}

fn split_period(period: &str) -> Option<(&str, &str)> {
    let arrow: Vec<&str> = period.split(ARROW).collect();
    if let [a, b] = arrow.as_slice() {
        return Some((a, b));
    }
    let dash: Vec<&str> = period.split('-').collect();
    if let [a, b] = dash.as_slice() {
        return Some((a, b));
    }
    None
}

/// Start and end may come in either order.
pub fn timeline_between(start: NaiveDate, end: NaiveDate) -> Timeline {
    let (start, end) = if end < start { (end, start) } else { (start, end) };
    let days = u32::try_from((end - start).num_days()).unwrap_or(u32::MAX);

    let range = year_range(start, end);
    let length = duration_text(days);
    let text = if length.is_empty() {
        range
    } else {
        format!("{range} ({length})")
    };
    Timeline {
        text,
        duration_days: days,
    }
}

/// Whole years (of 52 weeks) and remaining weeks, e.g. `"1 year, 8 weeks"`.
/// Spans shorter than a week give an empty string.
pub fn duration_text(days: u32) -> String {
    let weeks_total = days / 7;
    let years = weeks_total / 52;
    let weeks = weeks_total - years * 52;

    let mut parts = Vec::new();
    if years > 0 {
        parts.push(format!("{years} year{}", if years == 1 { "" } else { "s" }));
    }
    if weeks > 0 {
        parts.push(format!("{weeks} week{}", if weeks == 1 { "" } else { "s" }));
    }
    parts.join(", ")
}

fn year_range(start: NaiveDate, end: NaiveDate) -> String {
    if start.year() == end.year() {
        start.year().to_string()
    } else {
        format!("{} {ARROW} {}", start.year(), end.year())
    }
}

/// Lenient date parsing for hand-entered values.
///
/// Accepts full dates in common layouts, `Month YYYY` (first of the month),
/// `YYYY-MM` and a bare four-digit year (first of January).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let text = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }

    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(text.parse().ok()?, 1, 1);
    }

    let month_year = NaiveDate::parse_from_str(&format!("1 {text}"), "%d %B %Y")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d"))
        .ok()
        .into_iter();
    let full = FULL_DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(&text, format).ok());
    month_year
        .chain(full)
        .find(|date| has_year_token(&text, date.year()))
}

/// Chrono reads `%Y` from any digit run, so `"Jan 2022"` can come back as
/// day 20 of year 22. A parse only counts when its year is written out as a
/// four-digit token.
fn has_year_token(text: &str, year: i32) -> bool {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 4)
        .any(|token| token.parse::<i32>().ok() == Some(year))
}

#[cfg(test)]
mod tests {
    use super::{compute_timeline, duration_text, parse_date};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_year_arrow_range() {
        let t = compute_timeline("Jan 2022 → Mar 2023");
        assert_eq!(t.duration_days, 424);
        assert_eq!(t.text, "2022 → 2023 (1 year, 8 weeks)");
    }

    #[test]
    fn month_names_keep_the_four_digit_year() {
        assert_eq!(parse_date("Jan 2022"), Some(ymd(2022, 1, 1)));
        assert_eq!(parse_date("March 2023"), Some(ymd(2023, 3, 1)));
        assert_eq!(parse_date("Jan 20 2022"), Some(ymd(2022, 1, 20)));
        assert_eq!(parse_date("Jan 2022 extra"), None);

        let t = compute_timeline("Jan 2022 → March 2023");
        assert_eq!(t.text, "2022 → 2023 (1 year, 8 weeks)");
    }

    #[test]
    fn unparsable_text_is_kept() {
        let t = compute_timeline("sometime in the 90s");
        assert_eq!(t.text, "sometime in the 90s");
        assert_eq!(t.duration_days, 0);
    }

    #[test]
    fn empty_period_is_empty() {
        assert_eq!(compute_timeline("   ").text, "");
    }

    #[test]
    fn dash_separated_years() {
        let t = compute_timeline("2019 - 2021");
        assert_eq!(t.duration_days, 731);
        assert_eq!(t.text, "2019 → 2021 (2 years)");
    }

    #[test]
    fn swapped_dates_are_reordered() {
        assert_eq!(compute_timeline("Mar 2023 → Jan 2022").duration_days, 424);
    }

    #[test]
    fn short_stays_show_only_the_year() {
        let t = compute_timeline("2022-05-01 → 2022-05-05");
        assert_eq!(t.text, "2022");
        assert_eq!(t.duration_days, 4);

        let t = compute_timeline("2022-05-01 → 2022-05-15");
        assert_eq!(t.text, "2022 (2 weeks)");
    }

    #[test]
    fn iso_dates_with_dashes_need_the_arrow() {
        let t = compute_timeline("2022-05-01 - 2022-06-01");
        assert_eq!(t.duration_days, 0);
        assert_eq!(t.text, "2022-05-01 - 2022-06-01");
    }

    #[test]
    fn duration_text_pluralizes() {
        assert_eq!(duration_text(6), "");
        assert_eq!(duration_text(7), "1 week");
        assert_eq!(duration_text(364), "1 year");
        assert_eq!(duration_text(800), "2 years, 10 weeks");
    }

    #[test]
    fn lenient_layouts() {
        assert_eq!(parse_date("2022"), Some(ymd(2022, 1, 1)));
        assert_eq!(parse_date(" March   2023 "), Some(ymd(2023, 3, 1)));
        assert_eq!(parse_date("2021/07/04"), Some(ymd(2021, 7, 4)));
        assert_eq!(parse_date("07/04/2021"), Some(ymd(2021, 7, 4)));
        assert_eq!(parse_date("Jul 4, 2021"), Some(ymd(2021, 7, 4)));
        assert_eq!(parse_date("4 July 2021"), Some(ymd(2021, 7, 4)));
        assert_eq!(parse_date("2021-07"), Some(ymd(2021, 7, 1)));
        assert_eq!(parse_date("the 90s"), None);
        assert_eq!(parse_date(""), None);
    }
}
