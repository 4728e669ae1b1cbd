//! Escaping and date formatting shared by every template and by the parser.

use chrono::{DateTime, NaiveDate};

/// Label shown instead of an end date for ongoing entries.
pub const PRESENT: &str = "Present";

/// Separator placed between the two halves of a rendered date range (an en dash in LaTeX).
pub const RANGE_SEPARATOR: &str = " -- ";

/// Escape sequences, one per reserved character. Unescaping relies on every
/// sequence starting with a backslash and none being a prefix of another.
const SEQUENCES: &[(char, &str)] = &[
    ('\\', r"\textbackslash{}"),
    ('&', r"\&"),
    ('%', r"\%"),
    ('$', r"\$"),
    ('#', r"\#"),
    ('_', r"\_"),
    ('{', r"\{"),
    ('}', r"\}"),
    ('~', r"\textasciitilde{}"),
    ('^', r"\textasciicircum{}"),
];

/// Replaces every character reserved by LaTeX with its literal-safe sequence.
///
/// Works in a single pass over the input, so the sequences produced for one
/// character are never re-escaped (e.g. the braces of `\textbackslash{}`).
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match SEQUENCES.iter().find(|(reserved, _)| *reserved == c) {
            Some((_, seq)) => out.push_str(seq),
            None => out.push(c),
        }
    }
    out
}

/// Exact inverse of [`escape_latex`]. Unknown backslash sequences are kept verbatim.
pub fn unescape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match SEQUENCES.iter().find(|(_, seq)| tail.starts_with(seq)) {
            Some((c, seq)) => {
                out.push(*c);
                rest = &tail[seq.len()..];
            }
            None => {
                out.push('\\');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Formats a date value as `Mon YYYY`.
///
/// `current` wins over the value and yields [`PRESENT`]. Values that do not
/// parse as a calendar date (including a bare year) come back unchanged.
pub fn format_date(value: &str, current: bool) -> String {
    if current {
        return PRESENT.to_string();
    }
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match parse_calendar_date(trimmed) {
        Some(date) => date.format("%b %Y").to_string(),
        None => value.to_string(),
    }
}

fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    const FULL_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y"];

    for fmt in FULL_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    // Month precision: "2020-06", "Jun 2020", "June 2020".
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDate::parse_from_str(&format!("1 {value}"), "%d %B %Y").ok()
}

/// Formats and escapes a single date for embedding in LaTeX.
pub fn latex_date(value: &str) -> String {
    escape_latex(&format_date(value, false))
}

/// Renders `start -- end` (or whichever half exists), escaped for LaTeX.
pub fn date_range(start: &str, end: &str, current: bool) -> String {
    let start = escape_latex(&format_date(start, false));
    let end = escape_latex(&format_date(end, current));
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start}{RANGE_SEPARATOR}{end}"),
        (false, true) => start,
        (true, false) => end,
        (true, true) => String::new(),
    }
}

/// Splits a plain-text date range into `(start, end, current)`.
///
/// Accepts `--`, en dash, em dash or a spaced hyphen as the separator. An end
/// token of "present" (any case) sets `current` and leaves `end` empty.
pub fn split_date_range(text: &str) -> (String, String, bool) {
    let text = text.trim();
    let split = ["--", "\u{2013}", "\u{2014}", " - "]
        .iter()
        .find_map(|sep| text.split_once(sep));

    match split {
        Some((start, end)) => {
            let start = start.trim().to_string();
            let end = end.trim();
            if end.eq_ignore_ascii_case(PRESENT) {
                (start, String::new(), true)
            } else {
                (start, end.to_string(), false)
            }
        }
        None if text.eq_ignore_ascii_case(PRESENT) => (String::new(), String::new(), true),
        None => (text.to_string(), String::new(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_reserved_characters() {
        assert_eq!(escape_latex("R&D 100% $5 #1 a_b"), r"R\&D 100\% \$5 \#1 a\_b");
        assert_eq!(escape_latex("{x}"), r"\{x\}");
        assert_eq!(escape_latex("~^"), r"\textasciitilde{}\textasciicircum{}");
    }

    #[test]
    fn test_escape_backslash_is_not_double_escaped() {
        assert_eq!(escape_latex(r"C:\dir"), r"C:\textbackslash{}dir");
    }

    #[test]
    fn test_escape_empty_input() {
        assert_eq!(escape_latex(""), "");
        assert_eq!(unescape_latex(""), "");
    }

    #[test]
    fn test_unescape_inverts_escape() {
        let samples = [
            "plain text",
            "Smith & Sons",
            r"\textbackslash{} already escaped?",
            r"\&\%",
            "{nested {braces}} ~ ^ _ # $ %",
            r"trailing backslash \",
            "unicode — ünïcödé ✓",
        ];
        for sample in samples {
            assert_eq!(unescape_latex(&escape_latex(sample)), sample, "sample {sample:?}");
        }
    }

    #[test]
    fn test_unescape_keeps_unknown_commands() {
        assert_eq!(unescape_latex(r"\textbf{x} \& y"), r"\textbf{x} & y");
    }

    #[test]
    fn test_format_date_iso() {
        assert_eq!(format_date("2023-06-01", false), "Jun 2023");
    }

    #[test]
    fn test_format_date_current_wins() {
        assert_eq!(format_date("", true), PRESENT);
        assert_eq!(format_date("2023-06-01", true), PRESENT);
    }

    #[test]
    fn test_format_date_unparseable_is_unchanged() {
        assert_eq!(format_date("not-a-date", false), "not-a-date");
        assert_eq!(format_date("2016", false), "2016");
        assert_eq!(format_date("", false), "");
    }

    #[test]
    fn test_format_date_month_precision_and_idempotence() {
        assert_eq!(format_date("2014-09", false), "Sep 2014");
        assert_eq!(format_date("Sep 2014", false), "Sep 2014");
        assert_eq!(format_date("September 2014", false), "Sep 2014");
        assert_eq!(format_date("2023-08-15T10:00:00Z", false), "Aug 2023");
    }

    #[test]
    fn test_date_range_variants() {
        assert_eq!(date_range("2020-01-01", "", true), "Jan 2020 -- Present");
        assert_eq!(date_range("2017-06-01", "2019-12-31", false), "Jun 2017 -- Dec 2019");
        assert_eq!(date_range("2017-06-01", "", false), "Jun 2017");
        assert_eq!(date_range("", "", false), "");
        assert_eq!(date_range("Q3 & Q4", "", false), r"Q3 \& Q4");
    }

    #[test]
    fn test_split_date_range() {
        assert_eq!(
            split_date_range("Jan 2020 -- Present"),
            ("Jan 2020".to_string(), String::new(), true)
        );
        assert_eq!(
            split_date_range("Jun 2017 \u{2013} Dec 2019"),
            ("Jun 2017".to_string(), "Dec 2019".to_string(), false)
        );
        assert_eq!(
            split_date_range("2019-05 - 2021-12"),
            ("2019-05".to_string(), "2021-12".to_string(), false)
        );
        assert_eq!(split_date_range("present"), (String::new(), String::new(), true));
        assert_eq!(
            split_date_range("May 2015"),
            ("May 2015".to_string(), String::new(), false)
        );
    }
}
