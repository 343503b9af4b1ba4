// ABOUTME: Selector-based helpers extractors use to pull titles, attributes, lyric blocks and dates from pages.
// ABOUTME: Selectors are tried in order and the first non-empty match wins.

//! Selector-based field extraction utilities.
//!
//! Key behaviors:
//! - Selectors are tried in order; first non-empty match wins.
//! - Text values are whitespace-normalized; lyric blocks keep line breaks.
//! - Invalid selectors never match.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::extractors::compiled::get_or_compile;
use crate::formats::{html_to_lyrics_text, normalize_whitespace};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(1[89]\d{2}|20\d{2})\b").unwrap());

/// Returns the first element matching `css`.
pub fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = get_or_compile(css)?;
    doc.select(&selector).next()
}

/// Returns every element matching `css`, in document order.
pub fn select_all<'a>(doc: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match get_or_compile(css) {
        Some(selector) => doc.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Extracts normalized text from the first selector that yields a non-empty match.
pub fn first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    for css in selectors {
        for el in select_all(doc, css) {
            let text = normalize_whitespace(&el.text().collect::<String>());
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Extracts an attribute value from the first selector that yields a non-empty result.
pub fn first_attr(doc: &Html, selectors: &[&str], attr: &str) -> Option<String> {
    for css in selectors {
        for el in select_all(doc, css) {
            if let Some(value) = el.value().attr(attr) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

/// Converts an element's markup into lyric text, keeping line breaks.
pub fn lyrics_text(el: &ElementRef<'_>) -> String {
    html_to_lyrics_text(&el.inner_html())
}

/// Joins the lyric text of every element matching `css`, one block per stanza.
///
/// Returns `None` when nothing matched or every block was empty.
pub fn joined_lyrics(doc: &Html, css: &str) -> Option<String> {
    let blocks: Vec<String> = select_all(doc, css)
        .iter()
        .map(lyrics_text)
        .filter(|text| !text.is_empty())
        .collect();
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

/// Parse a release date as coarse as the source gives it.
///
/// Full dates are tried first (RFC3339, common written forms, then
/// dateparser); a lone year maps to January 1st of that year.
pub fn parse_release_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    const LOOSE_PATTERNS: &[&str] = &[
        "%Y-%m-%d", // 2024-01-05
        "%B %e, %Y", // January 5, 2024
        "%B %d, %Y", // January 05, 2024
        "%b %e, %Y", // Jan 5, 2024
        "%e %B %Y",  // 5 January 2024
        "%d %b %Y",  // 05 Jan 2024
    ];
    for pat in LOOSE_PATTERNS {
        if let Ok(date) = NaiveDate::parse_from_str(s, pat) {
            return Some(date);
        }
    }

    if s.len() == 4 {
        if let Ok(year) = s.parse::<i32>() {
            return NaiveDate::from_ymd_opt(year, 1, 1);
        }
    }

    if let Ok(dt) = dateparser::parse(s) {
        return Some(dt.date_naive());
    }

    extract_year(s)
}

/// Finds a four-digit year anywhere in `s`, mapped to January 1st.
pub fn extract_year(s: &str) -> Option<NaiveDate> {
    let caps = YEAR_RE.captures(s)?;
    let year = caps.get(1)?.as_str().parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_HTML: &str = r#"
        <html>
        <head>
            <title>Song Page</title>
            <meta property="og:title" content="  Song Title  ">
        </head>
        <body>
            <h1>  Main   Title  </h1>
            <div class="empty"></div>
            <div class="verse">Line one<br>Line two</div>
            <div class="verse">Line three</div>
        </body>
        </html>
    "#;

    fn doc() -> Html {
        Html::parse_document(SAMPLE_HTML)
    }

    #[test]
    fn first_text_normalizes_and_skips_empty() {
        let doc = doc();
        assert_eq!(
            first_text(&doc, &["div.empty", "h1"]),
            Some("Main Title".to_string())
        );
        assert_eq!(first_text(&doc, &["section"]), None);
    }

    #[test]
    fn first_attr_trims() {
        let doc = doc();
        assert_eq!(
            first_attr(&doc, &["meta[property='og:title']"], "content"),
            Some("Song Title".to_string())
        );
    }

    #[test]
    fn joined_lyrics_keeps_blocks() {
        let doc = doc();
        assert_eq!(
            joined_lyrics(&doc, "div.verse"),
            Some("Line one\nLine two\n\nLine three".to_string())
        );
        assert_eq!(joined_lyrics(&doc, "div.empty"), None);
    }

    #[test]
    fn invalid_selector_never_matches() {
        let doc = doc();
        assert!(select_first(&doc, "[[[invalid").is_none());
        assert!(select_all(&doc, "[[[invalid").is_empty());
    }

    #[test]
    fn parses_full_dates() {
        let expected = NaiveDate::from_ymd_opt(2015, 3, 3);
        assert_eq!(parse_release_date("2015-03-03"), expected);
        assert_eq!(parse_release_date("March 3, 2015"), expected);
        assert_eq!(parse_release_date("2015-03-03T10:00:00Z"), expected);
    }

    #[test]
    fn parses_year_only() {
        assert_eq!(parse_release_date("1999"), NaiveDate::from_ymd_opt(1999, 1, 1));
        assert_eq!(
            extract_year("album: \"Ride the Lightning\" (1984)"),
            NaiveDate::from_ymd_opt(1984, 1, 1)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_release_date(""), None);
        assert_eq!(extract_year("no digits here"), None);
    }
}
