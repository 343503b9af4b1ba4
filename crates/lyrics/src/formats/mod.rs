// ABOUTME: Text converters shared by extractors for turning lyric markup into plain text.
// ABOUTME: Handles <br> and paragraph breaks, entity decoding and stanza-preserving whitespace cleanup.

//! Lyrics text conversion.
//!
//! Lyric sites mark lines up with `<br>` and stanzas with paragraphs or
//! double breaks. These helpers keep that shape: one line per lyric line,
//! a single blank line between stanzas.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

// A <br> swallows the source newline that usually follows it.
static BR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?\s*>[^\S\n]*\n?").unwrap());
static PARAGRAPH_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(p|div|h[1-6])\s*>").unwrap());
static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)[^>]*>.*?</(script|style|noscript)\s*>").unwrap()
});
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static HSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());
static BLANK_LINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Convert a lyrics HTML fragment into plain text.
///
/// `<br>` becomes a line break, closing block tags end a stanza, scripts and
/// comments are dropped and entities are decoded.
pub fn html_to_lyrics_text(html: &str) -> String {
    let stripped = SCRIPT_RE.replace_all(html, "");
    let stripped = COMMENT_RE.replace_all(&stripped, "");
    let with_breaks = BR_RE.replace_all(&stripped, "\n");
    let with_stanzas = PARAGRAPH_END_RE.replace_all(&with_breaks, "\n\n$0");

    let fragment = Html::parse_fragment(&with_stanzas);
    let raw: String = fragment.root_element().text().collect();
    normalize_lyrics(&raw)
}

/// Normalize plain lyric text.
///
/// Trims every line, collapses horizontal whitespace, keeps at most one
/// blank line between stanzas and trims the whole text.
pub fn normalize_lyrics(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = unified
        .split('\n')
        .map(|line| HSPACE_RE.replace_all(line.trim(), " ").into_owned())
        .collect();
    let joined = lines.join("\n");
    BLANK_LINES_RE
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

/// Collapse all whitespace runs to single spaces, for titles and names.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn br_tags_become_lines() {
        let html = "First line<br>Second line<br/>Third line<BR />Fourth";
        assert_eq!(
            html_to_lyrics_text(html),
            "First line\nSecond line\nThird line\nFourth"
        );
    }

    #[test]
    fn paragraphs_become_stanzas() {
        let html = "<p>Verse one<br>still one</p><p>Verse two</p>";
        assert_eq!(
            html_to_lyrics_text(html),
            "Verse one\nstill one\n\nVerse two"
        );
    }

    #[test]
    fn br_followed_by_source_newline() {
        let html = "one<br>\ntwo<br>\n<br>\nthree<br>\n";
        assert_eq!(html_to_lyrics_text(html), "one\ntwo\n\nthree");
    }

    #[test]
    fn double_breaks_keep_one_blank_line() {
        let html = "a<br><br><br><br>b";
        assert_eq!(html_to_lyrics_text(html), "a\n\nb");
    }

    #[test]
    fn drops_scripts_and_comments() {
        let html = "<!-- Usage of azlyrics.com content -->line<script>var x = 1;</script><br>next";
        assert_eq!(html_to_lyrics_text(html), "line\nnext");
    }

    #[test]
    fn decodes_entities_and_inline_tags() {
        let html = "I&#39;m <i>here</i> &amp; <a href='/x'>there</a>";
        assert_eq!(html_to_lyrics_text(html), "I'm here & there");
    }

    #[test]
    fn normalize_trims_lines() {
        let text = "  one  \r\n\t two\t\tthree \n\n\n\nfour  ";
        assert_eq!(normalize_lyrics(text), "one\ntwo three\n\nfour");
    }

    #[test]
    fn normalize_whitespace_collapses() {
        assert_eq!(normalize_whitespace("  hello   world  "), "hello world");
        assert_eq!(normalize_whitespace("no\textra\nspaces"), "no extra spaces");
        assert_eq!(normalize_whitespace(""), "");
    }
}
