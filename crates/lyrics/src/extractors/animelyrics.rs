// ABOUTME: Extractor for animelyrics.com songs, read from the plain-text variant of each song page.
// ABOUTME: Rewrites the request URL from .htm to .txt before fetching and parses the header block for title and artist.

use async_trait::async_trait;

use crate::error::LyricsError;
use crate::extractors::Extractor;
use crate::formats::{normalize_lyrics, normalize_whitespace};
use crate::lyrics::LyricsDraft;
use crate::resource::Request;

const PERFORMER_PREFIXES: &[&str] = &["Performed by", "Performed By", "Sung by"];

pub struct Animelyrics;

#[async_trait(?Send)]
impl Extractor for Animelyrics {
    fn name(&self) -> &str {
        "Animelyrics"
    }

    fn url(&self) -> &str {
        "http://www.animelyrics.com"
    }

    fn pattern(&self) -> &str {
        "animelyrics.com"
    }

    async fn extract_lyrics(&self, request: &mut Request) -> Result<LyricsDraft, LyricsError> {
        if let Some(txt) = text_variant(request.url()) {
            request.set_url(txt);
        }
        let url = request.url().to_string();
        let text = request.text().await?;

        if text.trim_start().starts_with('<') {
            return Err(LyricsError::extract(
                &url,
                "Animelyrics.extract_lyrics",
                Some(anyhow::anyhow!("expected plain text, got markup")),
            ));
        }

        parse_song_text(text).ok_or_else(|| {
            LyricsError::no_lyrics(
                &url,
                "Animelyrics.extract_lyrics",
                Some(anyhow::anyhow!("no lyrics after header")),
            )
        })
    }
}

/// The `.txt` sibling of an `.htm`/`.html` song page, if the URL has one.
fn text_variant(url: &str) -> Option<String> {
    let (path, fragment) = match url.split_once('#') {
        Some((path, fragment)) => (path, Some(fragment)),
        None => (url, None),
    };
    let stem = path
        .strip_suffix(".html")
        .or_else(|| path.strip_suffix(".htm"))?;
    let mut txt = format!("{}.txt", stem);
    if let Some(fragment) = fragment {
        txt.push('#');
        txt.push_str(fragment);
    }
    Some(txt)
}

/// Parse a song text file: a header block (title, credits) then the lyrics.
fn parse_song_text(text: &str) -> Option<LyricsDraft> {
    let normalized = normalize_lyrics(text);
    let mut blocks = normalized.split("\n\n");
    let header = blocks.next()?;

    let mut header_lines = header.lines();
    let title = normalize_whitespace(header_lines.next()?);
    let artist = header_lines.find_map(|line| {
        PERFORMER_PREFIXES
            .iter()
            .find_map(|prefix| line.strip_prefix(prefix))
            .map(|rest| normalize_whitespace(rest.trim_start_matches(':')))
    });

    let lyrics = blocks.collect::<Vec<_>>().join("\n\n");
    if title.is_empty() || lyrics.is_empty() {
        return None;
    }
    Some(LyricsDraft::new(title, lyrics).artist(artist))
}
