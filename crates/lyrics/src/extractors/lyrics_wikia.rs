// ABOUTME: Extractor for LyricWiki pages on lyrics.fandom.com and the older lyrics.wikia.com host.
// ABOUTME: Reads the lyricbox and splits the "Artist:Song Lyrics" page heading into artist and title.

use async_trait::async_trait;

use crate::error::LyricsError;
use crate::extractors::select::{first_text, lyrics_text, select_first};
use crate::extractors::Extractor;
use crate::lyrics::LyricsDraft;
use crate::resource::Request;

const LEGACY_HOST: &str = "lyrics.wikia.com";

const TITLE_SELECTORS: &[&str] = &["h1.page-header__title", "h1#firstHeading", "h1"];

/// Lyricbox contents the wiki uses when it has nothing to show.
const PLACEHOLDERS: &[&str] = &[
    "we are not licensed to display",
    "unfortunately, we are not licensed",
];

pub struct LyricsWikia;

#[async_trait(?Send)]
impl Extractor for LyricsWikia {
    fn name(&self) -> &str {
        "LyricsWikia"
    }

    fn url(&self) -> &str {
        "https://lyrics.fandom.com"
    }

    fn pattern(&self) -> &str {
        "lyrics.fandom.com"
    }

    fn can_handle(&self, request: &Request) -> bool {
        let url = request.url();
        url.contains(self.pattern()) || url.contains(LEGACY_HOST)
    }

    async fn extract_lyrics(&self, request: &mut Request) -> Result<LyricsDraft, LyricsError> {
        let url = request.url().to_string();
        let doc = request.document().await?;

        let lyrics = select_first(doc, "div.lyricbox")
            .map(|el| lyrics_text(&el))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                LyricsError::no_lyrics(
                    &url,
                    "LyricsWikia.extract_lyrics",
                    Some(anyhow::anyhow!("no lyricbox")),
                )
            })?;

        let lowered = lyrics.to_lowercase();
        if lowered == "instrumental" || PLACEHOLDERS.iter().any(|p| lowered.contains(p)) {
            return Err(LyricsError::no_lyrics(
                &url,
                "LyricsWikia.extract_lyrics",
                Some(anyhow::anyhow!("placeholder lyricbox: {}", lyrics)),
            ));
        }

        let heading = first_text(doc, TITLE_SELECTORS).ok_or_else(|| {
            LyricsError::extract(
                &url,
                "LyricsWikia.extract_lyrics",
                Some(anyhow::anyhow!("missing page heading")),
            )
        })?;
        let (artist, title) = split_heading(&heading);

        Ok(LyricsDraft::new(title, lyrics).artist(artist))
    }
}

/// Split a wiki heading like `Queen:Bohemian Rhapsody Lyrics`.
fn split_heading(heading: &str) -> (Option<String>, String) {
    let heading = heading.strip_suffix(" Lyrics").unwrap_or(heading);
    match heading.split_once(':') {
        Some((artist, title)) if !artist.trim().is_empty() && !title.trim().is_empty() => {
            (Some(artist.trim().to_string()), title.trim().to_string())
        }
        _ => (None, heading.trim().to_string()),
    }
}
