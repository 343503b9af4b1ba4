// ABOUTME: Extractor for musixmatch.com lyrics pages.
// ABOUTME: Sends a browser user agent, joins the lyric spans and recognizes the site's restricted-lyrics notices.

use async_trait::async_trait;

use crate::error::LyricsError;
use crate::extractors::select::{first_text, joined_lyrics, select_first};
use crate::extractors::Extractor;
use crate::lyrics::LyricsDraft;
use crate::resource::Request;

/// Musixmatch serves a stripped page to non-browser clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

const LYRICS_SELECTORS: &[&str] = &[
    "span.lyrics__content__ok",
    "span.lyrics__content__warning",
    "p.mxm-lyrics__content",
];

const RESTRICTED_SELECTORS: &[&str] = &[
    "div.mxm-lyrics-not-available",
    "div.lyrics__content__error",
];

pub struct Musixmatch;

#[async_trait(?Send)]
impl Extractor for Musixmatch {
    fn name(&self) -> &str {
        "Musixmatch"
    }

    fn url(&self) -> &str {
        "https://www.musixmatch.com"
    }

    fn pattern(&self) -> &str {
        "musixmatch.com"
    }

    async fn extract_lyrics(&self, request: &mut Request) -> Result<LyricsDraft, LyricsError> {
        let url = request.url().to_string();
        if request.header("user-agent").is_none() {
            request.set_header("user-agent", BROWSER_USER_AGENT);
        }
        let doc = request.document().await?;

        let restricted = RESTRICTED_SELECTORS
            .iter()
            .any(|css| select_first(doc, css).is_some());
        let lyrics = LYRICS_SELECTORS
            .iter()
            .find_map(|css| joined_lyrics(doc, css))
            .filter(|_| !restricted)
            .ok_or_else(|| {
                LyricsError::no_lyrics(
                    &url,
                    "Musixmatch.extract_lyrics",
                    Some(anyhow::anyhow!(if restricted {
                        "lyrics not available"
                    } else {
                        "no lyrics content"
                    })),
                )
            })?;

        let title = first_text(doc, &["h1.mxm-track-title__track", "h1"])
            .map(|t| t.strip_prefix("Lyrics").map(str::trim).unwrap_or(&t).to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                LyricsError::extract(
                    &url,
                    "Musixmatch.extract_lyrics",
                    Some(anyhow::anyhow!("missing song title")),
                )
            })?;

        let artist = first_text(doc, &["a.mxm-track-title__artist", "h2 a[href*='/artist/']"]);

        Ok(LyricsDraft::new(title, lyrics).artist(artist))
    }
}
