// ABOUTME: Extractor for azlyrics.com song pages.
// ABOUTME: Reads the unclassed lyrics div inside the main column and detects the site's bot check page.

use async_trait::async_trait;

use crate::error::LyricsError;
use crate::extractors::select::{extract_year, first_text, lyrics_text, select_all};
use crate::extractors::Extractor;
use crate::lyrics::LyricsDraft;
use crate::resource::Request;

const MAIN_COLUMN: &str = "div.col-xs-12.col-lg-8.text-center";

/// Marker text of the page AZLyrics serves instead of lyrics to suspected bots.
const BLOCKED_MARKER: &str = "unusual activity from your IP";

pub struct AzLyrics;

#[async_trait(?Send)]
impl Extractor for AzLyrics {
    fn name(&self) -> &str {
        "AZLyrics"
    }

    fn url(&self) -> &str {
        "https://www.azlyrics.com"
    }

    fn pattern(&self) -> &str {
        "azlyrics.com"
    }

    async fn extract_lyrics(&self, request: &mut Request) -> Result<LyricsDraft, LyricsError> {
        let url = request.url().to_string();

        if request.text().await?.contains(BLOCKED_MARKER) {
            return Err(LyricsError::not_allowed(
                &url,
                "AZLyrics.extract_lyrics",
                Some(anyhow::anyhow!("bot check page")),
            ));
        }

        let doc = request.document().await?;

        // The lyrics live in the only direct child div without a class.
        let lyrics = select_all(doc, &format!("{} > div", MAIN_COLUMN))
            .into_iter()
            .find(|el| el.value().attr("class").is_none())
            .map(|el| lyrics_text(&el))
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                LyricsError::no_lyrics(
                    &url,
                    "AZLyrics.extract_lyrics",
                    Some(anyhow::anyhow!("no lyrics div")),
                )
            })?;

        let title_css = format!("{} > b", MAIN_COLUMN);
        let title = first_text(doc, &[title_css.as_str()])
            .map(|t| t.trim_matches('"').trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                LyricsError::extract(
                    &url,
                    "AZLyrics.extract_lyrics",
                    Some(anyhow::anyhow!("missing song title")),
                )
            })?;

        let artist = first_text(doc, &["div.lyricsh h2 b", "div.lyricsh h2"]).map(|a| {
            a.strip_suffix(" Lyrics")
                .map(str::to_string)
                .unwrap_or(a)
        });

        let release_date = first_text(doc, &["div.songinalbum_title"])
            .and_then(|album| extract_year(&album));

        Ok(LyricsDraft::new(title, lyrics)
            .artist(artist)
            .release_date(release_date))
    }
}
