// ABOUTME: Extractor for genius.com song pages.
// ABOUTME: Joins the page's lyric containers and reads title, artist and release date from the song header.

use async_trait::async_trait;

use crate::error::LyricsError;
use crate::extractors::select::{
    first_attr, first_text, joined_lyrics, parse_release_date, select_all,
};
use crate::extractors::Extractor;
use crate::lyrics::LyricsDraft;
use crate::resource::Request;

const LYRICS_SELECTORS: &[&str] = &["div[data-lyrics-container='true']", "div.lyrics"];

const TITLE_SELECTORS: &[&str] = &[
    "h1[class*='SongHeader'] span",
    "h1[class*='SongHeader']",
    "h1.header_with_cover_art-primary_info-title",
    "h1",
];

const ARTIST_SELECTORS: &[&str] = &[
    "a[class*='HeaderArtistAndTracklist'][href*='/artists/']",
    "a[class*='SongHeader'][href*='/artists/']",
    "a.header_with_cover_art-primary_info-primary_artist",
];

const DATE_SELECTORS: &[&str] = &[
    "div[class*='MetadataStats'] span",
    "span.metadata_unit-info--text_only",
];

pub struct Genius;

#[async_trait(?Send)]
impl Extractor for Genius {
    fn name(&self) -> &str {
        "Genius"
    }

    fn url(&self) -> &str {
        "https://genius.com"
    }

    fn pattern(&self) -> &str {
        "genius.com"
    }

    async fn extract_lyrics(&self, request: &mut Request) -> Result<LyricsDraft, LyricsError> {
        let url = request.url().to_string();
        let doc = request.document().await?;

        let lyrics = LYRICS_SELECTORS
            .iter()
            .find_map(|css| joined_lyrics(doc, css))
            .ok_or_else(|| {
                LyricsError::no_lyrics(
                    &url,
                    "Genius.extract_lyrics",
                    Some(anyhow::anyhow!("no lyrics container")),
                )
            })?;

        let title = first_text(doc, TITLE_SELECTORS).ok_or_else(|| {
            LyricsError::extract(
                &url,
                "Genius.extract_lyrics",
                Some(anyhow::anyhow!("missing song title")),
            )
        })?;

        let artist = first_text(doc, ARTIST_SELECTORS).or_else(|| {
            first_attr(doc, &["meta[property='genius:track_artist']"], "content")
        });

        let release_date = DATE_SELECTORS
            .iter()
            .flat_map(|css| select_all(doc, css))
            .find_map(|el| parse_release_date(&el.text().collect::<String>()));

        Ok(LyricsDraft::new(title, lyrics)
            .artist(artist)
            .release_date(release_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"
        <html><head><title>Queen – Bohemian Rhapsody Lyrics | Genius Lyrics</title></head>
        <body>
          <h1 class="SongHeaderdesktop__Title-sc-1"><span>Bohemian Rhapsody</span></h1>
          <a class="HeaderArtistAndTracklistdesktop__Artist-sc-4" href="https://genius.com/artists/Queen">Queen</a>
          <div class="MetadataStats__Container-sc-1"><span>12.3M views</span><span>October 31, 1975</span></div>
          <div data-lyrics-container="true" class="Lyrics__Container-sc-1">[Intro]<br>Is this the real life?<br><a href="/1">Is this just fantasy?</a></div>
          <div data-lyrics-container="true" class="Lyrics__Container-sc-1">[Verse 1]<br>Mama, just killed a man</div>
        </body></html>
    "#;

    fn seeded(html: &str) -> Request {
        Request::new(reqwest::Client::new(), "https://genius.com/Queen-bohemian-rhapsody-lyrics")
            .with_text(html)
    }

    #[tokio::test]
    async fn extracts_song_page() {
        let mut request = seeded(PAGE);
        let draft = Genius.extract_lyrics(&mut request).await.expect("extract");

        assert_eq!(draft.title, "Bohemian Rhapsody");
        assert_eq!(draft.artist.as_deref(), Some("Queen"));
        assert_eq!(draft.release_date, NaiveDate::from_ymd_opt(1975, 10, 31));
        assert_eq!(
            draft.lyrics,
            "[Intro]\nIs this the real life?\nIs this just fantasy?\n\n[Verse 1]\nMama, just killed a man"
        );
    }

    #[tokio::test]
    async fn legacy_lyrics_div() {
        let html = r#"<html><body>
            <h1 class="header_with_cover_art-primary_info-title">Old Song</h1>
            <div class="lyrics"><p>old line<br>older line</p></div>
        </body></html>"#;
        let mut request = seeded(html);
        let draft = Genius.extract_lyrics(&mut request).await.expect("extract");
        assert_eq!(draft.title, "Old Song");
        assert_eq!(draft.lyrics, "old line\nolder line");
        assert!(draft.artist.is_none());
        assert!(draft.release_date.is_none());
    }

    #[tokio::test]
    async fn instrumental_has_no_lyrics() {
        let html = r#"<html><body><h1>Interlude</h1>
            <div class="LyricsPlaceholder__Message">This song is an instrumental</div>
        </body></html>"#;
        let mut request = seeded(html);
        let err = Genius.extract_lyrics(&mut request).await.unwrap_err();
        assert!(err.is_no_lyrics());
    }

    #[tokio::test]
    async fn missing_title_is_unexpected() {
        let html = r#"<html><body><div data-lyrics-container="true">words</div></body></html>"#;
        let mut request = seeded(html);
        let err = Genius.extract_lyrics(&mut request).await.unwrap_err();
        assert!(err.is_extract());
    }
}
