// ABOUTME: Extractor for darklyrics.com album pages, which hold the lyrics of every track on one page.
// ABOUTME: Picks a track by URL fragment number or by the requested song name and falls back to the first track.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use crate::error::LyricsError;
use crate::extractors::select::{extract_year, first_text, select_first};
use crate::extractors::Extractor;
use crate::formats::html_to_lyrics_text;
use crate::lyrics::LyricsDraft;
use crate::resource::Request;

static TRACK_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h3[^>]*>(.*?)</h3>").unwrap());
static TRACK_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)\.\s*").unwrap());
static TRAILER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div\s+class="(thanks|note)".*$"#).unwrap());

/// One track section of an album page.
#[derive(Debug, Clone, PartialEq)]
struct Track {
    number: Option<u32>,
    title: String,
    lyrics: String,
}

pub struct DarkLyrics;

#[async_trait(?Send)]
impl Extractor for DarkLyrics {
    fn name(&self) -> &str {
        "DarkLyrics"
    }

    fn url(&self) -> &str {
        "http://www.darklyrics.com"
    }

    fn pattern(&self) -> &str {
        "darklyrics.com"
    }

    async fn extract_lyrics(&self, request: &mut Request) -> Result<LyricsDraft, LyricsError> {
        let url = request.url().to_string();
        let song = request.song().map(str::to_string);
        let doc = request.document().await?;

        let body = select_first(doc, "div.lyrics")
            .map(|el| el.inner_html())
            .ok_or_else(|| {
                LyricsError::no_lyrics(
                    &url,
                    "DarkLyrics.extract_lyrics",
                    Some(anyhow::anyhow!("no lyrics section")),
                )
            })?;

        let tracks = split_tracks(&body);
        let track = pick_track(&tracks, fragment_number(&url), song.as_deref()).ok_or_else(|| {
            LyricsError::no_lyrics(
                &url,
                "DarkLyrics.extract_lyrics",
                Some(anyhow::anyhow!("no matching track on album page")),
            )
        })?;

        let artist = first_text(doc, &["div.albumlyrics h1", "h1"]).map(|a| {
            let a = a.strip_suffix(" LYRICS").unwrap_or(&a);
            title_case(a)
        });
        let release_date = first_text(doc, &["div.albumlyrics h2", "h2"])
            .and_then(|album| extract_year(&album));

        Ok(LyricsDraft::new(track.title.clone(), track.lyrics.clone())
            .artist(artist)
            .release_date(release_date))
    }
}

/// Split the album lyrics markup at each `<h3>` track heading.
fn split_tracks(body: &str) -> Vec<Track> {
    let body = TRAILER_RE.replace(body, "");
    let headings: Vec<_> = TRACK_HEADING_RE.captures_iter(&body).collect();
    let mut tracks = Vec::with_capacity(headings.len());

    for (i, caps) in headings.iter().enumerate() {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = headings
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(body.len());

        let heading = Html::parse_fragment(inner.as_str())
            .root_element()
            .text()
            .collect::<String>();
        let heading = heading.trim();
        let number = TRACK_NUMBER_RE
            .captures(heading)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok());
        let title = TRACK_NUMBER_RE.replace(heading, "").trim().to_string();
        let lyrics = html_to_lyrics_text(&body[whole.end()..end]);

        tracks.push(Track {
            number,
            title,
            lyrics,
        });
    }
    tracks
}

fn pick_track<'a>(
    tracks: &'a [Track],
    number: Option<u32>,
    song: Option<&str>,
) -> Option<&'a Track> {
    if let Some(n) = number {
        if let Some(track) = tracks.iter().find(|t| t.number == Some(n)) {
            return Some(track);
        }
    }
    if let Some(song) = song {
        let wanted = comparable(song);
        return tracks.iter().find(|t| comparable(&t.title) == wanted);
    }
    tracks.first()
}

/// Track number from a `#N` URL fragment.
fn fragment_number(url: &str) -> Option<u32> {
    url.rsplit_once('#')?.1.parse().ok()
}

fn comparable(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
