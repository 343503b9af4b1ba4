// ABOUTME: Candidate URL sources for a search and the cursor that resolves them into lyrics.
// ABOUTME: URL sources are lazy local streams; nothing touches the network until a cursor pulls.

pub mod cursor;
pub mod google;

use futures::stream::{self, LocalBoxStream, StreamExt};

use crate::error::LyricsError;

pub use cursor::SearchResult;
pub use google::WebSearch;

/// Forward-only sequence of candidate URLs.
pub type UrlStream<'a> = LocalBoxStream<'a, Result<String, LyricsError>>;

/// Stream over a fixed list of URLs.
pub fn fixed_urls(urls: Vec<String>) -> UrlStream<'static> {
    stream::iter(urls.into_iter().map(Ok)).boxed_local()
}

/// Query string sent to the search API for a song.
pub fn build_query(artist: &str, song: &str) -> String {
    format!("{} {} lyrics", artist.trim(), song.trim())
        .trim()
        .to_string()
}
