// ABOUTME: SearchResult cursor that resolves candidate URLs into lyrics one at a time or in a bounded batch.
// ABOUTME: Exhaustion surfaces as NoLyrics from next() and as a clean end from iteration and to_list().

use std::time::Duration;

use futures::stream::{self, FuturesUnordered, Stream, StreamExt};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::LyricsError;
use crate::lyrics::Lyrics;
use crate::manager::LyricsManager;
use crate::search::UrlStream;

/// Lazy, forward-only cursor over the lyrics found for one query.
///
/// Holds the session used for every fetch it makes; a session built for
/// the cursor is released when the cursor is dropped.
pub struct SearchResult<'a> {
    manager: &'a LyricsManager,
    client: reqwest::Client,
    query: String,
    urls: UrlStream<'a>,
    song: Option<String>,
    artist: Option<String>,
}

impl<'a> SearchResult<'a> {
    pub fn new(
        manager: &'a LyricsManager,
        client: reqwest::Client,
        query: impl Into<String>,
        urls: UrlStream<'a>,
    ) -> Self {
        Self {
            manager,
            client,
            query: query.into(),
            urls,
            song: None,
            artist: None,
        }
    }

    /// Song hint passed to every extraction attempt.
    pub fn with_song(mut self, song: Option<&str>) -> Self {
        self.song = song.map(str::to_string);
        self
    }

    /// Artist hint passed to every extraction attempt.
    pub fn with_artist(mut self, artist: Option<&str>) -> Self {
        self.artist = artist.map(str::to_string);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Pull the next candidate URL, `None` once the candidates are exhausted.
    pub async fn next_url(&mut self) -> Result<Option<String>, LyricsError> {
        self.urls.next().await.transpose()
    }

    /// Resolve candidates until one yields lyrics.
    ///
    /// With `silent`, URLs no extractor could handle are skipped; otherwise
    /// the first such failure is returned. Fails with `NoLyrics` when the
    /// candidates run out.
    pub async fn next(&mut self, silent: bool) -> Result<Lyrics, LyricsError> {
        match self.advance(silent).await? {
            Some(lyrics) => Ok(lyrics),
            None => Err(LyricsError::no_lyrics(
                &self.query,
                "SearchResult.next",
                Some(anyhow::anyhow!("no lyrics found for query")),
            )),
        }
    }

    /// One iteration step: like `next(true)` but exhaustion is `Ok(None)`.
    pub async fn try_next(&mut self) -> Result<Option<Lyrics>, LyricsError> {
        self.advance(true).await
    }

    /// Consume the cursor as a stream of lyrics that ends when the candidates run out.
    pub fn into_stream(self) -> impl Stream<Item = Result<Lyrics, LyricsError>> + 'a {
        stream::unfold(self, |mut cursor| async move {
            match cursor.advance(true).await {
                Ok(Some(lyrics)) => Some((Ok(lyrics), cursor)),
                Ok(None) => None,
                Err(err) => Some((Err(err), cursor)),
            }
        })
    }

    /// Resolve up to `max_results` candidates concurrently.
    ///
    /// URLs are drawn eagerly, then every attempt runs at once on the
    /// current task. Attempts still pending when `timeout` elapses are
    /// dropped. Returns the successes in completion order; failures are
    /// left out.
    pub async fn to_list(&mut self, max_results: usize, timeout: Duration) -> Vec<Lyrics> {
        let deadline = Instant::now() + timeout;

        let mut urls = Vec::with_capacity(max_results);
        let drawing = async {
            while urls.len() < max_results {
                match self.next_url().await {
                    Ok(Some(url)) => urls.push(url),
                    Ok(None) => break,
                    Err(err) => {
                        warn!(query = %self.query, error = %err, "stopped drawing candidates");
                        break;
                    }
                }
            }
        };
        if tokio::time::timeout_at(deadline, drawing).await.is_err() {
            debug!(query = %self.query, drawn = urls.len(), "timed out drawing candidates");
        }

        let mut pending: FuturesUnordered<_> = urls.iter().map(|url| self.resolve(url)).collect();
        let mut results = Vec::new();
        let collecting = async {
            while let Some(outcome) = pending.next().await {
                match outcome {
                    Ok(lyrics) => results.push(lyrics),
                    Err(err) => debug!(error = %err, "candidate failed"),
                }
            }
        };
        if tokio::time::timeout_at(deadline, collecting).await.is_err() {
            debug!(
                query = %self.query,
                resolved = results.len(),
                dropped = pending.len(),
                "to_list timed out"
            );
        }
        results
    }

    async fn advance(&mut self, silent: bool) -> Result<Option<Lyrics>, LyricsError> {
        while let Some(url) = self.next_url().await? {
            match self.resolve(&url).await {
                Ok(lyrics) => return Ok(Some(lyrics)),
                Err(err) if silent && err.is_no_extractor() => {
                    debug!(url = %url, error = %err, "skipping candidate");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }

    async fn resolve(&self, url: &str) -> Result<Lyrics, LyricsError> {
        let mut lyrics = self
            .manager
            .dispatch(&self.client, url, self.song.as_deref(), self.artist.as_deref())
            .await?;
        lyrics.origin.query = Some(self.query.clone());
        Ok(lyrics)
    }
}

impl std::fmt::Debug for SearchResult<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchResult")
            .field("query", &self.query)
            .field("song", &self.song)
            .field("artist", &self.artist)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;

    use crate::extractors::{Extractor, ExtractorRegistry};
    use crate::lyrics::LyricsDraft;
    use crate::resource::Request;
    use crate::search::fixed_urls;

    /// Answers from the URL alone: `/ok/<title>`, `/slow/<title>`, `/none/..`.
    struct PathExtractor {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait(?Send)]
    impl Extractor for PathExtractor {
        fn name(&self) -> &str {
            "Path"
        }

        fn url(&self) -> &str {
            "https://path.test"
        }

        fn pattern(&self) -> &str {
            "path.test"
        }

        async fn extract_lyrics(&self, request: &mut Request) -> Result<LyricsDraft, LyricsError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let url = request.url().to_string();
            let title = url.rsplit('/').next().unwrap_or_default().to_string();
            if url.contains("/slow/") {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if url.contains("/none/") {
                return Err(LyricsError::no_lyrics(&url, "Path", None));
            }
            Ok(LyricsDraft::new(title, "words"))
        }
    }

    fn manager() -> (LyricsManager, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ExtractorRegistry::new();
        registry.register(
            "path",
            PathExtractor {
                calls: calls.clone(),
            },
        );
        (LyricsManager::builder().registry(registry).build(), calls)
    }

    fn cursor<'a>(manager: &'a LyricsManager, urls: &[&str]) -> SearchResult<'a> {
        let urls = urls.iter().map(|u| u.to_string()).collect();
        SearchResult::new(manager, reqwest::Client::new(), "q", fixed_urls(urls))
    }

    #[tokio::test]
    async fn empty_cursor_next_is_no_lyrics() {
        let (manager, _) = manager();
        let mut result = cursor(&manager, &[]);
        let err = result.next(true).await.unwrap_err();
        assert!(err.is_no_lyrics());
        assert_eq!(err.op, "SearchResult.next");
        assert_eq!(err.url, "q");
    }

    #[tokio::test]
    async fn empty_cursor_to_list_is_empty() {
        let (manager, _) = manager();
        let mut result = cursor(&manager, &[]);
        assert!(result.to_list(5, Duration::from_secs(1)).await.is_empty());
    }

    #[tokio::test]
    async fn silent_next_skips_unhandled_urls() {
        let (manager, _) = manager();
        let mut result = cursor(
            &manager,
            &["https://other.test/x", "https://path.test/none/y", "https://path.test/ok/Song"],
        );
        let lyrics = result.next(true).await.expect("lyrics");
        assert_eq!(lyrics.title, "Song");
        assert_eq!(lyrics.origin.query.as_deref(), Some("q"));
        assert_eq!(lyrics.origin.source_name, "Path");
    }

    #[tokio::test]
    async fn loud_next_surfaces_unhandled_urls() {
        let (manager, _) = manager();
        let mut result = cursor(&manager, &["https://other.test/x", "https://path.test/ok/Song"]);
        let err = result.next(false).await.unwrap_err();
        assert!(err.is_no_extractor());
        // The cursor moved past the failed URL.
        assert_eq!(result.next(false).await.expect("lyrics").title, "Song");
    }

    #[tokio::test]
    async fn stream_ends_cleanly() {
        let (manager, _) = manager();
        let result = cursor(
            &manager,
            &["https://path.test/ok/A", "https://other.test/x", "https://path.test/ok/B"],
        );
        let titles: Vec<String> = result
            .into_stream()
            .map_ok(|l| l.title)
            .try_collect()
            .await
            .expect("stream");
        assert_eq!(titles, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn to_list_caps_results() {
        let (manager, calls) = manager();
        let mut result = cursor(
            &manager,
            &[
                "https://path.test/ok/A",
                "https://path.test/ok/B",
                "https://path.test/ok/C",
                "https://path.test/ok/D",
            ],
        );
        let items = result.to_list(2, Duration::from_secs(5)).await;
        assert_eq!(items.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // Undrawn candidates stay on the cursor.
        assert_eq!(
            result.next_url().await.unwrap().as_deref(),
            Some("https://path.test/ok/C")
        );
    }

    #[tokio::test]
    async fn to_list_drops_failures_and_late_results() {
        let (manager, _) = manager();
        let mut result = cursor(
            &manager,
            &[
                "https://path.test/slow/Late",
                "https://path.test/none/Missing",
                "https://path.test/ok/Fast",
            ],
        );
        let items = result.to_list(10, Duration::from_millis(200)).await;
        let titles: Vec<&str> = items.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["Fast"]);
    }
}
