// ABOUTME: LyricsManager dispatches a URL to the first registered extractor that can handle it and succeeds.
// ABOUTME: Also builds search cursors that combine templated candidate URLs with paginated web search results.

use std::net::ToSocketAddrs;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::candidates::candidate_urls;
use crate::error::LyricsError;
use crate::extractors::{builtin_registry, ExtractorRegistry};
use crate::lyrics::{Lyrics, LyricsOrigin};
use crate::options::{ManagerBuilder, Options};
use crate::resource::{is_private_ip, FetchOptions, Request};
use crate::search::{build_query, fixed_urls, SearchResult, UrlStream, WebSearch};

/// Entry point for lyrics extraction and search.
#[derive(Debug, Clone)]
pub struct LyricsManager {
    opts: Options,
    registry: ExtractorRegistry,
}

impl LyricsManager {
    /// Create a new ManagerBuilder for configuring a LyricsManager.
    pub fn builder() -> ManagerBuilder {
        ManagerBuilder::new()
    }

    /// Create a new LyricsManager with the given options.
    ///
    /// Without a registry in `opts` the builtin extractors are used.
    pub fn new(opts: Options) -> Self {
        let registry = opts.registry.clone().unwrap_or_else(builtin_registry);
        Self { opts, registry }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Extract lyrics from a single page.
    ///
    /// Extractors are tried in registration order. The first applicable one
    /// that succeeds produces the result; misses and unexpected failures fall
    /// through to the next. When none succeeds the error is `NoExtractor`,
    /// chained to the last unexpected failure.
    pub async fn extract_lyrics(
        &self,
        url: &str,
        song: Option<&str>,
        artist: Option<&str>,
    ) -> Result<Lyrics, LyricsError> {
        self.extract_lyrics_with(url, song, artist, None).await
    }

    /// Like [`extract_lyrics`](Self::extract_lyrics), fetching through `session` when given.
    pub async fn extract_lyrics_with(
        &self,
        url: &str,
        song: Option<&str>,
        artist: Option<&str>,
        session: Option<&reqwest::Client>,
    ) -> Result<Lyrics, LyricsError> {
        let client = self.session(session)?;
        self.dispatch(&client, url, song, artist).await
    }

    /// Start a lazy search for a song.
    ///
    /// Candidate URLs come from the site templates (unless `guess_urls` is
    /// off) followed by web search results when an API key is given. No
    /// network I/O happens until the returned cursor is pulled. An API key
    /// without a configured search engine id is a `Search` error.
    pub fn search_lyrics(
        &self,
        song: &str,
        album: Option<&str>,
        artist: &str,
        api_key: &str,
    ) -> Result<SearchResult<'_>, LyricsError> {
        self.search_lyrics_with(song, album, artist, api_key, None)
    }

    /// Like [`search_lyrics`](Self::search_lyrics), fetching through `session` when given.
    pub fn search_lyrics_with(
        &self,
        song: &str,
        album: Option<&str>,
        artist: &str,
        api_key: &str,
        session: Option<&reqwest::Client>,
    ) -> Result<SearchResult<'_>, LyricsError> {
        let client = self.session(session)?;
        let query = build_query(artist, song);

        let mut sources: Vec<UrlStream<'static>> = Vec::new();
        if self.opts.guess_urls {
            sources.push(fixed_urls(candidate_urls(artist, album, song)));
        }
        if api_key.is_empty() {
            debug!(query = %query, "no search API key, using templated URLs only");
        } else if self.opts.search.engine_id.trim().is_empty() {
            return Err(LyricsError::search(
                &query,
                "LyricsManager.search_lyrics",
                Some(anyhow::anyhow!("search engine id is not configured")),
            ));
        } else {
            let search = WebSearch {
                query: query.clone(),
                api_key: api_key.to_string(),
                options: self.opts.search.clone(),
                fetch: FetchOptions {
                    allow_private_networks: self.opts.allow_private_networks,
                    ..Default::default()
                },
            };
            sources.push(search.into_stream(client.clone()));
        }

        let urls = stream::iter(sources).flatten().boxed_local();
        Ok(SearchResult::new(self, client, query, urls)
            .with_song(Some(song))
            .with_artist(Some(artist)))
    }

    /// Run the extractor fallback loop for one URL.
    pub(crate) async fn dispatch(
        &self,
        client: &reqwest::Client,
        url: &str,
        song: Option<&str>,
        artist: Option<&str>,
    ) -> Result<Lyrics, LyricsError> {
        let mut request = Request::new(client.clone(), url)
            .with_options(self.fetch_options())
            .with_song(song)
            .with_artist(artist);

        let mut last_cause: Option<LyricsError> = None;
        let mut suppressed = Vec::new();

        for extractor in self.registry.iter() {
            if !extractor.can_handle(&request) {
                continue;
            }
            match extractor.extract_lyrics(&mut request).await {
                Ok(draft) => {
                    info!(extractor = extractor.name(), url = %request.url(), "extracted lyrics");
                    return Ok(draft.with_origin(LyricsOrigin {
                        query: None,
                        url: request.url().to_string(),
                        source_name: extractor.name().to_string(),
                        source_url: extractor.url().to_string(),
                    }));
                }
                Err(err) if err.is_expected_miss() => {
                    debug!(extractor = extractor.name(), url, error = %err, "extractor missed");
                    suppressed.push(err);
                }
                Err(err) => {
                    warn!(extractor = extractor.name(), url, error = %err, "extractor failed");
                    if let Some(previous) = last_cause.replace(err) {
                        suppressed.push(previous);
                    }
                }
            }
        }

        Err(LyricsError::no_extractor(
            url,
            "LyricsManager.extract_lyrics",
            last_cause.map(anyhow::Error::new),
            suppressed,
        ))
    }

    /// The session for one top-level call: the caller's, the configured one, or a new one.
    pub(crate) fn session(
        &self,
        session: Option<&reqwest::Client>,
    ) -> Result<reqwest::Client, LyricsError> {
        if let Some(client) = session.or(self.opts.http_client.as_ref()) {
            return Ok(client.clone());
        }
        self.build_client()
    }

    fn build_client(&self) -> Result<reqwest::Client, LyricsError> {
        let allow_private = self.opts.allow_private_networks;
        let redirect_policy = if self.opts.follow_redirects {
            reqwest::redirect::Policy::custom(move |attempt| {
                if allow_private {
                    return attempt.follow();
                }
                let next = attempt.url().clone();
                let Some(host) = next.host_str() else {
                    return attempt.follow();
                };
                let port = next.port_or_known_default().unwrap_or(80);
                if let Ok(ip) = host.parse::<std::net::IpAddr>() {
                    if is_private_ip(&ip) {
                        return attempt.error("redirect to private IP blocked");
                    }
                    return attempt.follow();
                }
                // Redirect policies are synchronous, so resolve with the blocking resolver.
                match format!("{}:{}", host, port).to_socket_addrs() {
                    Ok(mut addrs) => {
                        if addrs.any(|sa| is_private_ip(&sa.ip())) {
                            attempt.error("redirect to private IP blocked")
                        } else {
                            attempt.follow()
                        }
                    }
                    Err(_) => attempt.error("DNS lookup failed during redirect"),
                }
            })
        } else {
            reqwest::redirect::Policy::none()
        };

        reqwest::Client::builder()
            .redirect(redirect_policy)
            .user_agent(&self.opts.user_agent)
            .timeout(self.opts.timeout)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| {
                LyricsError::fetch(
                    "",
                    "LyricsManager.session",
                    Some(anyhow::anyhow!("failed to build HTTP client: {}", e)),
                )
            })
    }

    fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
        }
    }
}

impl Default for LyricsManager {
    fn default() -> Self {
        Self::new(Options::default())
    }
}
