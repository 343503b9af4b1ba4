// ABOUTME: Per-attempt fetch request with lazily computed, memoized response, text and document views.
// ABOUTME: Changing the URL drops every cached view; headers and song/artist context stay on the instance.

use scraper::Html;
use tracing::debug;

use crate::error::LyricsError;
use crate::resource::{fetch, FetchOptions, FetchResult};

/// A single page fetch shared by the extractors tried against one URL.
///
/// Building a request performs no I/O. The response is fetched the first
/// time any view is read; text and document are derived from it and cached
/// until the URL changes.
pub struct Request {
    url: String,
    song: Option<String>,
    artist: Option<String>,
    options: FetchOptions,
    client: reqwest::Client,
    response: Option<FetchResult>,
    text: Option<String>,
    document: Option<Html>,
}

impl Request {
    /// Create a request for `url` that will fetch through `client`.
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            song: None,
            artist: None,
            options: FetchOptions::default(),
            client,
            response: None,
            text: None,
            document: None,
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_song(mut self, song: Option<&str>) -> Self {
        self.song = song.map(str::to_string);
        self
    }

    pub fn with_artist(mut self, artist: Option<&str>) -> Self {
        self.artist = artist.map(str::to_string);
        self
    }

    /// Seed the text view with an already downloaded page.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self.document = None;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Point the request at a new URL, dropping every cached view.
    ///
    /// Setting the URL it already has keeps the caches.
    pub fn set_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if url == self.url {
            return;
        }
        debug!(from = %self.url, to = %url, "request url changed, dropping cached views");
        self.url = url;
        self.response = None;
        self.text = None;
        self.document = None;
    }

    pub fn song(&self) -> Option<&str> {
        self.song.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    /// Set a header sent on the next network fetch of this request.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.headers.insert(key.into(), value.into());
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.options.headers.get(key).map(String::as_str)
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// True once the response view has been fetched for the current URL.
    pub fn is_fetched(&self) -> bool {
        self.response.is_some()
    }

    /// The HTTP response, fetched on first access.
    pub async fn response(&mut self) -> Result<&FetchResult, LyricsError> {
        let response = match self.response.take() {
            Some(response) => response,
            None => {
                debug!(url = %self.url, "fetching");
                fetch(&self.client, &self.url, &self.options).await?
            }
        };
        Ok(self.response.insert(response))
    }

    /// The decoded body text, derived from the response on first access.
    pub async fn text(&mut self) -> Result<&str, LyricsError> {
        let text = match self.text.take() {
            Some(text) => text,
            None => self.response().await?.text_utf8(),
        };
        Ok(self.text.insert(text).as_str())
    }

    /// The parsed HTML document, derived from the text on first access.
    pub async fn document(&mut self) -> Result<&Html, LyricsError> {
        let document = match self.document.take() {
            Some(document) => document,
            None => Html::parse_document(self.text().await?),
        };
        Ok(self.document.insert(document))
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url)
            .field("song", &self.song)
            .field("artist", &self.artist)
            .field("headers", &self.options.headers)
            .field("fetched", &self.response.is_some())
            .finish()
    }
}
