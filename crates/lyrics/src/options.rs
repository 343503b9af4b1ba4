// ABOUTME: Configuration for the lyrics manager: HTTP settings, extractor registry and search API options.
// ABOUTME: ManagerBuilder provides a fluent API for constructing LyricsManager instances.

use std::collections::HashMap;
use std::time::Duration;

use crate::extractors::ExtractorRegistry;
use crate::manager::LyricsManager;

/// Custom Search JSON API endpoint used when none is configured.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Settings for the paginated web search behind `search_lyrics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub endpoint: String,
    /// Search engine id (`cx`) that scopes results to lyrics sites. Supplied by the caller.
    pub engine_id: String,
    pub page_size: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            engine_id: String::new(),
            page_size: 10,
        }
    }
}

/// Configuration options for the lyrics manager.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub allow_private_networks: bool,
    pub follow_redirects: bool,
    pub headers: HashMap<String, String>,
    /// Shared session. When set it is borrowed for every call and never rebuilt.
    pub http_client: Option<reqwest::Client>,
    pub registry: Option<ExtractorRegistry>,
    pub search: SearchOptions,
    /// Try templated site URLs before search results.
    pub guess_urls: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("digests-lyrics/", env!("CARGO_PKG_VERSION")).to_string(),
            allow_private_networks: false,
            follow_redirects: true,
            headers: HashMap::new(),
            http_client: None,
            registry: None,
            search: SearchOptions::default(),
            guess_urls: true,
        }
    }
}

/// Builder for constructing LyricsManager instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ManagerBuilder {
    opts: Options,
}

impl ManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.opts.follow_redirects = follow;
        self
    }

    /// Add a header sent with every page fetch.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Share an existing HTTP client instead of building one per call.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Replace the builtin extractor registry.
    pub fn registry(mut self, registry: ExtractorRegistry) -> Self {
        self.opts.registry = Some(registry);
        self
    }

    pub fn search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.opts.search.endpoint = endpoint.into();
        self
    }

    pub fn search_engine_id(mut self, engine_id: impl Into<String>) -> Self {
        self.opts.search.engine_id = engine_id.into();
        self
    }

    pub fn search_page_size(mut self, page_size: u32) -> Self {
        self.opts.search.page_size = page_size.max(1);
        self
    }

    pub fn guess_urls(mut self, guess: bool) -> Self {
        self.opts.guess_urls = guess;
        self
    }

    pub fn build(self) -> LyricsManager {
        LyricsManager::new(self.opts)
    }
}
