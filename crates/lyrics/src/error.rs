// ABOUTME: Error types for lyrics retrieval including the ErrorCode enum and LyricsError struct.
// ABOUTME: Provides categorized errors with convenience constructors, boolean helpers and folded causes.

use std::fmt;

/// Error codes representing different categories of retrieval failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Fetch,
    Timeout,
    Ssrf,
    /// The site actively refused the request (blocked, rate limited).
    NotAllowed,
    /// The page matched an extractor but held no usable lyrics.
    NoLyrics,
    /// No registered extractor both applied to and succeeded on a URL.
    NoExtractor,
    Extract,
    Search,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Fetch => "fetch error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Ssrf => "SSRF blocked",
            ErrorCode::NotAllowed => "not allowed",
            ErrorCode::NoLyrics => "no lyrics",
            ErrorCode::NoExtractor => "no extractor",
            ErrorCode::Extract => "extraction error",
            ErrorCode::Search => "search error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for lyrics operations.
#[derive(Debug, thiserror::Error)]
pub struct LyricsError {
    pub code: ErrorCode,
    pub url: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
    /// Failures folded by a fallback loop, in the order they happened.
    pub suppressed: Vec<LyricsError>,
}

impl fmt::Display for LyricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lyrics: {} {}: {}", self.op, self.url, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl LyricsError {
    fn with_code(
        code: ErrorCode,
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            url: url.into(),
            op: op.into(),
            source,
            suppressed: Vec::new(),
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::InvalidUrl, url, op, source)
    }

    /// Create a Fetch error.
    pub fn fetch(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Fetch, url, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Timeout, url, op, source)
    }

    /// Create an SSRF error.
    pub fn ssrf(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Ssrf, url, op, source)
    }

    /// Create a NotAllowed error.
    pub fn not_allowed(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::NotAllowed, url, op, source)
    }

    /// Create a NoLyrics error.
    pub fn no_lyrics(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::NoLyrics, url, op, source)
    }

    /// Create a NoExtractor error.
    ///
    /// `last_cause` becomes the error source; `suppressed` keeps every
    /// failure the dispatch loop folded on the way.
    pub fn no_extractor(
        url: impl Into<String>,
        op: impl Into<String>,
        last_cause: Option<anyhow::Error>,
        suppressed: Vec<LyricsError>,
    ) -> Self {
        let mut err = Self::with_code(ErrorCode::NoExtractor, url, op, last_cause);
        err.suppressed = suppressed;
        err
    }

    /// Create an Extract error.
    pub fn extract(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Extract, url, op, source)
    }

    /// Create a Search error.
    pub fn search(
        url: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::with_code(ErrorCode::Search, url, op, source)
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an SSRF error.
    pub fn is_ssrf(&self) -> bool {
        self.code == ErrorCode::Ssrf
    }

    /// Returns true if this is a Fetch error.
    pub fn is_fetch(&self) -> bool {
        self.code == ErrorCode::Fetch
    }

    /// Returns true if this is a NotAllowed error.
    pub fn is_not_allowed(&self) -> bool {
        self.code == ErrorCode::NotAllowed
    }

    /// Returns true if this is a NoLyrics error.
    pub fn is_no_lyrics(&self) -> bool {
        self.code == ErrorCode::NoLyrics
    }

    /// Returns true if this is a NoExtractor error.
    pub fn is_no_extractor(&self) -> bool {
        self.code == ErrorCode::NoExtractor
    }

    /// Returns true if this is an Extract error.
    pub fn is_extract(&self) -> bool {
        self.code == ErrorCode::Extract
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }

    /// Returns true if this is a Search error.
    pub fn is_search(&self) -> bool {
        self.code == ErrorCode::Search
    }

    /// Returns true for the per-extractor misses a fallback loop recovers
    /// from without recording a cause.
    pub fn is_expected_miss(&self) -> bool {
        matches!(self.code, ErrorCode::NoLyrics | ErrorCode::NotAllowed)
    }
}
