// ABOUTME: Extractor trait and the ordered registry used for first-match dispatch.
// ABOUTME: Builtin site extractors are registered once, in a fixed order, into a process-wide registry.

//! Lyrics extraction module.
//!
//! An [`Extractor`] knows one lyrics site: it can tell, without I/O,
//! whether a URL belongs to that site, and it can turn a fetched page into
//! a [`LyricsDraft`]. The [`ExtractorRegistry`] keeps extractors in
//! registration order so dispatch is deterministic.
//!
//! Submodules:
//! - `compiled`: cached CSS selector compilation.
//! - `select`: selector helpers shared by the site extractors.
//! - one module per supported site.

pub mod animelyrics;
pub mod azlyrics;
pub mod compiled;
pub mod darklyrics;
pub mod genius;
pub mod lyrics_wikia;
pub mod musixmatch;
pub mod select;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::error::LyricsError;
use crate::lyrics::LyricsDraft;
use crate::resource::Request;

/// A site-specific lyrics parser.
///
/// Extraction futures are not `Send`: they hold the request's parsed
/// document across awaits and run on the caller's task.
#[async_trait(?Send)]
pub trait Extractor: Send + Sync {
    /// Display name, also recorded as the origin's source name.
    fn name(&self) -> &str;

    /// Canonical site URL, recorded as the origin's source URL.
    fn url(&self) -> &str;

    /// String a request URL must contain for this extractor to apply.
    fn pattern(&self) -> &str;

    /// Cheap applicability check. Must not perform I/O.
    fn can_handle(&self, request: &Request) -> bool {
        request.url().contains(self.pattern())
    }

    /// Turn the page behind `request` into lyrics.
    ///
    /// Fails with `NoLyrics` when the page has no usable lyrics and with
    /// `NotAllowed` when the site refused the request.
    async fn extract_lyrics(&self, request: &mut Request) -> Result<LyricsDraft, LyricsError>;
}

/// Ordered collection of extractors keyed by a stable identifier.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    entries: Vec<(String, Arc<dyn Extractor>)>,
}

impl ExtractorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extractor under `id`.
    ///
    /// Registering an id twice replaces the extractor but keeps its original position.
    pub fn register<E>(&mut self, id: impl Into<String>, extractor: E)
    where
        E: Extractor + 'static,
    {
        self.register_arc(id, Arc::new(extractor));
    }

    /// Registers an already shared extractor under `id`.
    pub fn register_arc(&mut self, id: impl Into<String>, extractor: Arc<dyn Extractor>) {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = extractor,
            None => self.entries.push((id, extractor)),
        }
    }

    /// Looks up an extractor by identifier.
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Extractor>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, extractor)| extractor)
    }

    /// Iterates extractors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Extractor>> {
        self.entries.iter().map(|(_, extractor)| extractor)
    }

    /// Identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Extractors whose `can_handle` accepts the request, in dispatch order.
    pub fn extractors_for<'a>(
        &'a self,
        request: &'a Request,
    ) -> impl Iterator<Item = &'a Arc<dyn Extractor>> + 'a {
        self.iter().filter(move |extractor| extractor.can_handle(request))
    }

    /// Returns the number of registered extractors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no extractors are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

static BUILTIN_REGISTRY: Lazy<ExtractorRegistry> = Lazy::new(|| {
    let mut registry = ExtractorRegistry::new();
    registry.register("genius", genius::Genius);
    registry.register("azlyrics", azlyrics::AzLyrics);
    registry.register("lyrics_wikia", lyrics_wikia::LyricsWikia);
    registry.register("musixmatch", musixmatch::Musixmatch);
    registry.register("darklyrics", darklyrics::DarkLyrics);
    registry.register("animelyrics", animelyrics::Animelyrics);
    registry
});

/// Returns the process-wide registry of builtin extractors.
///
/// The registry is built on first use and never mutated afterwards; the
/// returned value shares its extractors.
pub fn builtin_registry() -> ExtractorRegistry {
    BUILTIN_REGISTRY.clone()
}
