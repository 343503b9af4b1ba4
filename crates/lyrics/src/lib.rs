// ABOUTME: Main library entry point for the lyrics extraction engine.
// ABOUTME: Re-exports the public API: LyricsManager, SearchResult, Lyrics, LyricsError, Extractor and the registry.

//! Lyrics extraction from lyrics websites.
//!
//! A [`LyricsManager`] hands a page URL to the first registered
//! [`Extractor`] that recognizes the site, falling back to the next one
//! when a page has no lyrics. Searches combine templated candidate URLs
//! with paginated web search results and resolve them lazily through a
//! [`SearchResult`] cursor.
//!
//! # Example
//!
//! ```no_run
//! use digests_lyrics::{LyricsError, LyricsManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LyricsError> {
//!     let manager = LyricsManager::builder().build();
//!     let lyrics = manager
//!         .extract_lyrics("https://genius.com/Queen-bohemian-rhapsody-lyrics", None, None)
//!         .await?;
//!     println!("{}\n\n{}", lyrics.title, lyrics.lyrics);
//!     Ok(())
//! }
//! ```

pub mod candidates;
pub mod error;
pub mod extractors;
pub mod formats;
pub mod lyrics;
pub mod manager;
pub mod options;
pub mod resource;
pub mod search;

pub use crate::candidates::candidate_urls;
pub use crate::error::{ErrorCode, LyricsError};
pub use crate::extractors::{builtin_registry, Extractor, ExtractorRegistry};
pub use crate::lyrics::{Lyrics, LyricsDraft, LyricsOrigin};
pub use crate::manager::LyricsManager;
pub use crate::options::{ManagerBuilder, Options, SearchOptions};
pub use crate::resource::Request;
pub use crate::search::SearchResult;
