// ABOUTME: Pre-compiled CSS selector cache for O(1) selector lookup.
// ABOUTME: Eliminates repeated parsing of extractor selectors across extraction attempts.

//! Selector caching for efficient repeated DOM queries.
//!
//! Extractors run the same handful of selectors against every page they
//! see. This cache compiles each selector once and reuses it.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use scraper::Selector;

/// Thread-safe cache of compiled CSS selectors. Invalid selectors are cached as `None`.
static SELECTOR_CACHE: Lazy<RwLock<HashMap<String, Option<Selector>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Gets or compiles a CSS selector, caching the result.
///
/// Returns `Some(Selector)` if the selector is valid, `None` if invalid.
pub fn get_or_compile(css: &str) -> Option<Selector> {
    if let Ok(cache) = SELECTOR_CACHE.read() {
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
    }

    let compiled = Selector::parse(css).ok();
    if let Ok(mut cache) = SELECTOR_CACHE.write() {
        // Another thread may have inserted while we compiled
        if let Some(cached) = cache.get(css) {
            return cached.clone();
        }
        cache.insert(css.to_string(), compiled.clone());
    }
    compiled
}
