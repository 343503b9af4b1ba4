// ABOUTME: Builds candidate lyrics URLs for an (artist, album, song) triple from each site's URL scheme.
// ABOUTME: Pure string templating with per-site normalization; no network access.

//! Deterministic candidate URLs.
//!
//! Every supported site names its pages after the artist and song in a
//! predictable way. These helpers reproduce those names so a search can
//! try the likely pages before (or without) asking a search engine.

use once_cell::sync::Lazy;
use regex::Regex;

static FEATURING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[\(\[](feat\.?|ft\.?|featuring|with)\s[^\)\]]*[\)\]]").unwrap()
});
static NON_ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Words LyricWiki leaves lower-case inside titles, unless they come first.
const WIKI_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "into", "nor", "of", "on",
    "or", "the", "to", "with",
];

/// One templated URL per supported site, in registry order.
///
/// The album is only used by sites that publish per-album pages. An empty
/// artist or song yields no candidates.
pub fn candidate_urls(artist: &str, album: Option<&str>, song: &str) -> Vec<String> {
    if artist.trim().is_empty() || song.trim().is_empty() {
        return Vec::new();
    }

    let mut urls = vec![
        genius_url(artist, song),
        azlyrics_url(artist, song),
        lyrics_wikia_url(artist, song),
        musixmatch_url(artist, song),
    ];
    if let Some(album) = album.filter(|a| !a.trim().is_empty()) {
        urls.push(darklyrics_url(artist, album));
    }
    urls
}

/// `https://genius.com/Artist-song-title-lyrics`: hyphen separated, first letter upper-cased.
pub fn genius_url(artist: &str, song: &str) -> String {
    let slug = format!("{} {}", hyphenate(artist), hyphenate(song));
    let slug = hyphenate(&slug);
    format!("https://genius.com/{}-lyrics", capitalize_first(&slug))
}

/// `https://www.azlyrics.com/lyrics/artist/song.html`: letters and digits only,
/// with a leading "the" dropped from the artist.
pub fn azlyrics_url(artist: &str, song: &str) -> String {
    let lowered = artist.trim().to_lowercase();
    let artist = lowered.strip_prefix("the ").unwrap_or(&lowered);
    format!(
        "https://www.azlyrics.com/lyrics/{}/{}.html",
        compact(artist),
        compact(song)
    )
}

/// `https://lyrics.fandom.com/wiki/Artist:Song_Title`: wiki title case, underscores.
pub fn lyrics_wikia_url(artist: &str, song: &str) -> String {
    format!(
        "https://lyrics.fandom.com/wiki/{}:{}",
        wiki_title(artist),
        wiki_title(song)
    )
}

/// `https://www.musixmatch.com/lyrics/Artist/Song-Title`.
pub fn musixmatch_url(artist: &str, song: &str) -> String {
    let part = |s: &str| {
        strip_featuring(s)
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    };
    format!("https://www.musixmatch.com/lyrics/{}/{}", part(artist), part(song))
}

/// `http://www.darklyrics.com/lyrics/artist/album.html`.
pub fn darklyrics_url(artist: &str, album: &str) -> String {
    format!(
        "http://www.darklyrics.com/lyrics/{}/{}.html",
        compact(artist),
        compact(album)
    )
}

fn strip_featuring(s: &str) -> String {
    FEATURING_RE.replace_all(s, "").trim().to_string()
}

/// Lower-case, every non-alphanumeric run becomes one hyphen.
fn hyphenate(s: &str) -> String {
    let lowered = strip_featuring(s).to_lowercase().replace(" & ", " and ");
    NON_ALNUM_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Lower-case letters and digits only.
fn compact(s: &str) -> String {
    strip_featuring(s)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn wiki_title(s: &str) -> String {
    strip_featuring(s)
        .split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && WIKI_STOP_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize_first(word)
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}
