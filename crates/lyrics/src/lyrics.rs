// ABOUTME: Lyrics and LyricsOrigin value objects returned by extraction.
// ABOUTME: Includes the flat record (de)serialization with epoch-second release dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Provenance of a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsOrigin {
    pub query: Option<String>,
    pub url: String,
    pub source_name: String,
    pub source_url: String,
}

/// Normalized lyrics as returned to callers.
///
/// The origin is always present; extractors produce a [`LyricsDraft`]
/// and the manager stamps it once an extraction succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    pub title: String,
    pub artist: Option<String>,
    #[serde(default, with = "epoch_seconds")]
    pub release_date: Option<NaiveDate>,
    pub lyrics: String,
    pub origin: LyricsOrigin,
}

/// Lyrics as an extractor produces them, before provenance is known.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LyricsDraft {
    pub title: String,
    pub lyrics: String,
    pub artist: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl LyricsDraft {
    pub fn new(title: impl Into<String>, lyrics: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lyrics: lyrics.into(),
            ..Default::default()
        }
    }

    pub fn artist(mut self, artist: Option<String>) -> Self {
        self.artist = artist.filter(|a| !a.trim().is_empty());
        self
    }

    pub fn release_date(mut self, date: Option<NaiveDate>) -> Self {
        self.release_date = date;
        self
    }

    /// Attach provenance, producing the caller-facing value.
    pub fn with_origin(self, origin: LyricsOrigin) -> Lyrics {
        Lyrics {
            title: self.title,
            artist: self.artist,
            release_date: self.release_date,
            lyrics: self.lyrics,
            origin,
        }
    }
}

impl Lyrics {
    /// Encode as the flat record used by caches and persistence layers.
    pub fn to_value(&self) -> serde_json::Value {
        // Every field serializes infallibly: strings, options and an i64.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Decode from the flat record produced by [`Lyrics::to_value`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Release year, when the source exposed a date.
    pub fn year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }

    pub fn has_artist(&self) -> bool {
        self.artist.as_ref().is_some_and(|a| !a.is_empty())
    }
}

/// Release dates travel as epoch seconds at midnight UTC, `null` or omitted when absent.
mod epoch_seconds {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date.and_then(|d| d.and_hms_opt(0, 0, 0)) {
            Some(dt) => serializer.serialize_i64(dt.and_utc().timestamp()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs: Option<f64> = Option::deserialize(deserializer)?;
        match secs {
            None => Ok(None),
            Some(secs) => DateTime::from_timestamp(secs.floor() as i64, 0)
                .map(|dt| Some(dt.date_naive()))
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", secs))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn origin() -> LyricsOrigin {
        LyricsOrigin {
            query: Some("Queen Bohemian Rhapsody".to_string()),
            url: "https://genius.com/Queen-bohemian-rhapsody-lyrics".to_string(),
            source_name: "Genius".to_string(),
            source_url: "https://genius.com".to_string(),
        }
    }

    fn sample() -> Lyrics {
        LyricsDraft::new("Bohemian Rhapsody", "Is this the real life?\nIs this just fantasy?")
            .artist(Some("Queen".to_string()))
            .release_date(NaiveDate::from_ymd_opt(1975, 10, 31))
            .with_origin(origin())
    }

    #[test]
    fn record_round_trip() {
        let lyrics = sample();
        let decoded = Lyrics::from_value(lyrics.to_value()).expect("decode");
        assert_eq!(decoded, lyrics);
    }

    #[test]
    fn record_round_trip_without_release_date() {
        let mut lyrics = sample();
        lyrics.release_date = None;
        lyrics.artist = None;
        lyrics.origin.query = None;
        let decoded = Lyrics::from_value(lyrics.to_value()).expect("decode");
        assert_eq!(decoded, lyrics);
    }

    #[test]
    fn record_shape() {
        let value = sample().to_value();
        assert_eq!(value["title"], "Bohemian Rhapsody");
        assert_eq!(value["artist"], "Queen");
        assert_eq!(value["release_date"], 183_945_600);
        assert_eq!(value["origin"]["source_name"], "Genius");
        assert_eq!(value["origin"]["source_url"], "https://genius.com");
        assert_eq!(value["origin"]["query"], "Queen Bohemian Rhapsody");
    }

    #[test]
    fn absent_date_encodes_as_null() {
        let mut lyrics = sample();
        lyrics.release_date = None;
        let value = lyrics.to_value();
        assert!(value["release_date"].is_null());
    }

    #[test]
    fn decodes_fractional_timestamp() {
        let json = r#"{
            "title": "Song",
            "artist": null,
            "release_date": 1104537600.0,
            "lyrics": "la la",
            "origin": {"query": null, "url": "u", "source_name": "n", "source_url": "s"}
        }"#;
        let lyrics = Lyrics::from_json(json).expect("decode");
        assert_eq!(lyrics.year(), Some(2005));
        assert!(!lyrics.has_artist());
    }

    #[test]
    fn decodes_record_without_optional_keys() {
        let json = r#"{
            "title": "Song",
            "lyrics": "la",
            "origin": {"url": "u", "source_name": "n", "source_url": "s"}
        }"#;
        let lyrics = Lyrics::from_json(json).expect("decode");
        assert_eq!(lyrics.release_date, None);
        assert_eq!(lyrics.artist, None);
        assert_eq!(lyrics.origin.query, None);
    }

    #[test]
    fn json_round_trip() {
        let lyrics = sample();
        let json = lyrics.to_json().expect("encode");
        assert_eq!(Lyrics::from_json(&json).expect("decode"), lyrics);
    }

    #[test]
    fn draft_drops_blank_artist() {
        let draft = LyricsDraft::new("t", "l").artist(Some("  ".to_string()));
        assert!(draft.artist.is_none());
    }

    #[test]
    fn origin_equality_is_by_value() {
        assert_eq!(origin(), origin());
        let mut other = origin();
        other.query = None;
        assert_ne!(origin(), other);
    }
}
