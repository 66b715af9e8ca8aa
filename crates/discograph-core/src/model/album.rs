use serde::{Deserialize, Serialize};

use crate::model::duration::deserialize_seconds;

/// Name given to a composition whose source record has none.
pub const UNTITLED: &str = "N/A";

fn untitled() -> String {
    UNTITLED.to_string()
}

/// A single track on an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    #[serde(default = "untitled")]
    pub name: String,

    /// Length in whole seconds.
    #[serde(
        rename = "duration_seconds",
        alias = "duration",
        default,
        deserialize_with = "deserialize_seconds"
    )]
    pub duration_secs: u32,
}

impl Composition {
    #[must_use]
    pub fn new(name: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            name: name.into(),
            duration_secs,
        }
    }
}

/// An album record.
///
/// `genres` is treated as a set: only membership is ever asked of it.
/// The title is guaranteed non-empty for any album that came through a
/// loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub title: String,

    #[serde(default)]
    pub artists: Vec<String>,

    #[serde(default)]
    pub genres: Vec<String>,

    #[serde(default)]
    pub compositions: Vec<Composition>,
}

impl Album {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artists: Vec::new(),
            genres: Vec::new(),
            compositions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artists.push(artist.into());
        self
    }

    #[must_use]
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genres.push(genre.into());
        self
    }

    #[must_use]
    pub fn with_composition(mut self, name: impl Into<String>, duration_secs: u32) -> Self {
        self.compositions.push(Composition::new(name, duration_secs));
        self
    }

    /// Exact, case-sensitive genre membership.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// Exact, case-sensitive artist membership.
    pub fn has_artist(&self, artist: &str) -> bool {
        self.artists.iter().any(|a| a == artist)
    }

    pub fn track_count(&self) -> usize {
        self.compositions.len()
    }

    /// Length of the longest composition, or 0 for an empty album.
    pub fn longest_secs(&self) -> u32 {
        self.compositions
            .iter()
            .map(|c| c.duration_secs)
            .max()
            .unwrap_or(0)
    }

    pub fn total_secs(&self) -> u64 {
        self.compositions
            .iter()
            .map(|c| u64::from(c.duration_secs))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opera() -> Album {
        Album::new("A Night at the Opera")
            .with_artist("Queen")
            .with_genre("Progressive Rock")
            .with_genre("Hard Rock")
            .with_composition("Bohemian Rhapsody", 355)
            .with_composition("Love of My Life", 219)
    }

    #[test]
    fn test_album_builder() {
        let album = opera();
        assert_eq!(album.title, "A Night at the Opera");
        assert_eq!(album.artists, vec!["Queen".to_string()]);
        assert_eq!(album.track_count(), 2);
    }

    #[test]
    fn test_membership_is_case_sensitive() {
        let album = opera();
        assert!(album.has_genre("Hard Rock"));
        assert!(!album.has_genre("hard rock"));
        assert!(album.has_artist("Queen"));
        assert!(!album.has_artist("Que"));
    }

    #[test]
    fn test_durations() {
        let album = opera();
        assert_eq!(album.longest_secs(), 355);
        assert_eq!(album.total_secs(), 574);
        assert_eq!(Album::new("Silence").longest_secs(), 0);
    }

    #[test]
    fn test_composition_defaults_from_json() {
        let comp: Composition = serde_json::from_str("{}").unwrap();
        assert_eq!(comp.name, UNTITLED);
        assert_eq!(comp.duration_secs, 0);
    }

    #[test]
    fn test_composition_duration_forms() {
        let seconds: Composition =
            serde_json::from_str(r#"{"name": "Time", "duration_seconds": 413}"#).unwrap();
        let clock: Composition =
            serde_json::from_str(r#"{"name": "Time", "duration": "06:53"}"#).unwrap();
        assert_eq!(seconds.duration_secs, 413);
        assert_eq!(clock.duration_secs, 413);
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let result: Result<Composition, _> =
            serde_json::from_str(r#"{"name": "Time", "duration_seconds": -1}"#);
        assert!(result.is_err());
    }
}
