//! Canned queries over a loaded [`Catalog`].
//!
//! Every query borrows from the catalog, preserves its iteration order and
//! returns an empty result rather than an error when nothing matches.

use std::collections::BTreeSet;

use crate::model::{Album, Catalog};

/// Albums tagged with `genre` (exact, case-sensitive).
pub fn albums_by_genre<'a>(catalog: &'a Catalog, genre: &str) -> Vec<&'a Album> {
    albums_matching(catalog, |album| album.has_genre(genre))
}

/// Every genre of every album that lists `artist` among its artists.
///
/// The result is sorted, so it does not depend on catalog order.
pub fn genres_by_artist(catalog: &Catalog, artist: &str) -> BTreeSet<String> {
    catalog
        .iter()
        .filter(|album| album.has_artist(artist))
        .flat_map(|album| album.genres.iter().cloned())
        .collect()
}

/// Albums with at least one composition strictly longer than
/// `threshold_secs`.
pub fn albums_with_long_tracks(catalog: &Catalog, threshold_secs: u32) -> Vec<&Album> {
    albums_matching(catalog, |album| {
        album
            .compositions
            .iter()
            .any(|comp| comp.duration_secs > threshold_secs)
    })
}

/// Albums accepted by an arbitrary predicate.
pub fn albums_matching<P>(catalog: &Catalog, predicate: P) -> Vec<&Album>
where
    P: Fn(&Album) -> bool,
{
    catalog.iter().filter(|&album| predicate(album)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Album::new("A Night at the Opera")
                .with_artist("Queen")
                .with_genre("Progressive Rock")
                .with_genre("Hard Rock")
                .with_composition("Bohemian Rhapsody", 355)
                .with_composition("Love of My Life", 219)
                .with_composition("The Prophet's Song", 501),
            Album::new("The Dark Side of the Moon")
                .with_artist("Pink Floyd")
                .with_genre("Progressive Rock")
                .with_composition("Time", 413)
                .with_composition("Money", 382),
            Album::new("Hot Space")
                .with_artist("Queen")
                .with_artist("David Bowie")
                .with_genre("Funk Rock")
                .with_composition("Under Pressure", 248),
            Album::new("Silence"),
        ])
    }

    fn titles(albums: &[&Album]) -> Vec<String> {
        albums.iter().map(|a| a.title.clone()).collect()
    }

    #[test]
    fn test_albums_by_genre_preserves_order() {
        let catalog = catalog();
        let result = albums_by_genre(&catalog, "Progressive Rock");
        assert_eq!(
            titles(&result),
            vec!["A Night at the Opera", "The Dark Side of the Moon"]
        );
    }

    #[test]
    fn test_albums_by_genre_is_sound_and_complete() {
        let catalog = catalog();
        for genre in ["Progressive Rock", "Hard Rock", "Funk Rock", "Jazz", "progressive rock"] {
            let result = albums_by_genre(&catalog, genre);
            for album in catalog.iter() {
                let included = result.iter().any(|a| std::ptr::eq(*a, album));
                assert_eq!(included, album.has_genre(genre), "{genre} / {}", album.title);
            }
        }
    }

    #[test]
    fn test_genres_by_artist() {
        let catalog = catalog();
        let genres = genres_by_artist(&catalog, "Queen");
        let expected: BTreeSet<String> = ["Funk Rock", "Hard Rock", "Progressive Rock"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(genres, expected);
        assert!(genres_by_artist(&catalog, "Nobody").is_empty());
    }

    #[test]
    fn test_genres_by_artist_ignores_catalog_order() {
        let catalog = catalog();
        let reversed: Catalog = catalog.iter().rev().cloned().collect();
        let first = genres_by_artist(&catalog, "Queen");
        assert_eq!(first, genres_by_artist(&reversed, "Queen"));
        assert_eq!(first, genres_by_artist(&catalog, "Queen"));
    }

    #[test]
    fn test_albums_with_long_tracks_is_strict() {
        let catalog = catalog();
        let result = albums_with_long_tracks(&catalog, 413);
        assert_eq!(titles(&result), vec!["A Night at the Opera"]);

        let result = albums_with_long_tracks(&catalog, 300);
        assert_eq!(
            titles(&result),
            vec!["A Night at the Opera", "The Dark Side of the Moon"]
        );
    }

    #[test]
    fn test_albums_with_long_tracks_never_includes_short_albums() {
        let catalog = catalog();
        for threshold in [0, 200, 248, 300, 382, 500, 600] {
            for album in albums_with_long_tracks(&catalog, threshold) {
                assert!(album.compositions.iter().any(|c| c.duration_secs > threshold));
            }
        }
    }

    #[test]
    fn test_each_album_appears_once() {
        let catalog = catalog();
        // Every composition of the Queen album exceeds the threshold.
        let result = albums_with_long_tracks(&catalog, 100);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_albums_matching_with_closure() {
        let catalog = catalog();
        let result = albums_matching(&catalog, |a| a.track_count() == 3 && a.title.contains("The"));
        assert!(result.is_empty());

        let result = albums_matching(&catalog, |a| a.compositions.is_empty());
        assert_eq!(titles(&result), vec!["Silence"]);
    }

    #[test]
    fn test_concrete_scenario() {
        let catalog = Catalog::new(vec![Album::new("A Night at the Opera")
            .with_artist("Queen")
            .with_genre("Progressive Rock")
            .with_composition("X", 367)]);

        assert_eq!(albums_by_genre(&catalog, "Progressive Rock").len(), 1);
        assert_eq!(albums_with_long_tracks(&catalog, 300).len(), 1);
        assert!(albums_with_long_tracks(&catalog, 400).is_empty());
    }
}
