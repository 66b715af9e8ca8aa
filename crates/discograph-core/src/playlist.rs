//! Random playlists drawn from every composition in a catalog.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Catalog;

/// One composition together with the album it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub name: String,
    pub duration_secs: u32,
    pub album_title: String,
    pub artists: Vec<String>,
}

/// Flatten every composition of every album, in catalog order.
pub fn track_pool(catalog: &Catalog) -> Vec<TrackEntry> {
    catalog
        .iter()
        .flat_map(|album| {
            album.compositions.iter().map(move |comp| TrackEntry {
                name: comp.name.clone(),
                duration_secs: comp.duration_secs,
                album_title: album.title.clone(),
                artists: album.artists.clone(),
            })
        })
        .collect()
}

/// Draw `min(count, pool size)` distinct tracks uniformly at random using
/// the thread-local generator.
pub fn sample(catalog: &Catalog, count: usize) -> Vec<TrackEntry> {
    sample_with(catalog, count, &mut rand::thread_rng())
}

/// Draw `min(count, pool size)` distinct tracks uniformly at random.
///
/// Sampling is without replacement and the result is in random order. An
/// empty pool or a `count` of zero yields an empty playlist.
pub fn sample_with<R>(catalog: &Catalog, count: usize, rng: &mut R) -> Vec<TrackEntry>
where
    R: Rng + ?Sized,
{
    let pool = track_pool(catalog);
    let amount = count.min(pool.len());
    if amount == 0 {
        return Vec::new();
    }

    log::debug!("Sampling {} of {} tracks", amount, pool.len());

    let mut slots: Vec<Option<TrackEntry>> = pool.into_iter().map(Some).collect();
    index::sample(rng, slots.len(), amount)
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Album;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Album::new("A Night at the Opera")
                .with_artist("Queen")
                .with_composition("Bohemian Rhapsody", 355)
                .with_composition("Love of My Life", 219)
                .with_composition("'39", 210),
            Album::new("Empty"),
            Album::new("The Dark Side of the Moon")
                .with_artist("Pink Floyd")
                .with_composition("Time", 413)
                .with_composition("Money", 382),
        ])
    }

    #[test]
    fn test_track_pool_is_flattened_in_order() {
        let pool = track_pool(&catalog());
        let names: Vec<&str> = pool.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Bohemian Rhapsody", "Love of My Life", "'39", "Time", "Money"]
        );
        assert_eq!(pool[3].album_title, "The Dark Side of the Moon");
        assert_eq!(pool[3].artists, vec!["Pink Floyd"]);
    }

    #[test]
    fn test_sample_size_is_capped_and_distinct() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        for count in 0..8 {
            let playlist = sample_with(&catalog, count, &mut rng);
            assert_eq!(playlist.len(), count.min(5));

            let distinct: HashSet<(&str, &str)> = playlist
                .iter()
                .map(|t| (t.album_title.as_str(), t.name.as_str()))
                .collect();
            assert_eq!(distinct.len(), playlist.len());
        }
    }

    #[test]
    fn test_sample_zero_is_empty() {
        assert!(sample(&catalog(), 0).is_empty());
    }

    #[test]
    fn test_sample_of_empty_catalog_is_empty() {
        let catalog = Catalog::new(vec![Album::new("Empty")]);
        assert!(sample(&catalog, 3).is_empty());
    }

    #[test]
    fn test_same_seed_same_playlist() {
        let catalog = catalog();
        let first = sample_with(&catalog, 3, &mut StdRng::seed_from_u64(42));
        let second = sample_with(&catalog, 3, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_track_can_be_drawn() {
        let catalog = catalog();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            for track in sample_with(&catalog, 1, &mut rng) {
                seen.insert(track.name);
            }
        }
        assert_eq!(seen.len(), 5);
    }
}
