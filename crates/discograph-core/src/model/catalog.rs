use serde::{Deserialize, Serialize};

use crate::model::album::Album;

/// The full, ordered collection of albums for one run.
///
/// A catalog is built once by a loader and only read afterwards. It exposes
/// no mutable access to its albums.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    albums: Vec<Album>,
}

impl Catalog {
    #[must_use]
    pub fn new(albums: Vec<Album>) -> Self {
        Self { albums }
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Album> {
        self.albums.iter()
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// Total number of compositions across every album.
    pub fn composition_count(&self) -> usize {
        self.albums.iter().map(Album::track_count).sum()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Album;
    type IntoIter = std::slice::Iter<'a, Album>;

    fn into_iter(self) -> Self::IntoIter {
        self.albums.iter()
    }
}

impl FromIterator<Album> for Catalog {
    fn from_iter<I: IntoIterator<Item = Album>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_counts() {
        let catalog: Catalog = vec![
            Album::new("One").with_composition("a", 1),
            Album::new("Two")
                .with_composition("b", 2)
                .with_composition("c", 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.composition_count(), 3);
        assert!(!catalog.is_empty());
        assert!(Catalog::default().is_empty());
    }

    #[test]
    fn test_catalog_is_a_bare_json_array() {
        let catalog = Catalog::new(vec![Album::new("One")]);
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.is_array());
    }
}
