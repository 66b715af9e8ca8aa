//! Plain-text rendering of query results.
//!
//! Every function returns a newline-terminated string and never prints;
//! the CLI decides where the text goes.

use std::collections::BTreeSet;

use discograph_core::model::format_clock;
use discograph_core::{Album, TrackEntry};

use crate::validate::ValidationReport;

const NO_ALBUMS: &str = "No albums found.\n";

/// One line per album with its artists.
pub fn render_albums(albums: &[&Album]) -> String {
    if albums.is_empty() {
        return NO_ALBUMS.to_string();
    }
    albums
        .iter()
        .map(|album| format!("- {} (Artists: {})\n", album.title, album.artists.join(", ")))
        .collect()
}

/// One line per album, title only.
pub fn render_titles(albums: &[&Album]) -> String {
    if albums.is_empty() {
        return NO_ALBUMS.to_string();
    }
    albums
        .iter()
        .map(|album| format!("- {}\n", album.title))
        .collect()
}

pub fn render_genres(genres: &BTreeSet<String>) -> String {
    if genres.is_empty() {
        return String::from("No genres found, or the artist is not in the catalog.\n");
    }
    let joined: Vec<&str> = genres.iter().map(String::as_str).collect();
    format!("Genres: {}\n", joined.join(", "))
}

/// A numbered playlist with `MM:SS` durations.
pub fn render_playlist(tracks: &[TrackEntry]) -> String {
    if tracks.is_empty() {
        return String::from("No compositions found.\n");
    }
    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            format!(
                "{}. {} ({}) - {} (Album: {})\n",
                i + 1,
                track.name,
                format_clock(track.duration_secs),
                track.artists.join(", "),
                track.album_title
            )
        })
        .collect()
}

pub fn render_validation(report: &ValidationReport) -> String {
    let verdict = if report.valid { "is valid" } else { "is NOT valid" };
    let header = format!(
        "{} {verdict} against {} '{}'{}\n",
        report.document.display(),
        report.validator,
        report.schema.display(),
        if report.valid { "." } else { ":" }
    );
    std::iter::once(header)
        .chain(report.issues.iter().map(|issue| format!("  - {issue}\n")))
        .collect()
}
