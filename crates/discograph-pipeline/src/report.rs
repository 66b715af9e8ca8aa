//! The built-in plain-text catalog report, and a reader for it.
//!
//! The report layout is line oriented:
//!
//! ```text
//! Album catalog: 2 albums, 5 compositions
//!
//! Album: A Night at the Opera
//!   Artists: Queen
//!   Genres: Progressive Rock, Hard Rock
//!   Compositions (3):
//!     1. Bohemian Rhapsody [05:55]
//! ```
//!
//! [`parse_catalog_report`] reads back album titles and composition counts,
//! checking each declared count against the listed compositions.
//!
//! Every field is written on one line: backslashes, line feeds and carriage
//! returns are escaped as `\\`, `\n` and `\r`, and titles are unescaped
//! when read back.

use discograph_core::model::format_clock;
use discograph_core::Catalog;

use crate::error::{PipelineError, PipelineResult};

const ALBUM_PREFIX: &str = "Album: ";
const COMPOSITIONS_PREFIX: &str = "  Compositions (";
const TRACK_INDENT: &str = "    ";

/// What a text report says about one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedAlbum {
    pub title: String,
    pub track_count: usize,
}

/// Render the whole catalog as text.
pub fn catalog_report(catalog: &Catalog) -> String {
    let mut lines = vec![
        format!(
            "Album catalog: {} albums, {} compositions",
            catalog.len(),
            catalog.composition_count()
        ),
        String::new(),
    ];

    for album in catalog {
        lines.push(format!("{ALBUM_PREFIX}{}", escape_field(&album.title)));
        lines.push(format!("  Artists: {}", escape_field(&album.artists.join(", "))));
        lines.push(format!("  Genres: {}", escape_field(&album.genres.join(", "))));
        lines.push(format!("{COMPOSITIONS_PREFIX}{}):", album.track_count()));
        for (i, comp) in album.compositions.iter().enumerate() {
            lines.push(format!(
                "{TRACK_INDENT}{}. {} [{}]",
                i + 1,
                escape_field(&comp.name),
                format_clock(comp.duration_secs)
            ));
        }
        lines.push(String::new());
    }

    let mut report = lines.join("\n");
    if !report.ends_with('\n') {
        report.push('\n');
    }
    report
}

/// Read album titles and composition counts back from a text report.
pub fn parse_catalog_report(text: &str) -> PipelineResult<Vec<ReportedAlbum>> {
    struct Pending {
        title: String,
        declared: Option<usize>,
        listed: usize,
        line: usize,
    }

    fn finish(pending: Pending) -> PipelineResult<ReportedAlbum> {
        let declared = pending.declared.ok_or_else(|| PipelineError::Report {
            line: pending.line,
            message: format!("album '{}' has no compositions line", pending.title),
        })?;
        if declared != pending.listed {
            return Err(PipelineError::Report {
                line: pending.line,
                message: format!(
                    "album '{}' declares {declared} compositions but lists {}",
                    pending.title, pending.listed
                ),
            });
        }
        Ok(ReportedAlbum {
            title: pending.title,
            track_count: declared,
        })
    }

    let mut albums = Vec::new();
    let mut current: Option<Pending> = None;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;

        if let Some(title) = line.strip_prefix(ALBUM_PREFIX) {
            if let Some(done) = current.take() {
                albums.push(finish(done)?);
            }
            current = Some(Pending {
                title: unescape_field(title),
                declared: None,
                listed: 0,
                line: line_no,
            });
        } else if let Some(rest) = line.strip_prefix(COMPOSITIONS_PREFIX) {
            let pending = current.as_mut().ok_or_else(|| PipelineError::Report {
                line: line_no,
                message: String::from("compositions line outside an album"),
            })?;
            let count = rest
                .strip_suffix("):")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| PipelineError::Report {
                    line: line_no,
                    message: format!("unreadable compositions count in '{line}'"),
                })?;
            pending.declared = Some(count);
        } else if line.starts_with(TRACK_INDENT) {
            if let Some(pending) = current.as_mut() {
                pending.listed += 1;
            }
        }
    }

    if let Some(done) = current.take() {
        albums.push(finish(done)?);
    }

    Ok(albums)
}

fn escape_field(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape_field(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}
