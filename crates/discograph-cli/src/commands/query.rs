use anyhow::{Context, Result};
use discograph_core::model::parse_clock;
use discograph_core::{query, Filter};
use discograph_pipeline::{render, Config, Variant};

use super::load_catalog;

pub fn query_genre(config: &Config, variant: Variant, genre: Option<String>) -> Result<()> {
    let genre = genre.unwrap_or_else(|| config.queries.genre.clone());
    let catalog = load_catalog(config, variant)?;

    println!("Albums in genre '{genre}':");
    print!("{}", render::render_albums(&query::albums_by_genre(&catalog, &genre)));
    Ok(())
}

pub fn query_artist(config: &Config, variant: Variant, artist: Option<String>) -> Result<()> {
    let artist = artist.unwrap_or_else(|| config.queries.artist.clone());
    let catalog = load_catalog(config, variant)?;

    println!("Genres for '{artist}':");
    print!("{}", render::render_genres(&query::genres_by_artist(&catalog, &artist)));
    Ok(())
}

pub fn query_long_tracks(config: &Config, variant: Variant, threshold: Option<&str>) -> Result<()> {
    let threshold_secs = match threshold {
        Some(text) => parse_clock(text)
            .with_context(|| format!("Invalid threshold '{text}': expected SS, MM:SS or H:MM:SS"))?,
        None => config.queries.long_track_secs,
    };
    let catalog = load_catalog(config, variant)?;

    println!("Albums with a composition longer than {threshold_secs} seconds:");
    print!(
        "{}",
        render::render_titles(&query::albums_with_long_tracks(&catalog, threshold_secs))
    );
    Ok(())
}

pub fn query_filter(config: &Config, variant: Variant, expression: Option<String>) -> Result<()> {
    let expression = expression.unwrap_or_else(|| config.queries.filter.clone());
    let filter = Filter::parse(&expression).context("Invalid filter expression")?;
    let catalog = load_catalog(config, variant)?;

    println!("Albums matching {filter}:");
    let albums = query::albums_matching(&catalog, |album| filter.matches(album));
    print!("{}", render::render_titles(&albums));
    Ok(())
}
