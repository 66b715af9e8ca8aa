use anyhow::Result;
use discograph_core::playlist;
use discograph_pipeline::{render, Config, Variant};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::load_catalog;

pub fn show_playlist(
    config: &Config,
    variant: Variant,
    count: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let count = count.unwrap_or(config.queries.playlist_size);
    let catalog = load_catalog(config, variant)?;

    let tracks = match seed {
        Some(seed) => playlist::sample_with(&catalog, count, &mut StdRng::seed_from_u64(seed)),
        None => playlist::sample(&catalog, count),
    };
    if tracks.len() < count {
        log::warn!(
            "Asked for {count} compositions, the catalog only has {}",
            tracks.len()
        );
    }

    println!("Random playlist:");
    print!("{}", render::render_playlist(&tracks));
    Ok(())
}
