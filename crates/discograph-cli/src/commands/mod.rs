pub mod config;
pub mod playlist;
pub mod query;
pub mod report;
pub mod run;
pub mod transform;
pub mod validate;

pub use playlist::show_playlist;
pub use query::{query_artist, query_filter, query_genre, query_long_tracks};
pub use report::show_report;
pub use run::run_batches;
pub use transform::run_transforms;
pub use validate::run_validate;

use anyhow::{Context, Result};
use discograph_core::{load, Catalog};
use discograph_pipeline::{Config, Variant};

/// Load the catalog document for `variant` from the configured data directory.
fn load_catalog(config: &Config, variant: Variant) -> Result<Catalog> {
    let paths = &config.paths;
    let catalog = match variant {
        Variant::Json => {
            let path = paths.input(&paths.json_catalog);
            load::load_json(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        Variant::Xml => {
            let path = paths.input(&paths.xml_catalog);
            load::load_xml(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
    };
    log::debug!("Loaded {} albums from the {variant} catalog", catalog.len());
    Ok(catalog)
}
