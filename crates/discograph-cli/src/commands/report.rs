use anyhow::Result;
use discograph_pipeline::report::catalog_report;
use discograph_pipeline::{Config, Variant};

use super::load_catalog;

pub fn show_report(config: &Config, variant: Variant) -> Result<()> {
    let catalog = load_catalog(config, variant)?;
    print!("{}", catalog_report(&catalog));
    Ok(())
}
