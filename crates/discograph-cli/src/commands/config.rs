use anyhow::{Context, Result};
use discograph_pipeline::{config, Config};
use std::path::Path;

/// Show the current effective configuration.
pub fn show_config(config: &Config, config_path: &Path) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    let paths = &config.paths;
    println!("Paths:");
    println!("  data_dir: {}", paths.data_dir.display());
    println!("  output_dir: {}", paths.output_dir.display());
    println!("  json_catalog: {}", paths.input(&paths.json_catalog).display());
    println!("  json_schema: {}", paths.input(&paths.json_schema).display());
    println!("  xml_catalog: {}", paths.input(&paths.xml_catalog).display());
    println!("  dtd: {}", paths.input(&paths.dtd).display());
    println!("  xsd: {}", paths.input(&paths.xsd).display());
    println!("  txt_output: {}", paths.output(&paths.txt_output).display());
    println!("  html_output: {}", paths.output(&paths.html_output).display());

    let queries = &config.queries;
    println!("\nQueries:");
    println!("  genre: {}", queries.genre);
    println!("  artist: {}", queries.artist);
    println!("  long_track_secs: {}", queries.long_track_secs);
    println!("  playlist_size: {}", queries.playlist_size);
    println!("  filter: {}", queries.filter);

    println!("\nTools:");
    println!("  xmllint: {}", config.tools.xmllint.display());
    println!("  xsltproc: {}", config.tools.xsltproc.display());

    println!("\nLogging:");
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (DISCO_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_path(config_path: &Path) -> Result<()> {
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config(config_path: &Path) -> Result<()> {
    let created = config::ensure_config_file_at(config_path)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure discograph.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
