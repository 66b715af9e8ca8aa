use anyhow::{anyhow, Context, Result};
use clap::Parser;
use discograph_pipeline::{config, Config, Variant};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "discograph", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ~/.config/discograph/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the catalogs, schemas and XSLT templates
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Which catalog to work on
    #[arg(long, global = true, value_enum)]
    variant: Option<VariantArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum VariantArg {
    Json,
    Xml,
    All,
}

impl VariantArg {
    fn variants(self) -> Vec<Variant> {
        match self {
            Self::Json => vec![Variant::Json],
            Self::Xml => vec![Variant::Xml],
            Self::All => Variant::ALL.to_vec(),
        }
    }

    /// The single catalog a query-style command reads.
    fn single(self) -> Result<Variant> {
        match self {
            Self::Json => Ok(Variant::Json),
            Self::Xml => Ok(Variant::Xml),
            Self::All => Err(anyhow!("this command reads one catalog: use --variant json or xml")),
        }
    }
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Run every canned step for one or both catalogs
    ///
    /// The JSON batch loads albums.json, validates it against its JSON Schema
    /// and runs the genre, artist, long-track, playlist and filter queries.
    ///
    /// The XML batch validates albums.xml against the DTD and the XSD, loads it,
    /// runs the same queries and writes the text and HTML reports through the
    /// XSLT templates.
    ///
    /// A failing step is reported and the batch carries on. Steps that need
    /// the catalog are skipped when it fails to load.
    ///
    /// Defaults to both catalogs.
    Run,
    /// Validate the catalog against its schema(s)
    ///
    /// Schema mismatches are listed, not treated as fatal. DTD and XSD checks
    /// need `xmllint` on the PATH (or configured under [tools]).
    Validate,
    /// Run a single query against the catalog
    Query {
        #[command(subcommand)]
        query: QueryCommand,
    },
    /// Draw a random playlist of distinct compositions
    Playlist {
        /// Number of compositions (default: queries.playlist_size)
        #[arg(long, short = 'n')]
        count: Option<usize>,

        /// Seed for a repeatable draw
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the built-in plain-text catalog report
    Report,
    /// Write the text and HTML reports through the XSLT templates
    Transform {
        /// Directory for the generated reports (default: paths.output_dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, clap::Subcommand)]
enum QueryCommand {
    /// Albums tagged with a genre (exact, case-sensitive)
    Genre {
        /// Genre name (default: queries.genre)
        genre: Option<String>,
    },
    /// Every genre an artist appears under
    Artist {
        /// Artist name (default: queries.artist)
        artist: Option<String>,
    },
    /// Albums with at least one composition longer than a threshold
    LongTracks {
        /// Threshold as seconds, MM:SS or H:MM:SS (default: queries.long_track_secs)
        #[arg(long, short = 't')]
        threshold: Option<String>,
    },
    /// Albums matching a filter expression
    ///
    /// Fields: title, artist, genre, tracks, longest, total.
    /// Operators: == != < <= > >= contains, combined with and/or/not and
    /// parentheses. Durations may be written as MM:SS.
    ///
    /// Example: tracks == 3 and title contains "The"
    Filter {
        /// Expression (default: queries.filter)
        expression: Option<String>,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(config::config_file_path);
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    if let Some(data_dir) = &cli.data_dir {
        config = config.with_data_dir(data_dir.clone());
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    twyg::setup(config.logging.clone()).map_err(|e| anyhow!("Failed to set up logging: {e}"))?;

    let variant = cli.variant;
    let single = || variant.unwrap_or(VariantArg::Json).single();

    match cli.command {
        Commands::Run => {
            let variants = variant.unwrap_or(VariantArg::All).variants();
            commands::run_batches(&config, &variants)?;
        }
        Commands::Validate => {
            let variants = variant.unwrap_or(VariantArg::All).variants();
            commands::run_validate(&config, &variants)?;
        }
        Commands::Query { query } => {
            let variant = single()?;
            match query {
                QueryCommand::Genre { genre } => commands::query_genre(&config, variant, genre)?,
                QueryCommand::Artist { artist } => {
                    commands::query_artist(&config, variant, artist)?;
                }
                QueryCommand::LongTracks { threshold } => {
                    commands::query_long_tracks(&config, variant, threshold.as_deref())?;
                }
                QueryCommand::Filter { expression } => {
                    commands::query_filter(&config, variant, expression)?;
                }
            }
        }
        Commands::Playlist { count, seed } => {
            commands::show_playlist(&config, single()?, count, seed)?;
        }
        Commands::Report => {
            commands::show_report(&config, single()?)?;
        }
        Commands::Transform { output_dir } => {
            let config = match output_dir {
                Some(dir) => config.with_output_dir(dir),
                None => config,
            };
            commands::run_transforms(&config)?;
        }
        Commands::Config { action } => {
            let config_path = cli.config.unwrap_or_else(config::config_file_path);
            match action {
                ConfigCommand::Show => commands::config::show_config(&config, &config_path)?,
                ConfigCommand::Path => commands::config::show_path(&config_path)?,
                ConfigCommand::Example => commands::config::show_example()?,
                ConfigCommand::Init => commands::config::init_config(&config_path)?,
            }
        }
    }

    Ok(())
}
