use anyhow::{Context, Result};
use confyg::{env, Confygery};
use discograph_core::REFERENCE_FILTER;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for discograph.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (DISCO_* prefix)
/// 3. Config file (~/.config/discograph/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the catalog, schemas, templates and reports live.
    #[serde(default)]
    pub paths: Paths,

    /// Parameters of the canned queries.
    #[serde(default)]
    pub queries: Queries,

    /// External programs used for DTD/XSD validation and XSLT.
    #[serde(default)]
    pub tools: Tools,

    #[serde(default)]
    pub logging: twyg::Opts,
}

/// Input and output file locations.
///
/// Relative input names are resolved against `data_dir`, relative output
/// names against `output_dir`. Absolute paths are used as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub json_catalog: PathBuf,
    pub json_schema: PathBuf,
    pub xml_catalog: PathBuf,
    pub dtd: PathBuf,
    pub xsd: PathBuf,
    pub txt_template: PathBuf,
    pub html_template: PathBuf,
    pub txt_output: PathBuf,
    pub html_output: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            json_catalog: PathBuf::from("albums.json"),
            json_schema: PathBuf::from("schema.json"),
            xml_catalog: PathBuf::from("albums.xml"),
            dtd: PathBuf::from("schema.dtd"),
            xsd: PathBuf::from("schema.xsd"),
            txt_template: PathBuf::from("transform_to_txt.xsl"),
            html_template: PathBuf::from("transform_to_html.xsl"),
            txt_output: PathBuf::from("albums_output.txt"),
            html_output: PathBuf::from("albums_output.html"),
        }
    }
}

impl Paths {
    /// Resolve an input file against the data directory.
    pub fn input(&self, name: &Path) -> PathBuf {
        self.data_dir.join(name)
    }

    /// Resolve an output file against the output directory.
    pub fn output(&self, name: &Path) -> PathBuf {
        self.output_dir.join(name)
    }
}

/// Parameters for the canned queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queries {
    pub genre: String,
    pub artist: String,
    /// Threshold in seconds for the long-track query.
    pub long_track_secs: u32,
    pub playlist_size: usize,
    /// Filter expression for the custom query.
    pub filter: String,
}

impl Default for Queries {
    fn default() -> Self {
        Self {
            genre: String::from("Progressive Rock"),
            artist: String::from("Queen"),
            long_track_secs: 300,
            playlist_size: 3,
            filter: REFERENCE_FILTER.to_string(),
        }
    }
}

/// External programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tools {
    pub xmllint: PathBuf,
    pub xsltproc: PathBuf,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            xmllint: PathBuf::from("xmllint"),
            xsltproc: PathBuf::from("xsltproc"),
        }
    }
}

impl Config {
    /// Load configuration from the default config file and environment.
    ///
    /// Searches for config file at: ~/.config/discograph/config.toml
    /// Reads environment variables with DISCO_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific file plus the environment.
    ///
    /// A missing file is not an error; defaults and environment apply.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
            log::debug!("Loaded config file {}", config_path.display());
        }

        let env_opts = env::Options::with_top_level("disco");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Override the data directory (the `--data-dir` CLI flag).
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.paths.data_dir = data_dir;
        self
    }

    /// Override the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.paths.output_dir = output_dir;
        self
    }
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/discograph/config.toml
/// - macOS: ~/Library/Application Support/discograph/config.toml
/// - Windows: %APPDATA%\discograph\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("discograph")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Discograph Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (DISCO_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

[paths]
# Directory holding the catalogs, schemas and XSLT templates
data_dir = "data"
# Directory the transformed reports are written to
output_dir = "."

json_catalog = "albums.json"
json_schema = "schema.json"
xml_catalog = "albums.xml"
dtd = "schema.dtd"
xsd = "schema.xsd"
txt_template = "transform_to_txt.xsl"
html_template = "transform_to_html.xsl"
txt_output = "albums_output.txt"
html_output = "albums_output.html"

[queries]
genre = "Progressive Rock"
artist = "Queen"
# Compositions strictly longer than this many seconds count as long
long_track_secs = 300
playlist_size = 3
# Fields: title, artist, genre, tracks, longest, total
filter = 'tracks == 3 and title contains "The"'

[tools]
# Used for DTD and XSD validation
xmllint = "xmllint"
# Used for the XSLT transforms
xsltproc = "xsltproc"

# Logging options are passed straight to twyg
#[logging]
#coloured = true
#level = "debug"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    ensure_config_file_at(&config_file_path())
}

/// Create a config file at `config_path` if it doesn't exist.
pub fn ensure_config_file_at(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.data_dir, PathBuf::from("data"));
        assert_eq!(config.queries.genre, "Progressive Rock");
        assert_eq!(config.queries.artist, "Queen");
        assert_eq!(config.queries.long_track_secs, 300);
        assert_eq!(config.queries.playlist_size, 3);
        assert_eq!(config.queries.filter, REFERENCE_FILTER);
    }

    #[test]
    fn test_paths_resolve_against_directories() {
        let paths = Paths::default();
        assert_eq!(
            paths.input(&paths.json_catalog),
            PathBuf::from("data/albums.json")
        );
        assert_eq!(
            paths.output(&paths.html_output),
            PathBuf::from("./albums_output.html")
        );
    }

    #[test]
    fn test_example_config_sections_parse() {
        let value: toml::Value = toml::from_str(example_config()).unwrap();
        let paths: Paths = value["paths"].clone().try_into().unwrap();
        let queries: Queries = value["queries"].clone().try_into().unwrap();
        assert_eq!(paths, Paths::default());
        assert_eq!(queries, Queries::default());
    }

    #[test]
    fn test_partial_sections_fall_back_to_defaults() {
        let queries: Queries = toml::from_str("genre = \"Jazz\"").unwrap();
        assert_eq!(queries.genre, "Jazz");
        assert_eq!(queries.artist, "Queen");
    }

    #[test]
    fn test_load_from_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from(&temp_dir.path().join("absent.toml"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_with_data_dir() {
        let config = Config::default().with_data_dir(PathBuf::from("/srv/albums"));
        assert_eq!(
            config.paths.input(&config.paths.xsd),
            PathBuf::from("/srv/albums/schema.xsd")
        );
    }

    #[test]
    fn test_ensure_config_file_at() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        assert!(ensure_config_file_at(&path).unwrap());
        assert!(!ensure_config_file_at(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), example_config());
    }
}
