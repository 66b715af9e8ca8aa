//! The batch runner: every canned step for one catalog variant.
//!
//! Steps run in a fixed order and never abort the batch. A step that fails
//! is logged and recorded as [`StepStatus::Failed`]; the steps that need the
//! loaded catalog are recorded as [`StepStatus::Skipped`] when loading failed.

use std::fmt;
use std::path::Path;

use discograph_core::{load, playlist, query, Catalog, Filter};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::PipelineResult;
use crate::render;
use crate::transform::{transform_to_file, TransformEngine, XsltProc};
use crate::validate::{
    JsonSchemaValidator, SchemaValidator, XmlLintValidator, XmlSchemaKind,
};

/// Which catalog document a batch works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Json,
    Xml,
}

impl Variant {
    pub const ALL: [Self; 2] = [Self::Json, Self::Xml];
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
        }
    }
}

/// How a step ended, with its output, error message or skip reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Completed(String),
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub variant: Variant,
    pub name: String,
    pub status: StepStatus,
}

impl StepReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.status, StepStatus::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, StepStatus::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, StepStatus::Skipped(_))
    }

    /// The step's output, error message or skip reason.
    pub fn detail(&self) -> &str {
        match &self.status {
            StepStatus::Completed(text) | StepStatus::Failed(text) | StepStatus::Skipped(text) => {
                text
            }
        }
    }
}

/// Step counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} completed, {} failed, {} skipped",
            self.completed, self.failed, self.skipped
        )
    }
}

pub fn summarize(reports: &[StepReport]) -> Summary {
    reports.iter().fold(Summary::default(), |mut acc, report| {
        match report.status {
            StepStatus::Completed(_) => acc.completed += 1,
            StepStatus::Failed(_) => acc.failed += 1,
            StepStatus::Skipped(_) => acc.skipped += 1,
        }
        acc
    })
}

/// Runs the canned steps against the files named in a [`Config`].
pub struct Batch<'a> {
    config: &'a Config,
    transformer: Box<dyn TransformEngine + 'a>,
    seed: Option<u64>,
}

impl fmt::Debug for Batch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("config", &self.config)
            .field("transformer", &self.transformer.name())
            .field("seed", &self.seed)
            .finish()
    }
}

impl<'a> Batch<'a> {
    /// A batch that transforms with the configured `xsltproc`.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            transformer: Box::new(XsltProc::new(&config.tools.xsltproc)),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_transformer(mut self, transformer: impl TransformEngine + 'a) -> Self {
        self.transformer = Box::new(transformer);
        self
    }

    /// Make the playlist step deterministic.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn run(&self, variant: Variant) -> Vec<StepReport> {
        log::info!("Starting {variant} batch");
        let reports = match variant {
            Variant::Json => self.run_json(),
            Variant::Xml => self.run_xml(),
        };
        log::info!("Finished {variant} batch: {}", summarize(&reports));
        reports
    }

    fn run_json(&self) -> Vec<StepReport> {
        let paths = &self.config.paths;
        let document = paths.input(&paths.json_catalog);
        let mut reports = Vec::new();

        let catalog = load_step(Variant::Json, &document, &mut reports, |path| {
            load::load_json(path)
        });

        let validator = JsonSchemaValidator::new(paths.input(&paths.json_schema));
        reports.push(validation_step(Variant::Json, &validator, &document));

        self.query_steps(Variant::Json, catalog.as_ref(), &mut reports);
        reports
    }

    fn run_xml(&self) -> Vec<StepReport> {
        let paths = &self.config.paths;
        let document = paths.input(&paths.xml_catalog);
        let xmllint = &self.config.tools.xmllint;
        let mut reports = Vec::new();

        let schemas = [
            XmlSchemaKind::Dtd(paths.input(&paths.dtd)),
            XmlSchemaKind::Xsd(paths.input(&paths.xsd)),
        ];
        for kind in schemas {
            let validator = XmlLintValidator::new(xmllint, kind);
            reports.push(validation_step(Variant::Xml, &validator, &document));
        }

        let catalog = load_step(Variant::Xml, &document, &mut reports, |path| {
            load::load_xml(path)
        });
        self.query_steps(Variant::Xml, catalog.as_ref(), &mut reports);

        let outputs = [
            ("transform text", &paths.txt_template, &paths.txt_output),
            ("transform html", &paths.html_template, &paths.html_output),
        ];
        for (name, template, output) in outputs {
            let template = paths.input(template);
            let output = paths.output(output);
            reports.push(step(Variant::Xml, name, || {
                let written =
                    transform_to_file(self.transformer.as_ref(), &document, &template, &output)?;
                Ok(format!("Wrote {written} bytes to {}\n", output.display()))
            }));
        }

        reports
    }

    fn query_steps(
        &self,
        variant: Variant,
        catalog: Option<&Catalog>,
        reports: &mut Vec<StepReport>,
    ) {
        let queries = &self.config.queries;
        let names = ["genre query", "artist query", "long-track query", "playlist", "filter query"];

        let Some(catalog) = catalog else {
            for name in names {
                log::warn!("[{variant}] {name}: skipped, catalog did not load");
                reports.push(StepReport {
                    variant,
                    name: name.to_string(),
                    status: StepStatus::Skipped(String::from("catalog did not load")),
                });
            }
            return;
        };

        reports.push(step(variant, names[0], || {
            let albums = query::albums_by_genre(catalog, &queries.genre);
            Ok(render::render_albums(&albums))
        }));
        reports.push(step(variant, names[1], || {
            let genres = query::genres_by_artist(catalog, &queries.artist);
            Ok(render::render_genres(&genres))
        }));
        reports.push(step(variant, names[2], || {
            let albums = query::albums_with_long_tracks(catalog, queries.long_track_secs);
            Ok(render::render_titles(&albums))
        }));
        reports.push(step(variant, names[3], || {
            let tracks = match self.seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed);
                    playlist::sample_with(catalog, queries.playlist_size, &mut rng)
                }
                None => playlist::sample(catalog, queries.playlist_size),
            };
            Ok(render::render_playlist(&tracks))
        }));
        reports.push(step(variant, names[4], || {
            let filter = Filter::parse(&queries.filter)?;
            let albums = query::albums_matching(catalog, |album| filter.matches(album));
            Ok(render::render_titles(&albums))
        }));
    }
}

fn load_step(
    variant: Variant,
    document: &Path,
    reports: &mut Vec<StepReport>,
    loader: impl FnOnce(&Path) -> discograph_core::Result<Catalog>,
) -> Option<Catalog> {
    let mut catalog = None;
    reports.push(step(variant, "load", || {
        let loaded = loader(document)?;
        let text = format!(
            "Loaded {} albums ({} compositions) from {}\n",
            loaded.len(),
            loaded.composition_count(),
            document.display()
        );
        catalog = Some(loaded);
        Ok(text)
    }));
    catalog
}

fn validation_step(
    variant: Variant,
    validator: &dyn SchemaValidator,
    document: &Path,
) -> StepReport {
    let name = format!("validate {}", validator.name());
    step(variant, &name, || {
        let report = validator.validate(document)?;
        if !report.valid {
            log::warn!(
                "{} does not match its {} ({} issue(s))",
                document.display(),
                validator.name(),
                report.issues.len()
            );
        }
        Ok(render::render_validation(&report))
    })
}

/// Run one variant with an explicit transform engine.
pub fn run_batch(
    config: &Config,
    variant: Variant,
    transformer: &dyn TransformEngine,
) -> Vec<StepReport> {
    Batch::new(config).with_transformer(transformer).run(variant)
}

fn step(
    variant: Variant,
    name: &str,
    action: impl FnOnce() -> PipelineResult<String>,
) -> StepReport {
    log::debug!("[{variant}] {name}: starting");
    let status = match action() {
        Ok(output) => {
            log::info!("[{variant}] {name}: done");
            StepStatus::Completed(output)
        }
        Err(e) => {
            log::error!("[{variant}] {name}: {e}");
            StepStatus::Failed(e.to_string())
        }
    };
    StepReport {
        variant,
        name: name.to_string(),
        status,
    }
}
