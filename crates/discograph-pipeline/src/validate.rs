//! Advisory schema validation.
//!
//! A document that fails its schema is not an error: validators return a
//! [`ValidationReport`] listing every problem, and the catalog can still be
//! loaded and queried. `Err` is reserved for validators that cannot run at
//! all (missing files, an uncompilable schema, a missing `xmllint`) and for
//! documents that are not well-formed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use discograph_core::{CatalogFormat, Error};
use jsonschema::JSONSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    /// Where in the document the problem was found: a JSON pointer for JSON
    /// documents, `file:line` for XML documents.
    pub path: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.message, self.path)
    }
}

/// The outcome of validating one document against one schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub validator: String,
    pub document: PathBuf,
    pub schema: PathBuf,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn from_issues(
        validator: &str,
        document: &Path,
        schema: &Path,
        issues: Vec<ValidationIssue>,
    ) -> Self {
        Self {
            validator: validator.to_string(),
            document: document.to_path_buf(),
            schema: schema.to_path_buf(),
            valid: issues.is_empty(),
            issues,
        }
    }
}

/// Something that can check a document against a schema.
pub trait SchemaValidator {
    /// Short human-readable name, e.g. "JSON Schema" or "DTD".
    fn name(&self) -> &str;

    fn validate(&self, document: &Path) -> PipelineResult<ValidationReport>;
}

// ---------------------------------------------------------------------------
// JSON Schema
// ---------------------------------------------------------------------------

/// Validates JSON documents with the `jsonschema` crate.
#[derive(Debug, Clone)]
pub struct JsonSchemaValidator {
    schema_path: PathBuf,
}

impl JsonSchemaValidator {
    #[must_use]
    pub fn new(schema_path: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: schema_path.into(),
        }
    }

    fn read_schema(&self) -> PipelineResult<serde_json::Value> {
        let text = std::fs::read_to_string(&self.schema_path).map_err(|e| PipelineError::Schema {
            path: self.schema_path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| PipelineError::Schema {
            path: self.schema_path.clone(),
            message: e.to_string(),
        })
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn name(&self) -> &str {
        "JSON Schema"
    }

    fn validate(&self, document: &Path) -> PipelineResult<ValidationReport> {
        let schema = self.read_schema()?;
        let instance = read_json_document(document)?;

        let compiled = JSONSchema::compile(&schema).map_err(|e| PipelineError::Schema {
            path: self.schema_path.clone(),
            message: e.to_string(),
        })?;

        let issues = match compiled.validate(&instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let pointer = error.instance_path.to_string();
                    ValidationIssue {
                        message: error.to_string(),
                        path: if pointer.is_empty() {
                            String::from("/")
                        } else {
                            pointer
                        },
                    }
                })
                .collect(),
        };

        log::debug!(
            "{} validation of {}: {} issue(s)",
            self.name(),
            document.display(),
            issues.len()
        );

        Ok(ValidationReport::from_issues(
            self.name(),
            document,
            &self.schema_path,
            issues,
        ))
    }
}

fn read_json_document(document: &Path) -> PipelineResult<serde_json::Value> {
    let text = std::fs::read_to_string(document).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PipelineError::Catalog(Error::NotFound {
                path: document.to_path_buf(),
            })
        } else {
            PipelineError::Io(e)
        }
    })?;
    serde_json::from_str(&text).map_err(|e| {
        PipelineError::Catalog(Error::Parse {
            format: CatalogFormat::Json,
            message: e.to_string(),
        })
    })
}

// ---------------------------------------------------------------------------
// DTD / XSD via xmllint
// ---------------------------------------------------------------------------

/// The kind of XML schema handed to `xmllint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlSchemaKind {
    Dtd(PathBuf),
    Xsd(PathBuf),
}

impl XmlSchemaKind {
    fn path(&self) -> &Path {
        match self {
            Self::Dtd(path) | Self::Xsd(path) => path,
        }
    }
}

/// Validates XML documents against a DTD or XSD by running `xmllint`.
#[derive(Debug, Clone)]
pub struct XmlLintValidator {
    program: PathBuf,
    kind: XmlSchemaKind,
}

impl XmlLintValidator {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, kind: XmlSchemaKind) -> Self {
        Self {
            program: program.into(),
            kind,
        }
    }

    fn failure(&self, document: &Path, message: impl Into<String>) -> PipelineError {
        PipelineError::Validation {
            validator: self.name().to_string(),
            document: document.to_path_buf(),
            message: message.into(),
        }
    }
}

impl SchemaValidator for XmlLintValidator {
    fn name(&self) -> &str {
        match self.kind {
            XmlSchemaKind::Dtd(_) => "DTD",
            XmlSchemaKind::Xsd(_) => "XSD",
        }
    }

    fn validate(&self, document: &Path) -> PipelineResult<ValidationReport> {
        if !document.exists() {
            return Err(PipelineError::Catalog(Error::NotFound {
                path: document.to_path_buf(),
            }));
        }
        let schema = self.kind.path();
        if !schema.exists() {
            return Err(PipelineError::Schema {
                path: schema.to_path_buf(),
                message: String::from("file not found"),
            });
        }

        let mut command = Command::new(&self.program);
        command.arg("--noout");
        match &self.kind {
            XmlSchemaKind::Dtd(path) => command.arg("--dtdvalid").arg(path),
            XmlSchemaKind::Xsd(path) => command.arg("--schema").arg(path),
        };
        command.arg(document);

        log::debug!("Running {:?}", command);
        let output = command.output().map_err(|e| {
            self.failure(
                document,
                format!("could not run {}: {e}", self.program.display()),
            )
        })?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        let issues = match output.status.code() {
            Some(0) => Vec::new(),
            // 3: the document does not match its DTD or XSD
            Some(3) => {
                let mut issues = parse_xmllint_diagnostics(&stderr);
                if issues.is_empty() {
                    issues.push(ValidationIssue {
                        message: stderr.trim().to_string(),
                        path: document.display().to_string(),
                    });
                }
                issues
            }
            // 4: the document could not be read or is not well-formed XML
            Some(4) => {
                return Err(PipelineError::Catalog(Error::Parse {
                    format: CatalogFormat::Xml,
                    message: format!("{}: {}", document.display(), stderr.trim()),
                }));
            }
            code => {
                let status = code.map_or_else(|| String::from("a signal"), |c| format!("status {c}"));
                return Err(self.failure(
                    document,
                    format!(
                        "{} exited with {status}: {}",
                        self.program.display(),
                        stderr.trim()
                    ),
                ));
            }
        };

        Ok(ValidationReport::from_issues(
            self.name(),
            document,
            schema,
            issues,
        ))
    }
}

/// Extract `file:line: message` diagnostics from `xmllint` stderr.
///
/// Source excerpts, caret lines and the trailing "fails to validate" summary
/// are skipped.
pub fn parse_xmllint_diagnostics(stderr: &str) -> Vec<ValidationIssue> {
    stderr
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, ':');
            let file = parts.next()?;
            let line_no = parts.next()?;
            let message = parts.next()?.trim();
            if file.is_empty() || message.is_empty() || line_no.parse::<u32>().is_err() {
                return None;
            }
            Some(ValidationIssue {
                message: message.to_string(),
                path: format!("{file}:{line_no}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"{
        "type": "array",
        "items": {
            "type": "object",
            "required": ["title"],
            "properties": {
                "title": {"type": "string", "minLength": 1},
                "compositions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"duration_seconds": {"type": "integer", "minimum": 0}}
                    }
                }
            }
        }
    }"#;

    fn fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_json_schema_valid_document() {
        let dir = TempDir::new().unwrap();
        let schema = fixture(&dir, "schema.json", SCHEMA);
        let doc = fixture(&dir, "albums.json", r#"[{"title": "Kind of Blue"}]"#);

        let report = JsonSchemaValidator::new(schema).validate(&doc).unwrap();
        assert!(report.valid);
        assert!(report.issues.is_empty());
        assert_eq!(report.validator, "JSON Schema");
    }

    #[test]
    fn test_json_schema_reports_paths() {
        let dir = TempDir::new().unwrap();
        let schema = fixture(&dir, "schema.json", SCHEMA);
        let doc = fixture(
            &dir,
            "albums.json",
            r#"[{"title": "ok"}, {"compositions": [{"duration_seconds": -5}]}]"#,
        );

        let report = JsonSchemaValidator::new(schema).validate(&doc).unwrap();
        assert!(!report.valid);
        let paths: Vec<&str> = report.issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"/1"), "missing title at /1: {paths:?}");
        assert!(
            paths.contains(&"/1/compositions/0/duration_seconds"),
            "negative duration: {paths:?}"
        );
    }

    #[test]
    fn test_json_schema_missing_schema_is_error() {
        let dir = TempDir::new().unwrap();
        let doc = fixture(&dir, "albums.json", "[]");
        let err = JsonSchemaValidator::new(dir.path().join("absent.json"))
            .validate(&doc)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_json_schema_missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        let schema = fixture(&dir, "schema.json", SCHEMA);
        let err = JsonSchemaValidator::new(schema)
            .validate(&dir.path().join("absent.json"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_xmllint_diagnostics() {
        let stderr = "\
albums.xml:12: element album: validity error : Element album content does not follow the DTD
    <album>
    ^
albums.xml:30: element duration: Schemas validity error : Element 'duration': [facet 'pattern'] mismatch.
albums.xml fails to validate
";
        let issues = parse_xmllint_diagnostics(stderr);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "albums.xml:12");
        assert!(issues[0].message.starts_with("element album: validity error"));
        assert_eq!(issues[1].path, "albums.xml:30");
    }

    /// Writes an executable stand-in for `xmllint` that prints `stderr` and
    /// exits with `code`.
    #[cfg(unix)]
    fn fake_xmllint(dir: &TempDir, code: i32, stderr: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join(format!("xmllint-{code}"));
        let script = format!("#!/bin/sh\ncat >&2 <<'EOF'\n{stderr}\nEOF\nexit {code}\n");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    fn run_fake(code: i32, stderr: &str) -> PipelineResult<ValidationReport> {
        let dir = TempDir::new().unwrap();
        let doc = fixture(&dir, "albums.xml", "<albums/>");
        let xsd = fixture(&dir, "schema.xsd", "<xs:schema/>");
        let program = fake_xmllint(&dir, code, stderr);
        XmlLintValidator::new(program, XmlSchemaKind::Xsd(xsd)).validate(&doc)
    }

    #[cfg(unix)]
    #[test]
    fn test_xmllint_exit_zero_is_valid() {
        let report = run_fake(0, "albums.xml validates").unwrap();
        assert!(report.valid);
        assert!(report.issues.is_empty());
        assert_eq!(report.validator, "XSD");
    }

    #[cfg(unix)]
    #[test]
    fn test_xmllint_exit_three_lists_issues() {
        let report = run_fake(
            3,
            "albums.xml:4: element duration: Schemas validity error : Element 'duration': mismatch.\n\
             albums.xml fails to validate",
        )
        .unwrap();
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].path, "albums.xml:4");
    }

    #[cfg(unix)]
    #[test]
    fn test_xmllint_exit_four_is_parse_error() {
        let err = run_fake(4, "albums.xml:1: parser error : StartTag: invalid element name").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Catalog(Error::Parse {
                format: CatalogFormat::Xml,
                ..
            })
        ));
        assert!(err.to_string().contains("invalid element name"));
    }

    #[cfg(unix)]
    #[test]
    fn test_xmllint_other_exit_is_validation_error() {
        let err = run_fake(1, "usage: xmllint [options] XMLfiles ...").unwrap_err();
        assert!(matches!(err, PipelineError::Validation { .. }));
    }

    #[test]
    fn test_xmllint_missing_program_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let doc = fixture(&dir, "albums.xml", "<albums/>");
        let dtd = fixture(&dir, "schema.dtd", "<!ELEMENT albums EMPTY>");

        let validator = XmlLintValidator::new(
            dir.path().join("no-such-xmllint"),
            XmlSchemaKind::Dtd(dtd),
        );
        assert_eq!(validator.name(), "DTD");
        let err = validator.validate(&doc).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_xmllint_missing_schema_is_reported_before_running() {
        let dir = TempDir::new().unwrap();
        let doc = fixture(&dir, "albums.xml", "<albums/>");
        let validator = XmlLintValidator::new(
            "xmllint",
            XmlSchemaKind::Xsd(dir.path().join("absent.xsd")),
        );
        let err = validator.validate(&doc).unwrap_err();
        assert!(matches!(err, PipelineError::Schema { .. }));
    }
}
