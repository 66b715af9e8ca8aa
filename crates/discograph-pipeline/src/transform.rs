//! External document transforms (XSLT).
//!
//! The engine owns the output format: whatever bytes it produces, text or
//! markup, are written out untouched.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{PipelineError, PipelineResult};

/// A templated document transformation.
pub trait TransformEngine {
    fn name(&self) -> &str;

    /// Apply `template` to `source` and return the raw output.
    fn transform(&self, source: &Path, template: &Path) -> PipelineResult<Vec<u8>>;
}

impl<T: TransformEngine + ?Sized> TransformEngine for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn transform(&self, source: &Path, template: &Path) -> PipelineResult<Vec<u8>> {
        (**self).transform(source, template)
    }
}

/// Runs the `xsltproc` command-line processor.
#[derive(Debug, Clone)]
pub struct XsltProc {
    program: PathBuf,
}

impl XsltProc {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for XsltProc {
    fn default() -> Self {
        Self::new("xsltproc")
    }
}

impl TransformEngine for XsltProc {
    fn name(&self) -> &str {
        "xsltproc"
    }

    fn transform(&self, source: &Path, template: &Path) -> PipelineResult<Vec<u8>> {
        check_inputs(source, template)?;

        let output = Command::new(&self.program)
            .arg(template)
            .arg(source)
            .output()
            .map_err(|e| PipelineError::Transform {
                template: template.to_path_buf(),
                message: format!("could not run {}: {e}", self.program.display()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::Transform {
                template: template.to_path_buf(),
                message: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr.trim()
                ),
            });
        }

        log::debug!(
            "{} produced {} bytes from {}",
            self.name(),
            output.stdout.len(),
            template.display()
        );
        Ok(output.stdout)
    }
}

/// Fail with a transform error unless both inputs exist.
pub fn check_inputs(source: &Path, template: &Path) -> PipelineResult<()> {
    for (what, path) in [("template", template), ("source", source)] {
        if !path.is_file() {
            return Err(PipelineError::Transform {
                template: template.to_path_buf(),
                message: format!("{what} {} not found", path.display()),
            });
        }
    }
    Ok(())
}

/// Transform `source` with `template` and write the bytes to `output`.
///
/// Returns the number of bytes written.
pub fn transform_to_file(
    engine: &dyn TransformEngine,
    source: &Path,
    template: &Path,
    output: &Path,
) -> PipelineResult<usize> {
    let bytes = engine.transform(source, template)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &bytes)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), output.display());
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Echoes the template path followed by the raw source bytes.
    struct EchoEngine;

    impl TransformEngine for EchoEngine {
        fn name(&self) -> &str {
            "echo"
        }

        fn transform(&self, source: &Path, template: &Path) -> PipelineResult<Vec<u8>> {
            check_inputs(source, template)?;
            let mut out = template.display().to_string().into_bytes();
            out.extend(fs::read(source)?);
            Ok(out)
        }
    }

    #[test]
    fn test_transform_to_file_writes_bytes_verbatim() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("albums.xml");
        let template = dir.path().join("t.xsl");
        fs::write(&source, [0xEF, 0xBB, 0xBF, b'<', b'a', b'/', b'>']).unwrap();
        fs::write(&template, "<xsl/>").unwrap();

        let output = dir.path().join("out").join("report.bin");
        let written = transform_to_file(&EchoEngine, &source, &template, &output).unwrap();

        let bytes = fs::read(&output).unwrap();
        assert_eq!(bytes.len(), written);
        assert!(bytes.ends_with(&[0xEF, 0xBB, 0xBF, b'<', b'a', b'/', b'>']));
    }

    #[test]
    fn test_missing_template_is_transform_error() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("albums.xml");
        fs::write(&source, "<albums/>").unwrap();

        let err = XsltProc::default()
            .transform(&source, &dir.path().join("absent.xsl"))
            .unwrap_err();
        assert!(err.is_transform());
        assert!(err.to_string().contains("template"));
    }

    #[test]
    fn test_missing_source_is_transform_error() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("t.xsl");
        fs::write(&template, "<xsl/>").unwrap();

        let err = XsltProc::default()
            .transform(&dir.path().join("absent.xml"), &template)
            .unwrap_err();
        assert!(err.is_transform());
    }

    #[test]
    fn test_missing_program_is_transform_error() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("albums.xml");
        let template = dir.path().join("t.xsl");
        fs::write(&source, "<albums/>").unwrap();
        fs::write(&template, "<xsl/>").unwrap();

        let engine = XsltProc::new(dir.path().join("no-such-xsltproc"));
        let err = engine.transform(&source, &template).unwrap_err();
        assert!(err.is_transform());
    }

    #[test]
    fn test_failed_transform_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("report.txt");
        let result = transform_to_file(
            &EchoEngine,
            &dir.path().join("absent.xml"),
            &dir.path().join("absent.xsl"),
            &output,
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
