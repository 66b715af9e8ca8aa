use anyhow::{Context, Result};
use discograph_pipeline::transform::transform_to_file;
use discograph_pipeline::{Config, XsltProc};

/// Write the text and HTML reports from the XML catalog.
pub fn run_transforms(config: &Config) -> Result<()> {
    let paths = &config.paths;
    let engine = XsltProc::new(&config.tools.xsltproc);
    let source = paths.input(&paths.xml_catalog);

    for (template, output) in [
        (&paths.txt_template, &paths.txt_output),
        (&paths.html_template, &paths.html_output),
    ] {
        let template = paths.input(template);
        let output = paths.output(output);
        let written = transform_to_file(&engine, &source, &template, &output)
            .with_context(|| format!("Failed to transform with {}", template.display()))?;
        println!("✓ Wrote {} ({written} bytes)", output.display());
    }

    Ok(())
}
