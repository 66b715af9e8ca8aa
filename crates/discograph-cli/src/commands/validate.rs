use anyhow::{bail, Result};
use discograph_pipeline::render::render_validation;
use discograph_pipeline::{
    Config, JsonSchemaValidator, SchemaValidator, Variant, XmlLintValidator, XmlSchemaKind,
};

fn validators(config: &Config, variant: Variant) -> Vec<Box<dyn SchemaValidator>> {
    let paths = &config.paths;
    let xmllint = &config.tools.xmllint;
    match variant {
        Variant::Json => {
            let json = JsonSchemaValidator::new(paths.input(&paths.json_schema));
            vec![Box::new(json) as Box<dyn SchemaValidator>]
        }
        Variant::Xml => [
            XmlSchemaKind::Dtd(paths.input(&paths.dtd)),
            XmlSchemaKind::Xsd(paths.input(&paths.xsd)),
        ]
        .into_iter()
        .map(|kind| Box::new(XmlLintValidator::new(xmllint, kind)) as Box<dyn SchemaValidator>)
        .collect(),
    }
}

/// Validate each variant's catalog and print the reports.
///
/// Invalid documents are reported but do not fail the command; a validator
/// that cannot run does.
pub fn run_validate(config: &Config, variants: &[Variant]) -> Result<()> {
    let paths = &config.paths;
    let mut errors = 0;

    for &variant in variants {
        let document = match variant {
            Variant::Json => paths.input(&paths.json_catalog),
            Variant::Xml => paths.input(&paths.xml_catalog),
        };
        for validator in validators(config, variant) {
            match validator.validate(&document) {
                Ok(report) => print!("{}", render_validation(&report)),
                Err(e) => {
                    log::error!("{} validation could not run: {e}", validator.name());
                    eprintln!("✗ {}: {e}", validator.name());
                    errors += 1;
                }
            }
        }
    }

    if errors > 0 {
        bail!("{errors} validator(s) could not run");
    }
    Ok(())
}
