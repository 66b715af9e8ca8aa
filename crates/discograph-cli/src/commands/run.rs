use anyhow::{bail, Result};
use discograph_pipeline::batch::summarize;
use discograph_pipeline::{Batch, Config, StepStatus, Variant};

/// Run the full batch for each variant and print every step's outcome.
///
/// Fails only after all variants have run, if any step failed.
pub fn run_batches(config: &Config, variants: &[Variant]) -> Result<()> {
    let batch = Batch::new(config);
    let mut failed = 0;

    for &variant in variants {
        println!("\n== {} catalog ==\n", variant.to_string().to_uppercase());

        let reports = batch.run(variant);
        for report in &reports {
            match &report.status {
                StepStatus::Completed(output) => {
                    println!("  ✓ [{}]", report.name);
                    for line in output.lines() {
                        println!("      {line}");
                    }
                }
                StepStatus::Failed(error) => eprintln!("  ✗ [{}] FAILED: {error}", report.name),
                StepStatus::Skipped(reason) => println!("  - [{}] skipped: {reason}", report.name),
            }
        }

        let summary = summarize(&reports);
        println!("\n  {summary}");
        failed += summary.failed;
    }

    if failed > 0 {
        bail!("{failed} step(s) failed");
    }
    println!("\n✓ Batch complete");
    Ok(())
}
