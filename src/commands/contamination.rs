use crate::cli::{ReferenceArgs, ThresholdArgs};
use crate::commands::{load_reference, resolve_config};
use crate::contamination::{run_with_progress, ContaminationResult, ContaminationSummary};
use crate::export::formats::hsd::{write_hsd, HsdRow};
use crate::export::formats::report::write_textual_report;
use crate::export::ContaminationExport;
use crate::import::load_single;
use crate::utils::progress_bar_builder::{ProgressBarBuilder, SAMPLE_BAR_TEMPLATE};
use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub fn run(
    input: Vec<PathBuf>,
    reference: ReferenceArgs,
    output: PathBuf,
    report: Option<PathBuf>,
    hsd: Option<PathBuf>,
    thresholds: ThresholdArgs,
) -> Result<()> {
    let config = resolve_config(&reference, &thresholds)?;
    let samples = load_single(&input)?;
    let tree = load_reference(&reference, &config)?;

    let progress = ProgressBarBuilder::new("Detecting contamination...")
        .with_template(SAMPLE_BAR_TEMPLATE)
        .with_length(samples.len() as u64)
        .build()?;
    let results = run_with_progress(&samples, &tree, &config, |done| {
        progress.set_position(done as u64)
    })?;
    progress.finish_with_message("done");

    let summary = ContaminationSummary::from_results(&results);
    info!(
        "{} contaminated, {} clean, median coverage {:.1} (Q1 {:.1}, Q3 {:.1})",
        summary.yes, summary.no, summary.coverage_median, summary.coverage_q1, summary.coverage_q3
    );

    write_textual_report(create(&output)?, &results)
        .with_context(|| format!("Failed to write report {}", output.display()))?;

    if let Some(path) = hsd {
        write_major_hsd(&path, &results)?;
    }

    if let Some(path) = report {
        ContaminationExport::new(tree.version(), results)
            .save(&path)
            .with_context(|| format!("Failed to write JSON report {}", path.display()))?;
    }

    Ok(())
}

fn write_major_hsd(path: &Path, results: &[ContaminationResult]) -> Result<()> {
    let rows = results.iter().map(|r| HsdRow {
        sample_id: &r.sample_id,
        assignment: &r.major,
    });
    write_hsd(create(path)?, rows).with_context(|| format!("Failed to write HSD {}", path.display()))
}

pub(crate) fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
