use crate::cli::{ReferenceArgs, ThresholdArgs};
use crate::commands::contamination::create;
use crate::commands::{load_reference, resolve_config};
use crate::contamination::pipeline::validate_calls;
use crate::contamination::VariantSplitter;
use crate::export::formats::haplogroup::{write_haplogroup_table, HaplogroupCall};
use crate::export::formats::hsd::{write_hsd, HsdRow};
use crate::haplogroup::{classify, HaplogroupAssignment};
use crate::import::load_single;
use crate::utils::progress_bar_builder::{ProgressBarBuilder, SAMPLE_BAR_TEMPLATE};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn run(input: Vec<PathBuf>, reference: ReferenceArgs, output: PathBuf, hsd: bool) -> Result<()> {
    let config = resolve_config(&reference, &ThresholdArgs::default())?;
    let samples = load_single(&input)?;
    let tree = load_reference(&reference, &config)?;
    let splitter = VariantSplitter::from_config(&config);

    let progress = ProgressBarBuilder::new("Classifying major profiles...")
        .with_template(SAMPLE_BAR_TEMPLATE)
        .with_length(samples.len() as u64)
        .build()?;
    let assignments = samples
        .iter()
        .map(|sample| {
            validate_calls(sample)?;
            let profiles = splitter.split(sample);
            progress.inc(1);
            Ok((sample.id(), classify(&tree, &profiles.major)))
        })
        .collect::<crate::error::Result<Vec<(&str, HaplogroupAssignment)>>>()?;
    progress.finish_with_message("done");

    let writer = create(&output)?;
    let written = if hsd {
        let rows = assignments.iter().map(|(id, assignment)| HsdRow {
            sample_id: id,
            assignment,
        });
        write_hsd(writer, rows)
    } else {
        let calls: Vec<HaplogroupCall> = assignments
            .iter()
            .map(|(id, assignment)| HaplogroupCall::new(id, assignment))
            .collect();
        write_haplogroup_table(writer, &calls)
    };
    written.with_context(|| format!("Failed to write {}", output.display()))
}
