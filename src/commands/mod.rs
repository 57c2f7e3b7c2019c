pub mod classify;
pub mod contamination;

use crate::cli::{ReferenceArgs, ThresholdArgs};
use crate::config::Config;
use crate::haplogroup::{load_tree, ReferenceTree};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::info;

/// Configuration from `--config` or the user config, with flags applied on top.
pub(crate) fn resolve_config(reference: &ReferenceArgs, thresholds: &ThresholdArgs) -> Result<Config> {
    let mut config = match &reference.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?,
        None => Config::load(),
    };

    if let Some(v) = thresholds.split_threshold {
        config.major_minor_split_threshold = v;
    }
    if let Some(v) = thresholds.fixed_threshold {
        config.fixed_allele_threshold = v;
    }
    if let Some(v) = thresholds.min_quality {
        config.min_quality_for_contamination = v;
    }
    if let Some(v) = thresholds.min_distance {
        config.min_distance_for_contamination = v;
    }
    if let Some(v) = thresholds.min_level {
        config.min_detectable_level = v;
    }
    if let Some(v) = thresholds.threads {
        config.threads = v;
    }

    config.validate()?;
    if reference.save_config {
        let path = config.save().context("Failed to save configuration")?;
        info!("Saved configuration to {}", path.display());
    }
    Ok(config)
}

pub(crate) fn load_reference(reference: &ReferenceArgs, config: &Config) -> Result<ReferenceTree> {
    let progress = ProgressBarBuilder::new("Loading phylogeny...")
        .with_tick()
        .build()?;
    let tree = load_tree(
        &reference.tree,
        reference.weights.as_deref(),
        &config.phylogeny_version,
        config.default_mutation_weight,
    )
    .with_context(|| format!("Failed to load phylogeny {}", reference.tree.display()))?;
    progress.finish_and_clear();
    info!("Phylogeny {} with {} haplogroups", tree.version(), tree.len());
    Ok(tree)
}
