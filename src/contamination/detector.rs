use crate::config::Config;
use crate::contamination::splitter::SplitProfiles;
use crate::haplogroup::tree::ReferenceTree;
use crate::haplogroup::types::{HaplogroupAssignment, ProfileEntry};
use crate::types::Sample;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest possible share of the minor contributor.
pub const MAX_CONTAMINATION_LEVEL: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Yes,
    No,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Yes => write!(f, "YES"),
            Status::No => write!(f, "NO"),
        }
    }
}

/// Verdict and supporting evidence for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContaminationResult {
    pub sample_id: String,
    pub status: Status,
    pub major: HaplogroupAssignment,
    pub minor: HaplogroupAssignment,
    pub sample_mean_coverage: u32,
    pub contamination_level: f64,
    pub distance_score: f64,
    /// Mean fraction of the major allele at heteroplasmic loci.
    pub major_level: f64,
    pub heteroplasmies: usize,
    pub homoplasmies: usize,
}

impl ContaminationResult {
    pub fn major_haplogroup(&self) -> &str {
        &self.major.haplogroup
    }

    pub fn minor_haplogroup(&self) -> &str {
        &self.minor.haplogroup
    }
}

/// Turns a sample's profiles and their classifications into a verdict.
pub struct ContaminationDetector<'a> {
    tree: &'a ReferenceTree,
    config: &'a Config,
}

impl<'a> ContaminationDetector<'a> {
    pub fn new(tree: &'a ReferenceTree, config: &'a Config) -> Self {
        Self { tree, config }
    }

    pub fn detect(
        &self,
        sample: &Sample,
        profiles: &SplitProfiles,
        major: HaplogroupAssignment,
        minor: HaplogroupAssignment,
    ) -> ContaminationResult {
        let sample_mean_coverage = mean_coverage(sample);
        let contamination_level = contamination_level(profiles);
        let major_level = major_level(profiles);

        let distance_score = if major.is_assigned() && minor.is_assigned() {
            self.tree.distance(major.node, minor.node) as f64
        } else {
            0.0
        };

        let distinct = distance_score > self.config.min_distance_for_contamination
            && (!self.config.require_distinct_top_level_clade
                || self.distinct_clades(&major, &minor));
        let confident = minor.quality >= self.config.min_quality_for_contamination;
        let detectable = contamination_level > self.config.min_detectable_level;
        let status = if distinct && confident && detectable {
            Status::Yes
        } else {
            Status::No
        };

        debug!(
            "Sample {}: {} major={} ({:.3}) minor={} ({:.3}) level={:.4} distance={}",
            sample.id(),
            status,
            major.haplogroup,
            major.quality,
            minor.haplogroup,
            minor.quality,
            contamination_level,
            distance_score
        );

        ContaminationResult {
            sample_id: sample.id().to_string(),
            status,
            major,
            minor,
            sample_mean_coverage,
            contamination_level,
            distance_score,
            major_level,
            heteroplasmies: profiles.heteroplasmies,
            homoplasmies: profiles.homoplasmies,
        }
    }

    /// Both assignments placed, under different children of the root.
    fn distinct_clades(&self, major: &HaplogroupAssignment, minor: &HaplogroupAssignment) -> bool {
        major.is_assigned()
            && minor.is_assigned()
            && self.tree.top_level_clade(major.node) != self.tree.top_level_clade(minor.node)
    }
}

/// Mean depth over all calls, rounded half up. Calls without depth count as zero.
pub fn mean_coverage(sample: &Sample) -> u32 {
    let calls = sample.calls();
    if calls.is_empty() {
        return 0;
    }
    let missing = calls.iter().filter(|c| c.depth.is_none()).count();
    if missing > 0 {
        debug!(
            "Sample {}: {} call(s) without depth counted as 0",
            sample.id(),
            missing
        );
    }
    let n = calls.len() as u64;
    let total: u64 = calls.iter().map(|c| c.depth_or_zero() as u64).sum();
    ((2 * total + n) / (2 * n)) as u32
}

/// Mean fraction of the minor alleles, bounded to [0, 0.5].
pub fn contamination_level(profiles: &SplitProfiles) -> f64 {
    mean_fraction(&profiles.minor.entries).clamp(0.0, MAX_CONTAMINATION_LEVEL)
}

fn major_level(profiles: &SplitProfiles) -> f64 {
    let fractions: Vec<f64> = profiles
        .minor
        .entries
        .iter()
        .filter_map(|minor| profiles.major.entry_at(minor.position))
        .map(|major| major.fraction)
        .collect();
    if fractions.is_empty() {
        0.0
    } else {
        fractions.iter().sum::<f64>() / fractions.len() as f64
    }
}

fn mean_fraction(entries: &[ProfileEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    entries.iter().map(|e| e.fraction).sum::<f64>() / entries.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contamination::splitter::VariantSplitter;
    use crate::types::VariantCall;

    fn sample(depths: &[Option<u32>]) -> Sample {
        let calls = depths
            .iter()
            .enumerate()
            .map(|(i, d)| VariantCall::new(100 + i as u32, 'A', 'G', 1.0, *d))
            .collect();
        Sample::new("s", calls).unwrap()
    }

    #[test]
    fn coverage_rounds_half_up() {
        assert_eq!(mean_coverage(&sample(&[Some(10), Some(11)])), 11);
        assert_eq!(mean_coverage(&sample(&[Some(10), Some(10), Some(11)])), 10);
        assert_eq!(mean_coverage(&sample(&[Some(1), Some(2), Some(2), Some(2)])), 2);
        assert_eq!(mean_coverage(&sample(&[])), 0);
    }

    #[test]
    fn missing_depth_counts_as_zero() {
        assert_eq!(mean_coverage(&sample(&[Some(30), None, Some(30)])), 20);
    }

    #[test]
    fn level_is_mean_minor_fraction() {
        let calls = vec![
            VariantCall::new(100, 'A', 'G', 0.10, Some(100)),
            VariantCall::new(200, 'C', 'T', 0.20, Some(100)),
            VariantCall::new(300, 'G', 'A', 0.99, Some(100)),
        ];
        let profiles = VariantSplitter::new(0.01, 0.97).split(&Sample::new("s", calls).unwrap());
        assert!((contamination_level(&profiles) - 0.15).abs() < 1e-12);
        assert!((major_level(&profiles) - 0.85).abs() < 1e-12);
    }

    #[test]
    fn level_grows_with_minor_fraction() {
        let splitter = VariantSplitter::new(0.01, 0.97);
        let mut last = 0.0;
        for step in 2..50 {
            let fraction = step as f64 / 100.0;
            let calls = vec![
                VariantCall::new(100, 'A', 'G', 0.05, Some(100)),
                VariantCall::new(200, 'C', 'T', fraction, Some(100)),
            ];
            let level = contamination_level(&splitter.split(&Sample::new("s", calls).unwrap()));
            assert!(level >= last, "level dropped at minor fraction {}", fraction);
            assert!((0.0..=MAX_CONTAMINATION_LEVEL).contains(&level));
            last = level;
        }
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Status::Yes).unwrap(), "\"YES\"");
        assert_eq!(Status::No.to_string(), "NO");
    }
}
