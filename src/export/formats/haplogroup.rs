use crate::error::Result;
use crate::haplogroup::HaplogroupAssignment;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Classification of one sample's major profile.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaplogroupCall {
    pub sample_id: String,
    pub haplogroup: String,
    pub quality: f64,
    pub matching_snps: usize,
    pub unexplained_snps: usize,
    pub depth: u32,
    pub confidence: Confidence,
    pub tied_with: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_quality(quality: f64) -> Self {
        if quality >= 0.9 {
            Confidence::High
        } else if quality >= 0.5 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

impl HaplogroupCall {
    pub fn new(sample_id: &str, assignment: &HaplogroupAssignment) -> Self {
        Self {
            sample_id: sample_id.to_string(),
            haplogroup: assignment.haplogroup.clone(),
            quality: assignment.quality,
            matching_snps: assignment.matched.len(),
            unexplained_snps: assignment.unexplained.len(),
            depth: assignment.depth,
            confidence: Confidence::from_quality(assignment.quality),
            tied_with: assignment.tied_with.clone(),
        }
    }
}

pub fn write_haplogroup_table<W: Write>(mut writer: W, calls: &[HaplogroupCall]) -> Result<()> {
    writeln!(
        writer,
        "Sample\tHaplogroup\tQuality\tConfidence\tMatching_SNPs\tUnexplained_SNPs\tDepth\tTied"
    )?;
    for call in calls {
        let tied = if call.tied_with.is_empty() {
            "-".to_string()
        } else {
            call.tied_with.join(",")
        };
        writeln!(
            writer,
            "{}\t{}\t{:.3}\t{:?}\t{}\t{}\t{}\t{}",
            call.sample_id,
            call.haplogroup,
            call.quality,
            call.confidence,
            call.matching_snps,
            call.unexplained_snps,
            call.depth,
            tied
        )?;
    }
    writer.flush()?;
    Ok(())
}
