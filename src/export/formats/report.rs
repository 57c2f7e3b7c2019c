use crate::contamination::ContaminationResult;
use crate::error::Result;
use std::io::Write;

pub const REPORT_HEADER: [&str; 11] = [
    "Sample",
    "Contamination",
    "ContaminationLevel",
    "Distance",
    "SampleCoverage",
    "MajorHaplogroup",
    "MajorQuality",
    "MinorHaplogroup",
    "MinorQuality",
    "Heteroplasmies",
    "Homoplasmies",
];

/// Tab-separated contamination report, one row per sample in the order given.
pub fn write_textual_report<W: Write>(mut writer: W, results: &[ContaminationResult]) -> Result<()> {
    writeln!(writer, "{}", REPORT_HEADER.join("\t"))?;
    for result in results {
        writeln!(
            writer,
            "{}\t{}\t{:.3}\t{}\t{}\t{}\t{:.3}\t{}\t{:.3}\t{}\t{}",
            result.sample_id,
            result.status,
            result.contamination_level,
            result.distance_score,
            result.sample_mean_coverage,
            result.major_haplogroup(),
            result.major.quality,
            result.minor_haplogroup(),
            result.minor.quality,
            result.heteroplasmies,
            result.homoplasmies,
        )?;
    }
    writer.flush()?;
    Ok(())
}
