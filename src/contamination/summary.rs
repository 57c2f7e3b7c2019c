use crate::contamination::detector::{ContaminationResult, Status};
use serde::{Deserialize, Serialize};

/// Counts and coverage quartiles over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContaminationSummary {
    #[serde(rename = "Yes")]
    pub yes: usize,
    #[serde(rename = "No")]
    pub no: usize,
    #[serde(rename = "Coverage")]
    pub coverage_median: f64,
    #[serde(rename = "Q1")]
    pub coverage_q1: f64,
    #[serde(rename = "Q3")]
    pub coverage_q3: f64,
}

impl ContaminationSummary {
    pub fn from_results(results: &[ContaminationResult]) -> Self {
        let yes = results.iter().filter(|r| r.status == Status::Yes).count();
        let mut coverages: Vec<f64> = results
            .iter()
            .map(|r| r.sample_mean_coverage as f64)
            .collect();
        coverages.sort_by(|a, b| a.total_cmp(b));

        Self {
            yes,
            no: results.len() - yes,
            coverage_median: percentile(&coverages, 50.0),
            coverage_q1: percentile(&coverages, 25.0),
            coverage_q3: percentile(&coverages, 75.0),
        }
    }

    pub fn coverage_iqr(&self) -> f64 {
        self.coverage_q3 - self.coverage_q1
    }
}

/// Linear interpolation between closest ranks at `(n - 1) * p / 100`.
///
/// `sorted` must be ascending. An empty slice yields 0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = (sorted.len() - 1) as f64 * (p / 100.0).clamp(0.0, 1.0);
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    if base + 1 < sorted.len() {
        sorted[base] + rest * (sorted[base + 1] - sorted[base])
    } else {
        sorted[base]
    }
}
