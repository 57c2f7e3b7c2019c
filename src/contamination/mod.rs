//! Major/minor splitting, verdicts and run summaries.

pub mod detector;
pub mod pipeline;
pub mod splitter;
pub mod summary;

pub use detector::{ContaminationDetector, ContaminationResult, Status};
pub use pipeline::{analyze_sample, run, run_with_progress};
pub use splitter::{SplitProfiles, VariantSplitter};
pub use summary::ContaminationSummary;
