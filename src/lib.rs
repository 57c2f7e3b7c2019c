pub mod cli;
pub mod commands;
pub mod config;
pub mod contamination;
pub mod error;
pub mod export;
pub mod haplogroup;
pub mod import;
pub mod types;
pub mod utils;

pub use config::Config;
pub use contamination::{analyze_sample, run, ContaminationResult, ContaminationSummary, Status};
pub use error::{HaplocheckError, Result};
pub use haplogroup::{load_tree, ReferenceTree};
pub use types::{Sample, VariantCall};
