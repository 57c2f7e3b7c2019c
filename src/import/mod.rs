//! Turning variant files into in-memory samples.

mod vcf;

pub use vcf::load_vcf;

use crate::error::{HaplocheckError, Result};
use crate::types::Sample;
use std::path::PathBuf;

/// Loads the one input file of a run. More than one file is refused.
pub fn load_single(inputs: &[PathBuf]) -> Result<Vec<Sample>> {
    match inputs {
        [] => Err(HaplocheckError::input("no input file given")),
        [path] => {
            if !path.exists() {
                return Err(HaplocheckError::input(format!(
                    "input file {} does not exist",
                    path.display()
                )));
            }
            load_vcf(path)
        }
        _ => Err(HaplocheckError::input(format!(
            "currently only a single VCF file is supported, got {}",
            inputs.len()
        ))),
    }
}
