use crate::error::{HaplocheckError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Length of the revised Cambridge Reference Sequence (rCRS).
pub const MT_LENGTH: u32 = 16569;

/// One observed allele at one mitochondrial locus of one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantCall {
    pub position: u32,
    pub reference: char,
    pub observed: char,
    /// Fraction of reads at `position` supporting `observed`.
    pub fraction: f64,
    /// Read depth at `position`; `None` when the caller did not report one.
    pub depth: Option<u32>,
}

impl VariantCall {
    pub fn new(position: u32, reference: char, observed: char, fraction: f64, depth: Option<u32>) -> Self {
        Self {
            position,
            reference: reference.to_ascii_uppercase(),
            observed: observed.to_ascii_uppercase(),
            fraction,
            depth,
        }
    }

    /// Depth used for statistics. Missing coverage counts as zero.
    pub fn depth_or_zero(&self) -> u32 {
        self.depth.unwrap_or(0)
    }

    pub fn is_reference(&self) -> bool {
        self.observed == self.reference
    }
}

/// A single sample's calls, ordered by locus then allele.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    id: String,
    calls: Vec<VariantCall>,
}

impl Sample {
    /// Builds a sample, rejecting a second call for the same allele at the same locus.
    pub fn new(id: impl Into<String>, mut calls: Vec<VariantCall>) -> Result<Self> {
        let id = id.into();
        calls.sort_by(|a, b| a.position.cmp(&b.position).then(a.observed.cmp(&b.observed)));

        let mut seen = HashSet::with_capacity(calls.len());
        for call in &calls {
            if !seen.insert((call.position, call.observed)) {
                return Err(HaplocheckError::input(format!(
                    "sample '{}' has more than one call for allele {} at position {}",
                    id, call.observed, call.position
                )));
            }
        }

        Ok(Self { id, calls })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn calls(&self) -> &[VariantCall] {
        &self.calls
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Calls grouped by locus, in locus order.
    pub fn loci(&self) -> impl Iterator<Item = &[VariantCall]> {
        self.calls.chunk_by(|a, b| a.position == b.position)
    }
}

/// Rejects a sample set where two samples share an identifier.
pub fn ensure_unique_ids(samples: &[Sample]) -> Result<()> {
    let mut seen = HashSet::with_capacity(samples.len());
    for sample in samples {
        if !seen.insert(sample.id()) {
            return Err(HaplocheckError::input(format!(
                "sample id '{}' occurs more than once",
                sample.id()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_are_sorted_and_grouped_by_locus() {
        let sample = Sample::new(
            "s1",
            vec![
                VariantCall::new(300, 'C', 'T', 0.1, Some(100)),
                VariantCall::new(73, 'A', 'G', 1.0, Some(50)),
                VariantCall::new(300, 'C', 'A', 0.2, Some(100)),
            ],
        )
        .unwrap();

        let loci: Vec<_> = sample.loci().collect();
        assert_eq!(loci.len(), 2);
        assert_eq!(loci[0][0].position, 73);
        assert_eq!(loci[1].len(), 2);
        assert_eq!(loci[1][0].observed, 'A');
        assert_eq!(loci[1][1].observed, 'T');
    }

    #[test]
    fn duplicate_allele_at_locus_is_rejected() {
        let err = Sample::new(
            "s1",
            vec![
                VariantCall::new(300, 'C', 'T', 0.1, Some(100)),
                VariantCall::new(300, 'C', 't', 0.2, Some(100)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, HaplocheckError::Input(_)));
    }

    #[test]
    fn duplicate_sample_ids_are_rejected() {
        let a = Sample::new("dup", vec![]).unwrap();
        let b = Sample::new("dup", vec![]).unwrap();
        assert!(ensure_unique_ids(&[a.clone()]).is_ok());
        assert!(matches!(
            ensure_unique_ids(&[a, b]),
            Err(HaplocheckError::Input(_))
        ));
    }

    #[test]
    fn missing_depth_counts_as_zero() {
        let call = VariantCall::new(16519, 'T', 'C', 1.0, None);
        assert_eq!(call.depth_or_zero(), 0);
    }
}
