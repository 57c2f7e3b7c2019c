use crate::config::Config;
use crate::haplogroup::types::{MutationProfile, ProfileEntry, ProfileTag};
use crate::types::{Sample, VariantCall};
use log::debug;
use std::cmp::Ordering;

/// Major and minor profiles of one sample plus the locus counts behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitProfiles {
    pub major: MutationProfile,
    pub minor: MutationProfile,
    /// Loci carrying a fixed non-reference allele.
    pub homoplasmies: usize,
    /// Loci that produced a minor allele.
    pub heteroplasmies: usize,
}

/// Partitions calls into the dominant and the minority allele at each locus.
#[derive(Debug, Clone, Copy)]
pub struct VariantSplitter {
    split_threshold: f64,
    fixed_threshold: f64,
}

impl VariantSplitter {
    pub fn new(split_threshold: f64, fixed_threshold: f64) -> Self {
        Self {
            split_threshold,
            fixed_threshold,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.major_minor_split_threshold, config.fixed_allele_threshold)
    }

    pub fn split(&self, sample: &Sample) -> SplitProfiles {
        let mut split = SplitProfiles {
            major: MutationProfile::new(sample.id(), ProfileTag::Major),
            minor: MutationProfile::new(sample.id(), ProfileTag::Minor),
            homoplasmies: 0,
            heteroplasmies: 0,
        };

        for locus in sample.loci() {
            let (major, minor) = self.split_locus(locus);
            match minor {
                Some(minor) => {
                    split.heteroplasmies += 1;
                    split.minor.entries.push(minor);
                }
                None if major.mutation().is_some() => split.homoplasmies += 1,
                None => {}
            }
            split.major.entries.push(major);
        }

        debug!(
            "Sample {}: {} loci, {} heteroplasmic, {} homoplasmic",
            sample.id(),
            split.major.len(),
            split.heteroplasmies,
            split.homoplasmies
        );
        split
    }

    /// Returns the major entry and, for a heteroplasmic locus, the minor entry.
    ///
    /// `locus` holds every call at one position and is never empty.
    fn split_locus(&self, locus: &[VariantCall]) -> (ProfileEntry, Option<ProfileEntry>) {
        let position = locus[0].position;
        let reference = locus[0].reference;
        let entry = |allele: char, fraction: f64| ProfileEntry {
            position,
            reference,
            allele,
            fraction,
        };

        let mut alleles: Vec<(char, f64)> = locus
            .iter()
            .map(|call| (call.observed, call.fraction.clamp(0.0, 1.0)))
            .collect();

        if let [(allele, fraction)] = alleles.as_slice() {
            if *fraction >= self.fixed_threshold {
                return (entry(*allele, *fraction), None);
            }
        }

        let called_reference = alleles.iter().any(|(allele, _)| *allele == reference);
        let remainder = 1.0 - alleles.iter().map(|(_, f)| f).sum::<f64>();
        if !called_reference && remainder > self.split_threshold {
            alleles.push((reference, remainder));
        }

        alleles.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        if alleles.len() > 2 {
            debug!(
                "Position {}: dropping {} allele(s) beyond major and minor",
                position,
                alleles.len() - 2
            );
        }

        let (major_allele, major_fraction) = alleles[0];
        let minor = alleles
            .get(1)
            .filter(|(_, fraction)| *fraction > self.split_threshold)
            .map(|&(allele, fraction)| entry(allele, fraction));

        (entry(major_allele, major_fraction), minor)
    }
}
