use crate::error::{HaplocheckError, Result};
use crate::types::{ensure_unique_ids, Sample, VariantCall, MT_LENGTH};
use log::{debug, info, warn};
use rust_htslib::bcf::{self, Read};
use std::path::Path;

/// Reads every sample of a (b)gzipped or plain VCF/BCF into memory.
///
/// Allele fractions come from the per-allele `AF` format field; without it the genotype
/// decides (a haploid `1` is fixed, a diploid `0/1` splits evenly). Depth comes from `FORMAT/DP`,
/// falling back to `INFO/DP`. Indels and symbolic alleles are skipped.
pub fn load_vcf(path: &Path) -> Result<Vec<Sample>> {
    let mut reader = bcf::Reader::from_path(path)?;
    let sample_ids: Vec<String> = reader
        .header()
        .samples()
        .iter()
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();
    if sample_ids.is_empty() {
        return Err(HaplocheckError::input(format!(
            "{} contains no samples",
            path.display()
        )));
    }

    let mut calls: Vec<Vec<VariantCall>> = vec![Vec::new(); sample_ids.len()];
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        let position = record.pos() as u32 + 1;
        if position > MT_LENGTH {
            warn!("Position {} lies beyond the mitochondrial reference", position);
        }

        let alleles: Vec<Vec<u8>> = record.alleles().iter().map(|a| a.to_vec()).collect();
        let Some(reference) = alleles.first().and_then(|a| single_base(a)) else {
            skipped += 1;
            continue;
        };

        let fractions = record.format(b"AF").float().ok();
        let format_depths = record.format(b"DP").integer().ok();
        let info_depth = record
            .info(b"DP")
            .integer()
            .ok()
            .flatten()
            .and_then(|values| values.first().copied())
            .filter(|d| *d >= 0)
            .map(|d| d as u32);
        let genotypes = record.genotypes().ok();

        for (sample_idx, sample_calls) in calls.iter_mut().enumerate() {
            let depth = format_depths
                .as_ref()
                .and_then(|buffer| buffer[sample_idx].first().copied())
                .filter(|d| *d >= 0)
                .map(|d| d as u32)
                .or(info_depth);

            let genotype_alleles: Vec<u32> = genotypes
                .as_ref()
                .map(|g| {
                    g.get(sample_idx)
                        .iter()
                        .filter_map(|allele| allele.index())
                        .collect()
                })
                .unwrap_or_default();

            for (alt_idx, alt) in alleles.iter().enumerate().skip(1) {
                let Some(observed) = single_base(alt) else {
                    skipped += 1;
                    continue;
                };

                let reported = fractions
                    .as_ref()
                    .and_then(|buffer| buffer[sample_idx].get(alt_idx - 1).copied())
                    .filter(|f| !f.is_nan())
                    .map(f64::from);
                let fraction = match reported {
                    Some(f) => f,
                    None if genotype_alleles.is_empty() => continue,
                    None => {
                        let carrying = genotype_alleles
                            .iter()
                            .filter(|&&a| a as usize == alt_idx)
                            .count();
                        carrying as f64 / genotype_alleles.len() as f64
                    }
                };
                if fraction <= 0.0 {
                    continue;
                }

                sample_calls.push(VariantCall::new(
                    position,
                    reference,
                    observed,
                    fraction,
                    depth,
                ));
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} non-SNV allele(s) in {}", skipped, path.display());
    }

    let samples = sample_ids
        .into_iter()
        .zip(calls)
        .map(|(id, calls)| Sample::new(id, calls))
        .collect::<Result<Vec<_>>>()?;
    ensure_unique_ids(&samples)?;

    info!(
        "Loaded {} sample(s) from {}",
        samples.len(),
        path.display()
    );
    Ok(samples)
}

fn single_base(allele: &[u8]) -> Option<char> {
    match allele {
        [base] if base.is_ascii_alphabetic() => Some((*base as char).to_ascii_uppercase()),
        _ => None,
    }
}
